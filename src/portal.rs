//! Entry point wiring every portal component from a `Config`

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::access_request::AccessRequestSubmitter;
use crate::services::beacon::BeaconClient;
use crate::services::browser::VariantBrowser;
use crate::services::consent::{AuditLog, ConsentBanner};
use crate::services::cookies::CookieJar;
use crate::services::dataset::DatasetResolver;
use crate::services::http::PortalClient;
use crate::services::page::DatasetPage;
use crate::services::roster::RosterManager;
use crate::services::session::SessionResolver;

/// One client session against the portal backend
///
/// The beacon reference cache and query log live as long as the `Portal`.
#[derive(Debug)]
pub struct Portal {
    config: Config,
    http: PortalClient,
    session: SessionResolver,
    datasets: DatasetResolver,
    access: AccessRequestSubmitter,
    roster: RosterManager,
    beacon: BeaconClient,
    browser: VariantBrowser,
    audit: AuditLog,
}

impl Portal {
    pub fn new(config: Config) -> Result<Self> {
        let cookies = match &config.cookie_file {
            Some(path) => CookieJar::open(path)?,
            None => CookieJar::in_memory(),
        };
        let http = PortalClient::new(&config, Arc::new(cookies))?;

        tracing::debug!("Portale configurato su {}", http.base_url());

        Ok(Self {
            session: SessionResolver::new(http.clone()),
            datasets: DatasetResolver::new(http.clone()),
            access: AccessRequestSubmitter::new(http.clone()),
            roster: RosterManager::new(http.clone()),
            beacon: BeaconClient::new(http.clone()),
            browser: VariantBrowser::new(http.clone()),
            audit: AuditLog::new(http.clone()),
            http,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cookies(&self) -> &Arc<CookieJar> {
        self.http.cookies()
    }

    pub fn session(&self) -> &SessionResolver {
        &self.session
    }

    pub fn datasets(&self) -> &DatasetResolver {
        &self.datasets
    }

    pub fn access_requests(&self) -> &AccessRequestSubmitter {
        &self.access
    }

    pub fn roster(&self) -> &RosterManager {
        &self.roster
    }

    pub fn beacon(&self) -> &BeaconClient {
        &self.beacon
    }

    pub fn browser(&self) -> &VariantBrowser {
        &self.browser
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Mounts the consent banner, reading the consent cookie now
    pub fn consent_banner(&self) -> ConsentBanner {
        ConsentBanner::mount(self.cookies().clone(), &self.config.consent_cookie)
    }

    pub async fn load_dataset_page(&self, short_name: &str, version: Option<&str>) -> DatasetPage {
        DatasetPage::load(self, short_name, version).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_with_cookie_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            cookie_file: Some(dir.path().join("cookies.json")),
            ..Config::default()
        };

        let portal = Portal::new(config.clone()).unwrap();
        assert!(!portal.consent_banner().is_consented());
        assert!(portal.consent_banner().set_consent().unwrap());

        let portal = Portal::new(config).unwrap();
        assert!(portal.consent_banner().is_consented());
    }
}
