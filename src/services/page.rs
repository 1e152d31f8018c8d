//! Caricamento di una pagina dataset

use serde::Serialize;

use crate::models::{AuthorizationLevel, DatasetFile, Identity, ResolvedDataset};
use crate::portal::Portal;
use crate::services::authorization::AuthorizationTracker;
use crate::services::consent::TermsConsentLog;

/// A dataset page after activation
///
/// Identity, dataset and file list are requested concurrently and joined at
/// one await point, so the page is built from a complete set of results.
#[derive(Debug, Clone)]
pub struct DatasetPage {
    pub short_name: String,
    pub version: Option<String>,
    pub identity: Identity,
    pub resolved: Option<ResolvedDataset>,
    /// User-facing rejection reason when the dataset could not be resolved
    pub error: Option<String>,
    pub files: Vec<DatasetFile>,
    pub tracker: AuthorizationTracker,
}

/// Serializable snapshot of a page
#[derive(Debug, Serialize)]
pub struct DatasetPageView<'a> {
    pub identity: &'a Identity,
    pub authorization_level: AuthorizationLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<&'a ResolvedDataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub files: &'a [DatasetFile],
}

impl DatasetPage {
    pub async fn load(portal: &Portal, short_name: &str, version: Option<&str>) -> Self {
        let tracker = AuthorizationTracker::new();

        let (identity, resolved, files) = tokio::join!(
            portal.session().current_identity(),
            portal.datasets().resolve_dataset(short_name, version),
            portal.datasets().list_files(short_name, version),
        );

        let identity = identity.unwrap_or_else(|e| {
            tracing::warn!("Identità non disponibile, pagina anonima: {}", e);
            Identity::anonymous()
        });
        tracker.set_identity(identity.clone());

        let (resolved, error) = match resolved {
            Ok(resolved) => {
                tracker.set_dataset(resolved.dataset.clone());
                (Some(resolved), None)
            }
            Err(e) => (None, Some(e.to_string())),
        };

        let files = files.unwrap_or_else(|e| {
            tracing::warn!("Lista file di {} non disponibile: {}", short_name, e);
            Vec::new()
        });

        Self {
            short_name: short_name.to_string(),
            version: version.map(str::to_string),
            identity,
            resolved,
            error,
            files,
            tracker,
        }
    }

    pub fn authorization_level(&self) -> AuthorizationLevel {
        self.tracker.level()
    }

    /// Once-per-page "terms viewed" logger, available when the dataset resolved
    pub fn terms_consent_log(&self, portal: &Portal) -> Option<TermsConsentLog> {
        self.resolved.as_ref().map(|r| {
            TermsConsentLog::new(
                portal.audit().clone(),
                &self.short_name,
                &r.dataset.version.version_id,
            )
        })
    }

    pub fn view(&self) -> DatasetPageView<'_> {
        DatasetPageView {
            identity: &self.identity,
            authorization_level: self.authorization_level(),
            dataset: self.resolved.as_ref(),
            error: self.error.as_deref(),
            files: &self.files,
        }
    }
}
