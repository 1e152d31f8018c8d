//! Cookie consent banner and data-use audit logging

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::services::cookies::CookieJar;
use crate::services::http::PortalClient;
use crate::utils::path_segment;

/// Cookie-backed consent flag, read once when the banner is mounted
#[derive(Debug)]
pub struct ConsentBanner {
    cookies: Arc<CookieJar>,
    cookie_name: String,
    consented: AtomicBool,
}

impl ConsentBanner {
    pub fn mount(cookies: Arc<CookieJar>, cookie_name: &str) -> Self {
        let consented = cookies
            .get(cookie_name)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            cookies,
            cookie_name: cookie_name.to_string(),
            consented: AtomicBool::new(consented),
        }
    }

    pub fn is_consented(&self) -> bool {
        self.consented.load(Ordering::SeqCst)
    }

    /// Records the user's acknowledgement
    ///
    /// Returns true only for the call that actually wrote the cookie.
    pub fn set_consent(&self) -> Result<bool> {
        if self.consented.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        if let Err(e) = self.cookies.put(&self.cookie_name, "true") {
            self.consented.store(false, Ordering::SeqCst);
            return Err(e);
        }

        tracing::info!("Consenso ai cookie registrato");
        Ok(true)
    }
}

/// Audit calls about data-use terms and downloads
///
/// All of them are fire-and-forget: failures are logged, never returned.
#[derive(Debug, Clone)]
pub struct AuditLog {
    http: PortalClient,
}

impl AuditLog {
    pub fn new(http: PortalClient) -> Self {
        Self { http }
    }

    /// `POST /api/datasets/{id}/log/consent/{version}`
    pub async fn log_terms_consent(&self, short_name: &str, version: &str) -> bool {
        let path = format!(
            "/api/datasets/{}/log/consent/{}",
            path_segment(short_name),
            path_segment(version)
        );
        self.fire(self.http.post_form(&path, Vec::new()).await, &path)
    }

    /// `GET /api/log/consent`
    pub async fn log_consent(&self) -> bool {
        self.fire(self.http.get("/api/log/consent").await, "/api/log/consent")
    }

    /// `GET /api/log/download`
    pub async fn log_download(&self) -> bool {
        self.fire(self.http.get("/api/log/download").await, "/api/log/download")
    }

    fn fire(&self, outcome: Result<()>, path: &str) -> bool {
        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Log di audit {} fallito: {}", path, e);
                false
            }
        }
    }
}

/// Logs "terms viewed" at most once per page view
#[derive(Debug)]
pub struct TermsConsentLog {
    audit: AuditLog,
    short_name: String,
    version: String,
    logged: AtomicBool,
}

impl TermsConsentLog {
    pub fn new(audit: AuditLog, short_name: &str, version: &str) -> Self {
        Self {
            audit,
            short_name: short_name.to_string(),
            version: version.to_string(),
            logged: AtomicBool::new(false),
        }
    }

    /// Returns true when this call issued the audit request
    pub async fn consented(&self) -> bool {
        if self.logged.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.audit
            .log_terms_consent(&self.short_name, &self.version)
            .await;
        true
    }
}
