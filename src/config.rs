use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the portal backend, without trailing slash
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Where cookies (session, CSRF, consent) are persisted between runs.
    /// `None` keeps them in memory only.
    pub cookie_file: Option<PathBuf>,
    pub csrf_cookie: String,
    pub consent_cookie: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            request_timeout_secs: 30,
            cookie_file: None,
            csrf_cookie: cookies::CSRF.to_string(),
            consent_cookie: cookies::CONSENT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SWEFREQ_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(timeout) = std::env::var("SWEFREQ_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                config.request_timeout_secs = t;
            }
        }

        if let Ok(path) = std::env::var("SWEFREQ_COOKIE_FILE") {
            config.cookie_file = Some(PathBuf::from(path));
        }

        if let Ok(name) = std::env::var("SWEFREQ_CSRF_COOKIE") {
            config.csrf_cookie = name;
        }

        if let Ok(name) = std::env::var("SWEFREQ_CONSENT_COOKIE") {
            config.consent_cookie = name;
        }

        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Nomi dei cookie usati dal backend
pub mod cookies {
    pub const CSRF: &str = "_xsrf";
    pub const CONSENT: &str = "consent";
}
