//! HTTP transport verso il backend del portale

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::services::cookies::CookieJar;

/// reqwest client bound to the backend base URL and the shared cookie jar
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: reqwest::Client,
    base_url: String,
    cookies: Arc<CookieJar>,
    csrf_cookie: String,
}

impl PortalClient {
    pub fn new(config: &Config, cookies: Arc<CookieJar>) -> Result<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| PortalError::Config(format!("{}: {}", config.base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .cookie_provider(cookies.clone())
            .build()
            .map_err(|e| PortalError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookies,
            csrf_cookie: config.csrf_cookie.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cookies(&self) -> &Arc<CookieJar> {
        &self.cookies
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// CSRF token from the cookie store, empty when the backend never set one
    pub fn csrf_token(&self) -> String {
        match self.cookies.get(&self.csrf_cookie) {
            Some(token) => token,
            None => {
                tracing::warn!("Cookie CSRF '{}' assente", self.csrf_cookie);
                String::new()
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json_query(path, &[]).await
    }

    pub async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).query(params).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fire a GET whose body is irrelevant
    pub async fn get(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// URL-encoded POST carrying the CSRF token as `_xsrf`
    pub async fn post_form(&self, path: &str, mut fields: Vec<(&str, String)>) -> Result<()> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        fields.push(("_xsrf", self.csrf_token()));

        let response = self.client.post(&url).form(&fields).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!("Il backend ha risposto {}: {}", status, message.trim());
    Err(PortalError::Backend {
        status: status.as_u16(),
        message: if message.trim().is_empty() {
            status.to_string()
        } else {
            message.trim().to_string()
        },
    })
}
