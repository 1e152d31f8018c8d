//! In-process fake backend for service tests

use std::sync::Arc;

use axum::Router;

use crate::config::Config;
use crate::services::cookies::CookieJar;
use crate::services::http::PortalClient;

/// Serves `app` on a random local port and returns its base URL
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

pub fn client_for(base_url: &str) -> PortalClient {
    PortalClient::new(&test_config(base_url), Arc::new(CookieJar::in_memory()))
        .expect("Failed to build client")
}
