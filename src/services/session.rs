//! Risoluzione dell'utente corrente

use crate::error::Result;
use crate::models::{Identity, UserPayload};
use crate::services::http::PortalClient;

#[derive(Debug, Clone)]
pub struct SessionResolver {
    http: PortalClient,
}

impl SessionResolver {
    pub fn new(http: PortalClient) -> Self {
        Self { http }
    }

    /// Fetches the identity of the current page view from `/api/users/me`
    pub async fn current_identity(&self) -> Result<Identity> {
        let payload: UserPayload = self.http.get_json("/api/users/me").await?;
        let identity = Identity::from(payload);

        tracing::debug!(
            "Utente corrente: {:?} (autenticato: {})",
            identity.email,
            identity.is_authenticated
        );

        Ok(identity)
    }
}
