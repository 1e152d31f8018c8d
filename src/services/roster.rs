//! Gestione utenti di un dataset (pannello admin)

use crate::error::Result;
use crate::models::{Roster, RosterPayload};
use crate::services::http::PortalClient;
use crate::utils::path_segment;

#[derive(Debug, Clone)]
pub struct RosterManager {
    http: PortalClient,
}

impl RosterManager {
    pub fn new(http: PortalClient) -> Self {
        Self { http }
    }

    /// Pending and current users, fetched concurrently and exposed together
    pub async fn load_roster(&self, short_name: &str) -> Result<Roster> {
        let dataset = path_segment(short_name);
        let pending_path = format!("/api/datasets/{}/users_pending", dataset);
        let current_path = format!("/api/datasets/{}/users_current", dataset);

        let (pending, current) = futures::try_join!(
            self.http.get_json::<RosterPayload>(&pending_path),
            self.http.get_json::<RosterPayload>(&current_path),
        )?;

        tracing::debug!(
            "Roster {}: {} in attesa, {} approvati",
            short_name,
            pending.data.len(),
            current.data.len()
        );

        Ok(Roster {
            pending: pending.data,
            current: current.data,
        })
    }

    /// Grants access, then returns the re-fetched roster
    pub async fn approve(&self, short_name: &str, email: &str) -> Result<Roster> {
        self.user_action(short_name, email, "approve").await?;
        tracing::info!("Accesso a {} approvato per {}", short_name, email);
        self.load_roster(short_name).await
    }

    /// Revokes access, then returns the re-fetched roster
    pub async fn revoke(&self, short_name: &str, email: &str) -> Result<Roster> {
        self.user_action(short_name, email, "revoke").await?;
        tracing::info!("Accesso a {} revocato per {}", short_name, email);
        self.load_roster(short_name).await
    }

    async fn user_action(&self, short_name: &str, email: &str, action: &str) -> Result<()> {
        let path = format!(
            "/api/datasets/{}/users/{}/{}",
            path_segment(short_name),
            path_segment(email),
            action
        );
        self.http.post_form(&path, Vec::new()).await
    }
}
