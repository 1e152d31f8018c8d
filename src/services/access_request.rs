//! Richieste di accesso ai dataset

use crate::error::{PortalError, Result};
use crate::models::{AccessRequest, Country, CountryListPayload};
use crate::services::authorization::AuthorizationTracker;
use crate::services::http::PortalClient;
use crate::utils::path_segment;

#[derive(Debug, Clone)]
pub struct AccessRequestSubmitter {
    http: PortalClient,
}

impl AccessRequestSubmitter {
    pub fn new(http: PortalClient) -> Self {
        Self { http }
    }

    /// Country choices for the request form
    pub async fn countries(&self) -> Result<Vec<Country>> {
        let payload: CountryListPayload = self.http.get_json("/api/countries").await?;
        Ok(payload.countries)
    }

    /// Submits an access request for `short_name`
    ///
    /// `valid` is the validity flag computed by the form layer; when false
    /// nothing is sent. On success the tracker moves to `requestSubmitted`.
    /// Failures are not retried.
    pub async fn submit_request(
        &self,
        short_name: &str,
        form: &AccessRequest,
        valid: bool,
        tracker: &AuthorizationTracker,
    ) -> Result<()> {
        if !valid {
            return Err(PortalError::Validation(
                "il modulo di richiesta non è valido".to_string(),
            ));
        }

        let path = format!(
            "/api/datasets/{}/users/{}/request",
            path_segment(short_name),
            path_segment(&form.email)
        );

        self.http.post_form(&path, form.form_fields()).await?;

        tracing::info!(
            "Richiesta di accesso a {} inviata per {}",
            short_name,
            form.email
        );
        tracker.mark_request_submitted();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Form, Path, State},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::models::{AuthorizationLevel, Identity};
    use crate::test_support::{client_for, spawn_backend};

    type Received = Arc<Mutex<Vec<(String, String, HashMap<String, String>)>>>;

    async fn fixture(fail: bool) -> (AccessRequestSubmitter, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route(
                "/api/countries",
                get(|| async { Json(json!({"countries": [{"name": "Norway"}, {"name": "Sweden"}]})) }),
            )
            .route(
                "/api/datasets/:ds/users/:email/request",
                post(
                    move |State(received): State<Received>,
                          Path((ds, email)): Path<(String, String)>,
                          Form(body): Form<HashMap<String, String>>| async move {
                        received.lock().unwrap().push((ds, email, body));
                        if fail {
                            StatusCode::INTERNAL_SERVER_ERROR
                        } else {
                            StatusCode::OK
                        }
                    },
                ),
            )
            .with_state(received.clone());

        let client = client_for(&spawn_backend(app).await);
        client.cookies().put("_xsrf", "tok").unwrap();
        (AccessRequestSubmitter::new(client), received)
    }

    fn form() -> AccessRequest {
        AccessRequest {
            email: "a@x.com".to_string(),
            display_name: "Ada".to_string(),
            affiliation: "KTH".to_string(),
            country: Country {
                name: "Sweden".to_string(),
            },
            subscribe_newsletter: false,
        }
    }

    fn logged_in_tracker() -> AuthorizationTracker {
        let tracker = AuthorizationTracker::new();
        tracker.set_identity(Identity {
            is_authenticated: true,
            email: Some("a@x.com".to_string()),
            display_name: Some("Ada".to_string()),
            is_admin: false,
        });
        tracker
    }

    #[tokio::test]
    async fn test_countries() {
        let (submitter, _) = fixture(false).await;
        let countries = submitter.countries().await.unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[1].name, "Sweden");
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let (submitter, received) = fixture(false).await;
        let tracker = logged_in_tracker();

        let err = submitter
            .submit_request("SweGen", &form(), false, &tracker)
            .await
            .unwrap_err();

        assert!(matches!(err, PortalError::Validation(_)));
        assert!(received.lock().unwrap().is_empty());
        assert_ne!(tracker.level(), AuthorizationLevel::RequestSubmitted);
    }

    #[tokio::test]
    async fn test_submit_posts_form_and_marks_submitted() {
        let (submitter, received) = fixture(false).await;
        let tracker = logged_in_tracker();

        submitter
            .submit_request("SweGen", &form(), true, &tracker)
            .await
            .unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let (ds, email, body) = &received[0];
        assert_eq!(ds, "SweGen");
        assert_eq!(email, "a@x.com");
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["userName"], "Ada");
        assert_eq!(body["affiliation"], "KTH");
        assert_eq!(body["country"], "Sweden");
        assert_eq!(body["newsletter"], "0");
        assert_eq!(body["_xsrf"], "tok");

        assert_eq!(tracker.level(), AuthorizationLevel::RequestSubmitted);
    }

    #[tokio::test]
    async fn test_backend_failure_is_surfaced_without_retry() {
        let (submitter, received) = fixture(true).await;
        let tracker = logged_in_tracker();

        let err = submitter
            .submit_request("SweGen", &form(), true, &tracker)
            .await
            .unwrap_err();

        assert!(err.is_remote());
        assert_eq!(received.lock().unwrap().len(), 1);
        assert_ne!(tracker.level(), AuthorizationLevel::RequestSubmitted);
    }
}
