//! Authorization level derivation and the page-scoped tracker built on it

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;

use crate::models::{AuthorizationLevel, Dataset, Identity};

/// Derives the authorization level of a page view
///
/// # Arguments
/// * `identity` - Current user, `None` until resolved
/// * `dataset` - Current dataset, `None` until resolved
/// * `last` - Level computed before this change
/// * `request_submitted` - An access request succeeded during this page view
///
/// Logged-out wins over everything. A request submitted in this page view
/// wins over the backend until the next full load, when the backend level is
/// authoritative again. An unresolved dataset keeps the previous level.
pub fn derive_authorization_level(
    identity: Option<&Identity>,
    dataset: Option<&Dataset>,
    last: AuthorizationLevel,
    request_submitted: bool,
) -> AuthorizationLevel {
    match identity {
        Some(identity) if identity.is_authenticated => {}
        _ => return AuthorizationLevel::LoggedOut,
    }

    if request_submitted {
        return AuthorizationLevel::RequestSubmitted;
    }

    match dataset {
        Some(dataset) => dataset.authorization_level,
        None => last,
    }
}

#[derive(Debug, Default)]
struct Inputs {
    identity: Option<Identity>,
    dataset: Option<Dataset>,
    request_submitted: bool,
}

/// Holds the inputs of one page view and publishes level transitions
///
/// Clones share the same state. Dropping every clone ends the page view;
/// a new page load starts from a fresh tracker.
#[derive(Debug, Clone)]
pub struct AuthorizationTracker {
    inputs: Arc<Mutex<Inputs>>,
    level: watch::Sender<AuthorizationLevel>,
}

impl Default for AuthorizationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationTracker {
    pub fn new() -> Self {
        let (level, _) = watch::channel(AuthorizationLevel::default());
        Self {
            inputs: Arc::new(Mutex::new(Inputs::default())),
            level,
        }
    }

    pub fn level(&self) -> AuthorizationLevel {
        *self.level.borrow()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }

    pub fn dataset(&self) -> Option<Dataset> {
        self.lock().dataset.clone()
    }

    /// True once both inputs have resolved
    pub fn is_stable(&self) -> bool {
        let inputs = self.lock();
        inputs.identity.is_some() && inputs.dataset.is_some()
    }

    pub fn set_identity(&self, identity: Identity) {
        self.update(|inputs| inputs.identity = Some(identity));
    }

    pub fn set_dataset(&self, dataset: Dataset) {
        self.update(|inputs| inputs.dataset = Some(dataset));
    }

    pub fn mark_request_submitted(&self) {
        self.update(|inputs| inputs.request_submitted = true);
    }

    /// Stream of levels: the current one first, then every transition
    pub fn subscribe(&self) -> impl Stream<Item = AuthorizationLevel> {
        WatchStream::new(self.level.subscribe())
    }

    fn update(&self, change: impl FnOnce(&mut Inputs)) {
        let mut inputs = self.lock();
        change(&mut inputs);

        let next = derive_authorization_level(
            inputs.identity.as_ref(),
            inputs.dataset.as_ref(),
            self.level(),
            inputs.request_submitted,
        );

        self.level.send_if_modified(|level| {
            if *level == next {
                false
            } else {
                tracing::debug!("Livello di autorizzazione: {} -> {}", level, next);
                *level = next;
                true
            }
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inputs> {
        self.inputs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    use crate::models::{DatasetVersion, TrustedHtml};

    fn user() -> Identity {
        Identity {
            is_authenticated: true,
            email: Some("ada@example.org".to_string()),
            display_name: Some("Ada".to_string()),
            is_admin: false,
        }
    }

    fn dataset(level: AuthorizationLevel) -> Dataset {
        Dataset {
            short_name: "SweGen".to_string(),
            full_name: "Swedish Genomes".to_string(),
            version: DatasetVersion {
                version_id: "1".to_string(),
                description: TrustedHtml::new(String::new()),
                terms: TrustedHtml::new(String::new()),
                available_from: None,
            },
            authorization_level: level,
            is_admin: false,
            browser_uri: None,
        }
    }

    const ALL_LEVELS: [AuthorizationLevel; 5] = [
        AuthorizationLevel::LoggedOut,
        AuthorizationLevel::Pending,
        AuthorizationLevel::Approved,
        AuthorizationLevel::Admin,
        AuthorizationLevel::RequestSubmitted,
    ];

    #[test]
    fn test_unauthenticated_is_always_logged_out() {
        let anonymous = Identity::anonymous();
        for level in ALL_LEVELS {
            let ds = dataset(level);
            for submitted in [false, true] {
                for last in ALL_LEVELS {
                    assert_eq!(
                        derive_authorization_level(Some(&anonymous), Some(&ds), last, submitted),
                        AuthorizationLevel::LoggedOut
                    );
                    assert_eq!(
                        derive_authorization_level(None, Some(&ds), last, submitted),
                        AuthorizationLevel::LoggedOut
                    );
                }
            }
        }
    }

    #[test]
    fn test_backend_level_used_verbatim() {
        let me = user();
        for level in ALL_LEVELS {
            let ds = dataset(level);
            assert_eq!(
                derive_authorization_level(
                    Some(&me),
                    Some(&ds),
                    AuthorizationLevel::LoggedOut,
                    false
                ),
                level
            );
        }
    }

    #[test]
    fn test_unresolved_dataset_keeps_last_level() {
        let me = user();
        assert_eq!(
            derive_authorization_level(Some(&me), None, AuthorizationLevel::Approved, false),
            AuthorizationLevel::Approved
        );
    }

    #[test]
    fn test_request_submitted_overrides_backend() {
        let me = user();
        let ds = dataset(AuthorizationLevel::Pending);
        assert_eq!(
            derive_authorization_level(Some(&me), Some(&ds), AuthorizationLevel::Pending, true),
            AuthorizationLevel::RequestSubmitted
        );
    }

    #[test]
    fn test_tracker_recomputes_on_every_input() {
        let tracker = AuthorizationTracker::new();
        assert_eq!(tracker.level(), AuthorizationLevel::LoggedOut);

        // Dataset first: still logged out until identity arrives
        tracker.set_dataset(dataset(AuthorizationLevel::Pending));
        assert_eq!(tracker.level(), AuthorizationLevel::LoggedOut);
        assert!(!tracker.is_stable());

        tracker.set_identity(user());
        assert!(tracker.is_stable());
        assert_eq!(tracker.level(), AuthorizationLevel::Pending);

        tracker.set_dataset(dataset(AuthorizationLevel::Approved));
        assert_eq!(tracker.level(), AuthorizationLevel::Approved);

        tracker.mark_request_submitted();
        assert_eq!(tracker.level(), AuthorizationLevel::RequestSubmitted);

        // A later backend payload does not undo the submission
        tracker.set_dataset(dataset(AuthorizationLevel::Pending));
        assert_eq!(tracker.level(), AuthorizationLevel::RequestSubmitted);

        // A fresh tracker is a fresh page load
        let reloaded = AuthorizationTracker::new();
        reloaded.set_identity(user());
        reloaded.set_dataset(dataset(AuthorizationLevel::Pending));
        assert_eq!(reloaded.level(), AuthorizationLevel::Pending);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let tracker = AuthorizationTracker::new();
        let mut levels = Box::pin(tracker.subscribe());

        assert_eq!(levels.next().await, Some(AuthorizationLevel::LoggedOut));

        tracker.set_identity(user());
        tracker.set_dataset(dataset(AuthorizationLevel::Pending));
        assert_eq!(levels.next().await, Some(AuthorizationLevel::Pending));

        tracker.mark_request_submitted();
        assert_eq!(levels.next().await, Some(AuthorizationLevel::RequestSubmitted));
    }
}
