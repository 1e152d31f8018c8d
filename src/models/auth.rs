//! Identity and authorization-related models

use serde::{Deserialize, Serialize};

/// Raw payload of `GET /api/users/me`
///
/// `user` is null when nobody is logged in.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub has_requested_access: bool,
}

/// Current user as seen by a single page view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub is_authenticated: bool,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub is_admin: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl From<UserPayload> for Identity {
    fn from(payload: UserPayload) -> Self {
        match payload.user {
            Some(name) => Self {
                is_authenticated: true,
                email: payload.email,
                display_name: Some(name),
                is_admin: payload.admin,
            },
            None => Self::anonymous(),
        }
    }
}

/// Access tier of the current user on a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationLevel {
    #[default]
    #[serde(alias = "loggedout", alias = "logged_out")]
    LoggedOut,
    Pending,
    Approved,
    Admin,
    #[serde(alias = "thank-you", alias = "request_submitted")]
    RequestSubmitted,
}

impl AuthorizationLevel {
    /// Whether files may be downloaded at this level.
    pub fn can_download(&self) -> bool {
        matches!(self, AuthorizationLevel::Approved | AuthorizationLevel::Admin)
    }
}

impl std::fmt::Display for AuthorizationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationLevel::LoggedOut => write!(f, "loggedOut"),
            AuthorizationLevel::Pending => write!(f, "pending"),
            AuthorizationLevel::Approved => write!(f, "approved"),
            AuthorizationLevel::Admin => write!(f, "admin"),
            AuthorizationLevel::RequestSubmitted => write!(f, "requestSubmitted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_anonymous_payload() {
        let payload: UserPayload = serde_json::from_str(
            r#"{"user": null, "email": null, "trusted": false, "admin": false}"#,
        )
        .unwrap();
        let identity = Identity::from(payload);
        assert!(!identity.is_authenticated);
        assert_eq!(identity, Identity::anonymous());
    }

    #[test]
    fn test_identity_from_logged_in_payload() {
        let payload: UserPayload = serde_json::from_str(
            r#"{"user": "Ada", "email": "ada@example.org", "trusted": true, "admin": true, "has_requested_access": true}"#,
        )
        .unwrap();
        let identity = Identity::from(payload);
        assert!(identity.is_authenticated);
        assert!(identity.is_admin);
        assert_eq!(identity.email.as_deref(), Some("ada@example.org"));
        assert_eq!(identity.display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_authorization_level_aliases() {
        let level: AuthorizationLevel = serde_json::from_str(r#""loggedout""#).unwrap();
        assert_eq!(level, AuthorizationLevel::LoggedOut);
        let level: AuthorizationLevel = serde_json::from_str(r#""thank-you""#).unwrap();
        assert_eq!(level, AuthorizationLevel::RequestSubmitted);
        let level: AuthorizationLevel = serde_json::from_str(r#""approved""#).unwrap();
        assert_eq!(level, AuthorizationLevel::Approved);
        assert_eq!(AuthorizationLevel::default(), AuthorizationLevel::LoggedOut);
    }

    #[test]
    fn test_can_download() {
        assert!(AuthorizationLevel::Admin.can_download());
        assert!(AuthorizationLevel::Approved.can_download());
        assert!(!AuthorizationLevel::Pending.can_download());
        assert!(!AuthorizationLevel::RequestSubmitted.can_download());
    }
}
