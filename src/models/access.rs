//! Access request form and admin roster models

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CountryListPayload {
    pub countries: Vec<Country>,
}

/// Access-request form data, discarded once the request is accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRequest {
    pub email: String,
    pub display_name: String,
    pub affiliation: String,
    pub country: Country,
    pub subscribe_newsletter: bool,
}

impl AccessRequest {
    /// Presence and shape checks a form layer can use to compute its validity flag.
    pub fn is_complete(&self) -> bool {
        let email = self.email.trim();
        let has_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        };

        has_email
            && !self.display_name.trim().is_empty()
            && !self.affiliation.trim().is_empty()
            && !self.country.name.trim().is_empty()
    }

    /// Form fields of the request POST, without the CSRF token.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("email", self.email.clone()),
            ("userName", self.display_name.clone()),
            ("affiliation", self.affiliation.clone()),
            ("country", self.country.name.clone()),
            (
                "newsletter",
                if self.subscribe_newsletter { "1" } else { "0" }.to_string(),
            ),
        ]
    }
}

/// One user row in the admin roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub email: String,
    #[serde(rename = "user", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "applyDate", default)]
    pub requested_at: Option<NaiveDate>,
    #[serde(rename = "downloadCount", default)]
    pub download_count: Option<u32>,
    #[serde(default, deserialize_with = "flag_from_int_or_bool")]
    pub newsletter: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RosterPayload {
    pub data: Vec<RosterEntry>,
}

/// Consistent snapshot of both roster partitions of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub pending: Vec<RosterEntry>,
    pub current: Vec<RosterEntry>,
}

impl Roster {
    pub fn is_pending(&self, email: &str) -> bool {
        self.pending.iter().any(|e| e.email == email)
    }

    pub fn is_current(&self, email: &str) -> bool {
        self.current.iter().any(|e| e.email == email)
    }

    /// E-mail addresses of approved users who asked for the newsletter.
    pub fn newsletter_emails(&self) -> Vec<&str> {
        self.current
            .iter()
            .filter(|e| e.newsletter == Some(true))
            .map(|e| e.email.as_str())
            .collect()
    }
}

// Il backend usa sia 0/1 che true/false
fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => Some(b),
        Some(serde_json::Value::Number(n)) => Some(n.as_i64().unwrap_or(0) != 0),
        _ => None,
    })
}
