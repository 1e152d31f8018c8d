//! Dataset, study and file models

use serde::{Deserialize, Serialize};

use super::AuthorizationLevel;
use crate::utils::de::{string_or_null, string_or_number};

/// HTML fragment coming from the backend that may be rendered without sanitizing
///
/// Only the dataset resolver builds these, right after the fetch, so every
/// trust decision goes through a single place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub(crate) fn new(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Version block as returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct VersionPayload {
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub available_from: Option<String>,
}

/// Dataset as returned by `/api/datasets/{id}[/versions/{v}]` and in the catalog list
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetPayload {
    pub short_name: String,
    #[serde(default)]
    pub full_name: String,
    pub version: VersionPayload,
    #[serde(default)]
    pub authorization_level: AuthorizationLevel,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub browser_uri: Option<String>,
    /// Set on versions that are not public yet
    #[serde(default)]
    pub future: bool,
}

#[derive(Debug, Deserialize)]
pub struct DatasetListPayload {
    pub data: Vec<DatasetPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetVersion {
    pub version_id: String,
    pub description: TrustedHtml,
    pub terms: TrustedHtml,
    pub available_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub short_name: String,
    pub full_name: String,
    pub version: DatasetVersion,
    /// Level reported by the backend, authoritative for pending/approved/admin
    pub authorization_level: AuthorizationLevel,
    pub is_admin: bool,
    pub browser_uri: Option<String>,
}

/// Catalog entry shown on the home page
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub short_name: String,
    pub full_name: String,
    pub version: DatasetVersion,
    pub future: bool,
    /// Link target of the catalog card
    pub url_base: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pi_name: Option<String>,
    #[serde(default)]
    pub pi_email: Option<String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub ref_doi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub ethnicity: Option<String>,
}

/// Payload of `/api/datasets/{id}/collection`
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPayload {
    #[serde(default)]
    pub collections: Vec<Collection>,
    pub study: Study,
}

/// Dataset page view-model: dataset metadata merged with its study record
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedDataset {
    pub dataset: Dataset,
    pub collections: Vec<Collection>,
    pub study: Study,
    /// `study.contact_name` with the first character upper-cased, display only
    pub contact_name_display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetVersionEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default)]
    pub available_from: Option<String>,
    #[serde(default)]
    pub ref_doi: Option<String>,
    /// True for the version the page is currently showing
    #[serde(skip_deserializing)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct VersionListPayload {
    pub data: Vec<DatasetVersionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default, alias = "dirname")]
    pub directory: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FileListPayload {
    #[serde(default)]
    pub files: Vec<DatasetFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_payload_numeric_version() {
        let payload: DatasetPayload = serde_json::from_str(
            r#"{
                "short_name": "SweGen",
                "full_name": "Swedish Genomes",
                "version": {"version": 20171025, "description": "<b>x</b>", "terms": "t"},
                "authorization_level": "pending",
                "is_admin": false
            }"#,
        )
        .unwrap();
        assert_eq!(payload.version.version, "20171025");
        assert_eq!(payload.authorization_level, AuthorizationLevel::Pending);
        assert!(!payload.future);
    }

    #[test]
    fn test_version_entry_is_never_active_on_the_wire() {
        let entry: DatasetVersionEntry =
            serde_json::from_str(r#"{"name": "2", "active": true}"#).unwrap();
        assert!(!entry.active);
    }

    #[test]
    fn test_trusted_html_serializes_as_plain_string() {
        let html = TrustedHtml::new("<p>hi</p>".to_string());
        assert_eq!(serde_json::to_string(&html).unwrap(), r#""<p>hi</p>""#);
        assert_eq!(html.to_string(), "<p>hi</p>");
    }
}
