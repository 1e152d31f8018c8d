//! Beacon query models

use serde::{Deserialize, Serialize};

use crate::utils::de::{string_or_number, u64_from_string_or_number};

/// Allele-presence query as entered by the user (1-based position)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconQuery {
    pub chromosome: String,
    pub position: u64,
    pub allele: String,
    pub reference_allele: String,
    pub reference_genome: String,
    pub dataset_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeaconState {
    Present,
    Absent,
    Error,
}

impl BeaconState {
    /// Maps the backend `exists` field; null means the beacon could not answer.
    pub fn from_exists(exists: Option<bool>) -> Self {
        match exists {
            Some(true) => BeaconState::Present,
            Some(false) => BeaconState::Absent,
            None => BeaconState::Error,
        }
    }
}

impl std::fmt::Display for BeaconState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeaconState::Present => write!(f, "Present"),
            BeaconState::Absent => write!(f, "Absent"),
            BeaconState::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconResponse {
    pub state: BeaconState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Transport or backend failure detail, only for `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BeaconResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            state: BeaconState::Error,
            observed: None,
            external_url: None,
            error: Some(error.into()),
        }
    }
}

/// One entry of the session query log, always in 1-based coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeaconRecord {
    pub query: BeaconQuery,
    pub response: BeaconResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistsPayload {
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(default)]
    pub observed: Option<u64>,
    #[serde(rename = "externalUrl", default)]
    pub external_url: Option<String>,
}

/// Query as echoed by the backend, position 0-based
#[derive(Debug, Clone, Deserialize)]
pub struct EchoedQuery {
    pub chromosome: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub position: u64,
    #[serde(default)]
    pub allele: String,
    #[serde(rename = "referenceAllele", default)]
    pub reference_allele: String,
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Body of `GET /api/beacon/query`
#[derive(Debug, Clone, Deserialize)]
pub struct BeaconQueryPayload {
    #[serde(default)]
    pub response: Option<ExistsPayload>,
    #[serde(default)]
    pub query: Option<EchoedQuery>,
    /// Some beacon flavours answer with a flat `exists` field
    #[serde(default)]
    pub exists: Option<bool>,
}

impl BeaconQueryPayload {
    pub fn exists(&self) -> Option<bool> {
        self.response
            .as_ref()
            .and_then(|r| r.exists)
            .or(self.exists)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconDataset {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub reference: String,
}

/// Body of `GET /api/beacon/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub api: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub datasets: Vec<BeaconDataset>,
    #[serde(default)]
    pub queries: Vec<String>,
}

impl BeaconInfo {
    /// Reference genomes served for a dataset, in backend order.
    pub fn references_for(&self, dataset_id: &str) -> Vec<String> {
        self.datasets
            .iter()
            .filter(|d| d.id == dataset_id)
            .map(|d| d.reference.clone())
            .collect()
    }
}
