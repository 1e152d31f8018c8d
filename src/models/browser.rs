//! Variant browser payloads

use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::utils::de::string_or_number;

/// What a variant list is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantSource {
    Gene,
    Region,
    Transcript,
}

impl VariantSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantSource::Gene => "gene",
            VariantSource::Region => "region",
            VariantSource::Transcript => "transcript",
        }
    }
}

impl std::fmt::Display for VariantSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VariantSource {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gene" => Ok(VariantSource::Gene),
            "region" => Ok(VariantSource::Region),
            "transcript" => Ok(VariantSource::Transcript),
            other => Err(PortalError::Validation(format!(
                "tipo di lista varianti sconosciuto: '{}'",
                other
            ))),
        }
    }
}

/// Answer of the search bar: what the query resolved to, if anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub dataset: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl SearchResult {
    /// Browser sub-path of the hit (`gene/ENSG...`), `None` when nothing matched
    pub fn browser_target(&self) -> Option<String> {
        match (&self.kind, &self.value) {
            (Some(kind), Some(value)) if !kind.is_empty() && !value.is_empty() => {
                Some(format!("{}/{}", kind, value))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AutocompletePayload {
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exon {
    pub start: u64,
    pub stop: u64,
    #[serde(rename = "type")]
    pub feature_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    pub id: String,
    #[serde(rename = "number_of_CDS", default)]
    pub number_of_cds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptGene {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub canonical_transcript: Option<String>,
    /// Every transcript of the gene
    #[serde(default)]
    pub transcripts: Vec<String>,
}

/// Transcript page: the transcript, its exons sorted by start, and its gene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptDetails {
    pub transcript: TranscriptSummary,
    #[serde(default)]
    pub exons: Vec<Exon>,
    pub gene: TranscriptGene,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionGene {
    pub gene_id: String,
    #[serde(default)]
    pub gene_name: Option<String>,
    #[serde(default)]
    pub full_gene_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(deserialize_with = "string_or_number")]
    pub chrom: String,
    pub start: u64,
    pub stop: u64,
    /// Absent from the payload when the region holds no genes
    #[serde(default)]
    pub genes: Vec<RegionGene>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDetails {
    pub region: Region,
}

/// Variant table: rows as sent, headers as `(camelCase key, label)` pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantList {
    #[serde(default)]
    pub variants: Vec<serde_json::Value>,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_target() {
        let hit: SearchResult = serde_json::from_value(
            json!({"dataset": "SweGen", "type": "gene", "value": "ENSG00000169174"}),
        )
        .unwrap();
        assert_eq!(hit.browser_target().as_deref(), Some("gene/ENSG00000169174"));

        let miss: SearchResult =
            serde_json::from_value(json!({"dataset": "SweGen", "type": null, "value": null}))
                .unwrap();
        assert_eq!(miss.browser_target(), None);
    }

    #[test]
    fn test_variant_source_parsing() {
        assert_eq!("Gene".parse::<VariantSource>().unwrap(), VariantSource::Gene);
        assert_eq!(VariantSource::Transcript.to_string(), "transcript");
        assert!("exon".parse::<VariantSource>().is_err());
    }

    #[test]
    fn test_region_without_genes() {
        let region: RegionDetails = serde_json::from_value(
            json!({"region": {"chrom": 22, "start": 46615715, "stop": 46615880}}),
        )
        .unwrap();
        assert_eq!(region.region.chrom, "22");
        assert!(region.region.genes.is_empty());
    }
}
