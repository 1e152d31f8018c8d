//! Browser delle varianti di un dataset

use crate::error::{PortalError, Result};
use crate::models::{
    AutocompletePayload, RegionDetails, SearchResult, TranscriptDetails, VariantList,
    VariantSource,
};
use crate::services::http::PortalClient;
use crate::utils::path_segment;

/// Lookups behind the variant browser pages
///
/// Every call is scoped to a dataset and optionally pinned to one of its
/// versions: `/api/datasets/{ds}[/version/{v}]/browser/...`.
#[derive(Debug, Clone)]
pub struct VariantBrowser {
    http: PortalClient,
}

fn browser_path(short_name: &str, version: Option<&str>, tail: &str) -> String {
    let mut path = format!("/api/datasets/{}/", path_segment(short_name));
    if let Some(version) = version.filter(|v| !v.trim().is_empty()) {
        path.push_str("version/");
        path.push_str(&path_segment(version));
        path.push('/');
    }
    path.push_str("browser/");
    path.push_str(tail);
    path
}

/// Rejects blank identifiers before any request is made
fn required<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortalError::Validation(format!("{} mancante", what)));
    }
    Ok(value)
}

impl VariantBrowser {
    pub fn new(http: PortalClient) -> Self {
        Self { http }
    }

    /// Resolves a free-text query to a gene, transcript, region or variant
    pub async fn search(
        &self,
        short_name: &str,
        version: Option<&str>,
        query: &str,
    ) -> Result<SearchResult> {
        let query = required("query", query)?;
        let tail = format!("search/{}", path_segment(query));
        let hit: SearchResult = self
            .http
            .get_json(&browser_path(short_name, version, &tail))
            .await?;

        tracing::debug!("Ricerca '{}' in {}: {:?}", query, short_name, hit.kind);
        Ok(hit)
    }

    /// Up to 20 gene names completing `query`
    pub async fn autocomplete(
        &self,
        short_name: &str,
        version: Option<&str>,
        query: &str,
    ) -> Result<Vec<String>> {
        let query = required("query", query)?;
        let tail = format!("autocomplete/{}", path_segment(query));
        let payload: AutocompletePayload = self
            .http
            .get_json(&browser_path(short_name, version, &tail))
            .await?;
        Ok(payload.values)
    }

    pub async fn transcript(
        &self,
        short_name: &str,
        version: Option<&str>,
        transcript_id: &str,
    ) -> Result<TranscriptDetails> {
        let transcript_id = required("transcript", transcript_id)?;
        let tail = format!("transcript/{}", path_segment(transcript_id));
        self.http
            .get_json(&browser_path(short_name, version, &tail))
            .await
    }

    /// Genes in a region given as `chrom-start-stop`
    ///
    /// Malformed or oversized regions are rejected by the backend with 400.
    pub async fn region(
        &self,
        short_name: &str,
        version: Option<&str>,
        region: &str,
    ) -> Result<RegionDetails> {
        let region = required("region", region)?;
        let tail = format!("region/{}", path_segment(region));
        self.http
            .get_json(&browser_path(short_name, version, &tail))
            .await
    }

    pub async fn variants(
        &self,
        short_name: &str,
        version: Option<&str>,
        source: VariantSource,
        item: &str,
    ) -> Result<VariantList> {
        let item = required(source.as_str(), item)?;
        let tail = format!("variants/{}/{}", source, path_segment(item));
        let list: VariantList = self
            .http
            .get_json(&browser_path(short_name, version, &tail))
            .await?;

        tracing::debug!(
            "{} varianti per {} {} in {}",
            list.variants.len(),
            source,
            item,
            short_name
        );
        Ok(list)
    }
}
