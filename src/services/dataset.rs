//! Dataset resolver: catalog, single dataset with study, versions and files

use crate::error::{PortalError, Result};
use crate::models::{
    CollectionPayload, Dataset, DatasetFile, DatasetListPayload, DatasetPayload, DatasetSummary,
    DatasetVersion, DatasetVersionEntry, FileListPayload, ResolvedDataset, TrustedHtml,
    VersionListPayload, VersionPayload,
};
use crate::services::http::PortalClient;
use crate::utils::{capitalize_first, path_segment};

#[derive(Debug, Clone)]
pub struct DatasetResolver {
    http: PortalClient,
}

/// Treats `Some("")` like a missing version, as the route layer does
fn non_empty(version: Option<&str>) -> Option<&str> {
    version.filter(|v| !v.trim().is_empty())
}

/// Path of a dataset, optionally pinned to a version, with an optional suffix
fn dataset_path(short_name: &str, version: Option<&str>, suffix: &str) -> String {
    let mut path = format!("/api/datasets/{}", path_segment(short_name));
    if let Some(version) = version {
        path.push_str("/versions/");
        path.push_str(&path_segment(version));
    }
    path.push_str(suffix);
    path
}

// Unico punto in cui l'HTML del backend diventa fidato
fn trust_version(raw: VersionPayload) -> DatasetVersion {
    DatasetVersion {
        version_id: raw.version,
        description: TrustedHtml::new(raw.description),
        terms: TrustedHtml::new(raw.terms),
        available_from: raw.available_from,
    }
}

fn dataset_from_payload(raw: DatasetPayload) -> Dataset {
    Dataset {
        short_name: raw.short_name,
        full_name: raw.full_name,
        version: trust_version(raw.version),
        authorization_level: raw.authorization_level,
        is_admin: raw.is_admin,
        browser_uri: raw.browser_uri,
    }
}

fn summary_from_payload(raw: DatasetPayload) -> DatasetSummary {
    let url_base = if raw.future {
        format!("/dataset/{}/version/{}", raw.short_name, raw.version.version)
    } else {
        format!("/dataset/{}", raw.short_name)
    };

    DatasetSummary {
        short_name: raw.short_name,
        full_name: raw.full_name,
        future: raw.future,
        version: trust_version(raw.version),
        url_base,
    }
}

impl DatasetResolver {
    pub fn new(http: PortalClient) -> Self {
        Self { http }
    }

    /// Resolves a dataset page view-model
    ///
    /// Dataset metadata and the collection/study record are fetched
    /// concurrently and joined; a failure of either yields the single
    /// `NotFound` rejection, never a partial result.
    pub async fn resolve_dataset(
        &self,
        short_name: &str,
        version: Option<&str>,
    ) -> Result<ResolvedDataset> {
        let version = non_empty(version);
        if short_name.trim().is_empty() {
            return Err(PortalError::dataset_not_found(short_name, version));
        }

        let dataset_uri = dataset_path(short_name, version, "");
        let collection_uri = dataset_path(short_name, None, "/collection");

        let joined = futures::try_join!(
            self.http.get_json::<DatasetPayload>(&dataset_uri),
            self.http.get_json::<CollectionPayload>(&collection_uri),
        );

        let (dataset, collection) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("Risoluzione dataset {} fallita: {}", short_name, e);
                return Err(PortalError::dataset_not_found(short_name, version));
            }
        };

        let contact_name_display = capitalize_first(&collection.study.contact_name);

        Ok(ResolvedDataset {
            dataset: dataset_from_payload(dataset),
            collections: collection.collections,
            study: collection.study,
            contact_name_display,
        })
    }

    /// Catalog shown on the home page
    pub async fn list_datasets(&self) -> Result<Vec<DatasetSummary>> {
        let payload: DatasetListPayload = self.http.get_json("/api/datasets").await?;
        Ok(payload.data.into_iter().map(summary_from_payload).collect())
    }

    /// Versions of a dataset in backend order, with `active_version` flagged
    pub async fn list_versions(
        &self,
        short_name: &str,
        active_version: Option<&str>,
    ) -> Result<Vec<DatasetVersionEntry>> {
        let path = dataset_path(short_name, None, "/versions");
        let payload: VersionListPayload = self.http.get_json(&path).await?;

        let mut versions = payload.data;
        if let Some(active) = non_empty(active_version) {
            if let Some(entry) = versions.iter_mut().find(|v| v.name == active) {
                entry.active = true;
            }
        }
        Ok(versions)
    }

    /// Downloadable files of a dataset, or of one of its versions
    pub async fn list_files(
        &self,
        short_name: &str,
        version: Option<&str>,
    ) -> Result<Vec<DatasetFile>> {
        let path = dataset_path(short_name, non_empty(version), "/files");
        let payload: FileListPayload = self.http.get_json(&path).await?;
        Ok(payload.files)
    }
}
