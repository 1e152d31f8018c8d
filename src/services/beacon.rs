//! Client del beacon: query di presenza di un allele con log di sessione

use std::sync::Mutex;

use tokio::sync::OnceCell;

use crate::error::Result;
use crate::models::{
    BeaconInfo, BeaconQuery, BeaconQueryPayload, BeaconRecord, BeaconResponse, BeaconState,
};
use crate::services::http::PortalClient;
use crate::utils::validate_beacon_query;

/// Beacon query client for one session
///
/// Positions are 1-based on this side and 0-based on the backend. The
/// translation happens once on the way out (`to_backend_position`) and once
/// on the echoed answer (`from_backend_position`), nowhere else.
#[derive(Debug)]
pub struct BeaconClient {
    http: PortalClient,
    info: OnceCell<BeaconInfo>,
    log: Mutex<Vec<BeaconRecord>>,
}

fn to_backend_position(position: u64) -> u64 {
    position - 1
}

fn from_backend_position(position: u64) -> u64 {
    position.saturating_add(1)
}

impl BeaconClient {
    pub fn new(http: PortalClient) -> Self {
        Self {
            http,
            info: OnceCell::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Beacon info payload, fetched once per session
    pub async fn info(&self) -> Result<&BeaconInfo> {
        self.info
            .get_or_try_init(|| async {
                tracing::debug!("Caricamento info beacon");
                self.http.get_json::<BeaconInfo>("/api/beacon/info").await
            })
            .await
    }

    /// Reference genomes the beacon serves for `dataset_id`
    pub async fn get_beacon_references(&self, dataset_id: &str) -> Result<Vec<String>> {
        Ok(self.info().await?.references_for(dataset_id))
    }

    /// Runs a query and appends its outcome to the session log
    ///
    /// Only local validation errors are returned as `Err`; nothing is logged
    /// for them. Backend and transport failures are logged with state
    /// `Error` and the query echoed from the request parameters.
    pub async fn query(&self, query: BeaconQuery) -> Result<BeaconRecord> {
        validate_beacon_query(&query)?;

        let params = [
            ("chrom", query.chromosome.clone()),
            ("pos", to_backend_position(query.position).to_string()),
            ("allele", query.allele.clone()),
            ("referenceAllele", query.reference_allele.clone()),
            ("dataset", query.dataset_id.clone()),
            ("ref", query.reference_genome.clone()),
        ];

        let record = match self
            .http
            .get_json_query::<BeaconQueryPayload>("/api/beacon/query", &params)
            .await
        {
            Ok(payload) => record_from_payload(query, payload),
            Err(e) => {
                tracing::warn!("Query beacon fallita: {}", e);
                BeaconRecord {
                    query,
                    response: BeaconResponse::failed(e.to_string()),
                }
            }
        };

        tracing::info!(
            "Beacon {}:{} {}>{} -> {}",
            record.query.chromosome,
            record.query.position,
            record.query.reference_allele,
            record.query.allele,
            record.response.state
        );

        self.lock_log().push(record.clone());
        Ok(record)
    }

    /// Snapshot of the session log, oldest first
    pub fn records(&self) -> Vec<BeaconRecord> {
        self.lock_log().clone()
    }

    fn lock_log(&self) -> std::sync::MutexGuard<'_, Vec<BeaconRecord>> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn record_from_payload(sent: BeaconQuery, payload: BeaconQueryPayload) -> BeaconRecord {
    let state = BeaconState::from_exists(payload.exists());
    let (observed, external_url) = match &payload.response {
        Some(r) => (r.observed, r.external_url.clone()),
        None => (None, None),
    };

    let query = match payload.query {
        Some(echo) => BeaconQuery {
            chromosome: echo.chromosome,
            position: from_backend_position(echo.position),
            allele: echo.allele,
            reference_allele: echo.reference_allele,
            reference_genome: echo.reference.unwrap_or(sent.reference_genome),
            dataset_id: echo.dataset.unwrap_or(sent.dataset_id),
        },
        // Nessuna eco dal backend: la query inviata è già 1-based
        None => sent,
    };

    BeaconRecord {
        query,
        response: BeaconResponse {
            state,
            observed,
            external_url,
            error: None,
        },
    }
}
