//! Recall registry client
//!
//! Fetches raw recall records for a vehicle from the NHTSA
//! `recallsByVehicle` endpoint (or any endpoint speaking the same shape).
//! One GET per lookup, no retries.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::domain::{RecallRecord, VehicleIdentifier};
use crate::error::{ClearPathError, Result};

/// Source of recall records for a vehicle.
///
/// Implementations make at most one upstream call per `fetch` and hold no
/// state across calls.
#[async_trait]
pub trait RecallFetcher: Send + Sync {
    /// Fetch every recall the registry lists for `vehicle`, in registry order.
    async fn fetch(&self, vehicle: &VehicleIdentifier) -> Result<Vec<RecallRecord>>;
}

/// HTTPS client for the recall registry
pub struct RecallClient {
    config: RegistryConfig,
    http_client: reqwest::Client,
}

impl RecallClient {
    /// Create a new registry client
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("clearpath/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClearPathError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(RecallClient {
            config,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl RecallFetcher for RecallClient {
    async fn fetch(&self, vehicle: &VehicleIdentifier) -> Result<Vec<RecallRecord>> {
        debug!(endpoint = %self.config.endpoint, vehicle = %vehicle, "querying recall registry");

        let response = self
            .http_client
            .get(&self.config.endpoint)
            .query(&[
                ("make", vehicle.make.as_str()),
                ("model", vehicle.model.as_str()),
                ("modelYear", vehicle.year.as_str()),
            ])
            .send()
            .await
            .map_err(ClearPathError::registry_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "recall registry returned an error status");
            return Err(ClearPathError::RegistryUnavailable(format!(
                "registry returned HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(ClearPathError::registry_transport)?;

        parse_results(&body)
    }
}

/// Registry response envelope; only `results` is read.
#[derive(Debug, Deserialize)]
struct RecallsResponse {
    results: Option<Vec<Value>>,
}

/// Decode a registry response body into typed records.
///
/// A missing `results` key (or `null`) means no recalls. Anything else that
/// is not an array of well-formed record objects is malformed.
pub fn parse_results(body: &str) -> Result<Vec<RecallRecord>> {
    let response: RecallsResponse = serde_json::from_str(body).map_err(|e| {
        ClearPathError::RegistryMalformedResponse(format!("unexpected response body: {e}"))
    })?;

    response
        .results
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, item)| RecallRecord::from_json(index, item))
        .collect()
}
