//! Distance-Matrix HTTP client.
//!
//! Speaks the Google Distance Matrix JSON format: a top-level `status`, then
//! `rows[0].elements[0]` with its own `status`, `distance.value` in metres and
//! `duration.value` in seconds.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{require_addresses, DistanceError, DistanceEstimate, DistanceLookup};
use crate::pricing::round_money;

pub const DEFAULT_DISTANCE_MATRIX_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<MatrixValue>,
    duration: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    value: i64,
}

/// Parse a Distance-Matrix response body into an estimate.
pub fn parse_matrix_response(body: &str) -> Result<DistanceEstimate, DistanceError> {
    let response: MatrixResponse =
        serde_json::from_str(body).map_err(|e| DistanceError::Decode(e.to_string()))?;

    if response.status != "OK" {
        return Err(DistanceError::ProviderStatus(response.status));
    }

    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| DistanceError::Decode("response has no elements".to_string()))?;

    if element.status != "OK" {
        return Err(DistanceError::ProviderStatus(element.status));
    }

    let metres = element
        .distance
        .ok_or_else(|| DistanceError::Decode("element has no distance".to_string()))?
        .value;
    let seconds = element.duration.map(|d| d.value).unwrap_or(0);

    Ok(DistanceEstimate {
        distance_km: round_money(Decimal::new(metres, 3), 2),
        duration_minutes: seconds.saturating_add(30) / 60,
    })
}

/// Distance lookup backed by a Distance-Matrix endpoint.
#[derive(Clone)]
pub struct DistanceMatrixClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DistanceMatrixClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DistanceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl DistanceLookup for DistanceMatrixClient {
    async fn lookup_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DistanceEstimate, DistanceError> {
        require_addresses(origin, destination)?;
        let api_key = self.api_key.as_deref().ok_or(DistanceError::MissingCredential)?;

        debug!("Distance lookup: {} -> {}", origin, destination);
        let body = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("units", "metric"),
                ("key", api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_matrix_response(&body).inspect_err(|e| {
            warn!("Distance lookup failed for {} -> {}: {}", origin, destination, e);
        })
    }
}
