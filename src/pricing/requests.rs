//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

use super::services::AddressQuoteInput;

/// Request to price a delivery with a known distance
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub service_type: String,
    pub weight_kg: f64,
    pub distance_km: f64,
    #[serde(default)]
    pub fuel_levy_percent: Option<f64>,
}

/// Request to price a delivery between two addresses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuoteRequest {
    pub service_type: String,
    pub weight_kg: f64,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub fuel_levy_percent: Option<f64>,
    #[serde(default)]
    pub fallback_distance_km: Option<f64>,
}

impl From<AddressQuoteRequest> for AddressQuoteInput {
    fn from(request: AddressQuoteRequest) -> Self {
        Self {
            service_type: request.service_type,
            weight_kg: request.weight_kg,
            origin: request.origin,
            destination: request.destination,
            fuel_levy_percent: request.fuel_levy_percent,
            fallback_distance_km: request.fallback_distance_km,
        }
    }
}
