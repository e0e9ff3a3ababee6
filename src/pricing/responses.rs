//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::calculators::PriceBreakdown;
use super::models::ServiceType;
use super::rates::RateCardRow;
use super::services::{AddressQuote, DistanceSource};

/// Response for an address-based quote
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuoteResponse {
    pub quote_id: Uuid,
    pub quoted_at: DateTime<Utc>,
    pub service_type: ServiceType,
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_km: Decimal,
    pub duration_minutes: Option<i64>,
    pub distance_source: DistanceSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_error: Option<String>,
    pub breakdown: PriceBreakdown,
}

impl From<AddressQuote> for AddressQuoteResponse {
    fn from(quote: AddressQuote) -> Self {
        Self {
            quote_id: quote.quote_id,
            quoted_at: quote.quoted_at,
            service_type: quote.service_type,
            distance_km: quote.distance_km,
            duration_minutes: quote.duration_minutes,
            distance_source: quote.distance_source,
            lookup_error: quote.lookup_error,
            breakdown: quote.breakdown,
        }
    }
}

/// Response for the published rate card
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardResponse {
    pub currency: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_fuel_levy_percent: Decimal,
    pub rows: Vec<RateCardRow>,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
