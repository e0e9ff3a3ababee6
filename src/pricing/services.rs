//! Quote service functions.
//!
//! These functions sit between the HTTP layer and the pure calculators: they
//! validate raw input, resolve distances (cache first) and price the result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::distance::{DistanceError, DistanceEstimate, DistanceLookup};

use super::calculators::{compute_price, PriceBreakdown};
use super::models::{DistanceKm, PricingRequest, QuotePolicy, ServiceType, WeightKg};

/// Pricing input error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Unknown service type '{0}'")]
    UnknownServiceType(String),
}

/// Address quote error types
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Distance unavailable: {0}")]
    DistanceUnavailable(#[source] DistanceError),
}

/// Price a delivery from raw caller input.
///
/// The policy decides whether an unknown service type falls back to standard
/// pricing or is rejected, and which fuel levy applies when none is given.
pub fn quote(
    service_type: &str,
    weight_kg: f64,
    distance_km: f64,
    fuel_levy_percent: Option<f64>,
    policy: &QuotePolicy,
) -> Result<PriceBreakdown, PricingError> {
    let request =
        PricingRequest::from_raw(service_type, weight_kg, distance_km, fuel_levy_percent, policy)?;
    Ok(compute_price(&request))
}

/// Where the priced distance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Provider,
    Cache,
    Manual,
}

/// Input for an address-based quote
#[derive(Debug, Clone)]
pub struct AddressQuoteInput {
    pub service_type: String,
    pub weight_kg: f64,
    pub origin: String,
    pub destination: String,
    pub fuel_levy_percent: Option<f64>,
    /// Distance to price with if the lookup fails.
    pub fallback_distance_km: Option<f64>,
}

/// Result of an address-based quote
#[derive(Debug, Clone)]
pub struct AddressQuote {
    pub quote_id: Uuid,
    pub quoted_at: DateTime<Utc>,
    pub service_type: ServiceType,
    pub breakdown: PriceBreakdown,
    pub distance_km: Decimal,
    pub duration_minutes: Option<i64>,
    pub distance_source: DistanceSource,
    /// Lookup failure that caused the manual fallback, if any.
    pub lookup_error: Option<String>,
}

/// Resolve a route distance, checking the cache before the provider.
///
/// Only successful lookups are cached.
pub async fn resolve_distance(
    cache: &AppCache,
    lookup: &dyn DistanceLookup,
    origin: &str,
    destination: &str,
) -> Result<(DistanceEstimate, DistanceSource), DistanceError> {
    let cache_key = AppCache::route_key(origin, destination);

    if let Some(cached) = cache.distances.get(&cache_key).await {
        debug!("Cache HIT for route: {}", cache_key);
        return Ok(((*cached).clone(), DistanceSource::Cache));
    }

    debug!("Cache MISS for route: {}", cache_key);
    let estimate = lookup.lookup_distance(origin, destination).await?;
    cache
        .distances
        .insert(cache_key, Arc::new(estimate.clone()))
        .await;

    Ok((estimate, DistanceSource::Provider))
}

/// Quote a delivery between two addresses.
///
/// Weight, levy and service type are validated before any lookup is made. When
/// the lookup fails the caller's fallback distance is used if one was given;
/// otherwise the failure is returned as `DistanceUnavailable`.
pub async fn quote_by_address(
    cache: &AppCache,
    lookup: &dyn DistanceLookup,
    input: &AddressQuoteInput,
    policy: &QuotePolicy,
) -> Result<AddressQuote, QuoteError> {
    let service_type = ServiceType::parse_with(&input.service_type, policy.parsing)?;
    let weight = WeightKg::new(input.weight_kg)?;
    let fuel_levy_percent = policy.fuel_levy(input.fuel_levy_percent)?;
    let fallback = input.fallback_distance_km.map(DistanceKm::new).transpose()?;

    let (distance, duration_minutes, distance_source, lookup_error) =
        match resolve_distance(cache, lookup, &input.origin, &input.destination).await {
            Ok((estimate, source)) => (
                DistanceKm::from_decimal(estimate.distance_km)?,
                Some(estimate.duration_minutes),
                source,
                None,
            ),
            Err(err) => match fallback {
                Some(manual) => {
                    warn!(
                        "Distance lookup failed ({}), pricing with manual distance {} km",
                        err,
                        manual.value()
                    );
                    (manual, None, DistanceSource::Manual, Some(err.to_string()))
                }
                None => return Err(QuoteError::DistanceUnavailable(err)),
            },
        };

    let request = PricingRequest {
        service_type,
        weight,
        distance,
        fuel_levy_percent,
    };
    let breakdown = compute_price(&request);

    info!(
        "Quoted {} {} kg over {} km ({:?}): total {}",
        service_type,
        weight.value(),
        distance.value(),
        distance_source,
        breakdown.total
    );

    Ok(AddressQuote {
        quote_id: Uuid::new_v4(),
        quoted_at: Utc::now(),
        service_type,
        breakdown,
        distance_km: distance.value(),
        duration_minutes,
        distance_source,
        lookup_error,
    })
}
