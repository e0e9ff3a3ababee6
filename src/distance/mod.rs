//! Distance lookup between two addresses.
//!
//! The pricing core never does I/O; callers resolve a distance through a
//! [`DistanceLookup`] first and hand the result to the pricing functions.

pub mod matrix;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

pub use matrix::DistanceMatrixClient;

/// Road distance and travel time between two addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceEstimate {
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_km: Decimal,
    pub duration_minutes: i64,
}

/// Why a distance could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    #[error("Origin and destination addresses are required")]
    MissingAddress,

    #[error("No distance provider credential is configured")]
    MissingCredential,

    #[error("Distance provider returned status {0}")]
    ProviderStatus(String),

    #[error("Distance provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Distance provider response could not be read: {0}")]
    Decode(String),
}

impl DistanceError {
    /// Short machine-readable tag for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            DistanceError::MissingAddress => "missing_address",
            DistanceError::MissingCredential => "missing_credential",
            DistanceError::ProviderStatus(_) => "provider_status",
            DistanceError::Transport(_) => "transport",
            DistanceError::Decode(_) => "decode",
        }
    }
}

/// Resolves road distances. Implementations must not retry; the caller decides.
#[async_trait]
pub trait DistanceLookup: Send + Sync {
    async fn lookup_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<DistanceEstimate, DistanceError>;
}

/// Reject blank addresses before anything goes over the wire.
pub fn require_addresses(origin: &str, destination: &str) -> Result<(), DistanceError> {
    if origin.trim().is_empty() || destination.trim().is_empty() {
        return Err(DistanceError::MissingAddress);
    }
    Ok(())
}
