//! Pricing API route handlers

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::calculators::{PriceBreakdown, GST_RATE};
use super::rates::rate_card;
use super::requests::{AddressQuoteRequest, QuoteRequest};
use super::responses::{AddressQuoteResponse, RateCardResponse};
use super::services::{self, AddressQuoteInput};

/// Pricing routes, mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/quote/by-address", post(quote_by_address))
        .route("/rate-card", get(get_rate_card))
        .route("/cache", delete(flush_distance_cache))
}

/// Price a delivery with a caller-supplied distance
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<PriceBreakdown>> {
    let breakdown = services::quote(
        &request.service_type,
        request.weight_kg,
        request.distance_km,
        request.fuel_levy_percent,
        &state.config.quote_policy(),
    )?;
    tracing::debug!(
        "Quote {} {}kg {}km -> {}",
        request.service_type,
        request.weight_kg,
        request.distance_km,
        breakdown.total
    );
    Ok(Json(breakdown))
}

/// Price a delivery between two addresses
async fn quote_by_address(
    State(state): State<AppState>,
    Json(request): Json<AddressQuoteRequest>,
) -> Result<Json<AddressQuoteResponse>> {
    let input: AddressQuoteInput = request.into();
    let quote = services::quote_by_address(
        &state.cache,
        state.distance.as_ref(),
        &input,
        &state.config.quote_policy(),
    )
    .await?;
    Ok(Json(quote.into()))
}

/// Published rate card
async fn get_rate_card(State(state): State<AppState>) -> Json<RateCardResponse> {
    Json(RateCardResponse {
        currency: "AUD",
        gst_rate: GST_RATE,
        default_fuel_levy_percent: state.config.default_fuel_levy_percent.value(),
        rows: rate_card(),
    })
}

/// Drop every cached distance so the next address quote asks the provider again
async fn flush_distance_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT
}
