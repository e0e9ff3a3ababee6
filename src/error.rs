//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::distance::DistanceError;
use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::{PricingError, QuoteError};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Pricing(PricingError::InvalidInput { .. })
            | AppError::Quote(QuoteError::Pricing(PricingError::InvalidInput { .. })) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
            }
            AppError::Pricing(PricingError::UnknownServiceType(_))
            | AppError::Quote(QuoteError::Pricing(PricingError::UnknownServiceType(_))) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unknown_service_type")
            }
            AppError::Quote(QuoteError::DistanceUnavailable(err)) => match err {
                DistanceError::MissingAddress => (StatusCode::UNPROCESSABLE_ENTITY, "distance_unavailable"),
                DistanceError::MissingCredential => (StatusCode::SERVICE_UNAVAILABLE, "distance_unavailable"),
                DistanceError::ProviderStatus(_)
                | DistanceError::Transport(_)
                | DistanceError::Decode(_) => (StatusCode::BAD_GATEWAY, "distance_unavailable"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let details = match &self {
            AppError::Pricing(PricingError::InvalidInput { field, .. })
            | AppError::Quote(QuoteError::Pricing(PricingError::InvalidInput { field, .. })) => {
                Some(serde_json::json!({ "field": field }))
            }
            AppError::Quote(QuoteError::DistanceUnavailable(err)) => {
                Some(serde_json::json!({ "cause": err.kind() }))
            }
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", error_type, self);
        } else {
            tracing::debug!("{}: {}", error_type, self);
        }

        let body = PricingErrorResponse {
            error_type: error_type.to_string(),
            message: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
