use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

impl From<PricingError> for ErrorResponse {
    fn from(e: PricingError) -> Self {
        Self { error: e.to_string() }
    }
}

/// HTTP status for each error kind
pub fn status_for(e: &PricingError) -> StatusCode {
    match e {
        PricingError::RateNotFound { .. } | PricingError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        PricingError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        PricingError::MissingProductAttributes { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PricingError::Feed(_) => StatusCode::BAD_GATEWAY,
        PricingError::CorruptRate(_) | PricingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn pricing_error(e: PricingError) -> ApiError {
    (status_for(&e), Json(e.into()))
}
