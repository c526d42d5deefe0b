//! POST /api/pricing/calculate
//!
//! Price preview for the admin product form. Nothing is persisted.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::entities::sea_orm_active_enums::Market;
use crate::models::error::{api_error, pricing_error, ApiError};
use crate::models::pricing::CalculatePricingRequest;
use crate::services::pricing::{normalize_purity, PricingCalculation};
use crate::AppState;

pub async fn calculate_pricing(
    State(state): State<AppState>,
    Json(request): Json<CalculatePricingRequest>,
) -> Result<Json<PricingCalculation>, ApiError> {
    if let Err(e) = request.validate() {
        warn!(error = %e, "Invalid pricing request");
        return Err(api_error(StatusCode::BAD_REQUEST, e));
    }

    let purity = normalize_purity(&request.purity);

    let calculation = state
        .recalculation
        .calculator()
        .calculate_product_pricing(
            request.metal_type,
            &purity,
            request.gross_weight,
            request.net_weight,
            request.making_charges_percentage,
            request.market.unwrap_or(Market::India),
        )
        .await
        .map_err(pricing_error)?;

    Ok(Json(calculation))
}
