//! Product endpoints used by the admin catalog screens.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::entities::products;
use crate::error::PricingError;
use crate::models::error::{api_error, pricing_error, ApiError};
use crate::models::product::{ProductListResponse, UpdateMetalAttributesRequest};
use crate::services::product_storage::ProductUpdate;
use crate::services::recalculation::RecalculationSummary;
use crate::AppState;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let products = state.products.get_all_products().await.map_err(|e| {
        error!(error = %e, "Failed to load products");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", e))
    })?;

    Ok(Json(ProductListResponse {
        total: products.len(),
        products,
    }))
}

/// PUT /api/products/{id}/metal-attributes
///
/// Stores the weight/purity/type fields and, for metal-price-based
/// products, reprices immediately from the current rates.
pub async fn update_metal_attributes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateMetalAttributesRequest>,
) -> Result<Json<products::Model>, ApiError> {
    if let Err(e) = request.validate() {
        warn!(product_id = id, error = %e, "Invalid metal attributes");
        return Err(api_error(StatusCode::BAD_REQUEST, e));
    }

    let existing = state
        .products
        .get_product(id)
        .await
        .map_err(|e| pricing_error(e.into()))?
        .ok_or_else(|| pricing_error(PricingError::ProductNotFound(id)))?;

    let attributes = request.into_attributes();
    let reprice = attributes.is_metal_price_based;

    // Price first so a missing rate rejects the edit instead of leaving a stale price
    let mut candidate = existing;
    candidate.metal_type = Some(attributes.metal_type);
    candidate.purity = Some(attributes.purity.clone());
    candidate.gross_weight = Some(attributes.gross_weight);
    candidate.net_weight = Some(attributes.net_weight);
    candidate.making_charges_percentage = attributes.making_charges_percentage;

    let prices = if reprice {
        Some(
            state
                .recalculation
                .price_for_markets(&candidate)
                .await
                .map_err(pricing_error)?,
        )
    } else {
        None
    };

    let update = ProductUpdate {
        metal_attributes: Some(attributes),
        price_inr: prices.map(|p| p.price_inr),
        price_bhd: prices.map(|p| p.price_bhd),
    };

    let updated = state
        .products
        .update_product(id, update)
        .await
        .map_err(|e| pricing_error(e.into()))?;

    info!(
        product_id = id,
        repriced = reprice,
        price_inr = %updated.price_inr,
        price_bhd = %updated.price_bhd,
        "Updated product metal attributes"
    );

    Ok(Json(updated))
}

pub async fn recalculate_products(
    State(state): State<AppState>,
) -> Result<Json<RecalculationSummary>, ApiError> {
    let summary = state
        .recalculation
        .recalculate_all_metal_based_products()
        .await
        .map_err(pricing_error)?;

    Ok(Json(summary))
}
