//! Metal rate endpoints
//!
//! GET  /api/metal-rates                 current rates, optional `?market=`
//! GET  /api/metal-rates/all             every stored row
//! POST /api/metal-rates/update          refresh from feed or static dataset
//! POST /api/metal-rates/manual-update   admin-entered rates
//!
//! Both write endpoints reprice the catalog before responding. Once rates
//! are written the response is 200 with the per-slot report, even if the
//! repricing pass then fails; `success` is false in that case.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::jobs::metal_rate_sync::refresh_and_reprice;
use crate::models::error::{api_error, pricing_error, ApiError};
use crate::models::metal_rate::{
    ManualRateUpdate, MetalRatesQuery, MetalRatesResponse, RateUpdateResponse, RateWriteEntry,
};
use crate::services::metal_rates::{RateSource, RateWriteReport, MANUAL_UPDATE_LABEL};
use crate::error::PricingResult;
use crate::services::recalculation::RecalculationSummary;
use crate::AppState;

pub async fn get_metal_rates(
    State(state): State<AppState>,
    Query(query): Query<MetalRatesQuery>,
) -> Result<Json<MetalRatesResponse>, ApiError> {
    let market = query.market().map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let rates = state.rates.get_latest_rates(market).await.map_err(|e| {
        error!(error = %e, "Failed to load metal rates");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", e))
    })?;

    Ok(Json(MetalRatesResponse { rates }))
}

pub async fn get_all_metal_rates(
    State(state): State<AppState>,
) -> Result<Json<MetalRatesResponse>, ApiError> {
    let rates = state.rates.get_all_rates_from_db().await.map_err(|e| {
        error!(error = %e, "Failed to load metal rates");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", e))
    })?;

    Ok(Json(MetalRatesResponse { rates }))
}

pub async fn update_metal_rates(
    State(state): State<AppState>,
) -> Result<Json<RateUpdateResponse>, ApiError> {
    info!("Metal rate refresh requested");

    let (refresh, recalculation) =
        refresh_and_reprice(&state.rates, state.feed.as_ref(), &state.recalculation).await;

    Ok(Json(build_response(
        refresh.source,
        refresh.source_label,
        refresh.feed_error,
        &refresh.reports,
        recalculation,
    )))
}

pub async fn manual_update_metal_rates(
    State(state): State<AppState>,
    Json(update): Json<ManualRateUpdate>,
) -> Result<Json<RateUpdateResponse>, ApiError> {
    info!(?update, "Manual metal rate update requested");

    let reports = state
        .rates
        .apply_manual_update(&update)
        .await
        .map_err(pricing_error)?;

    let recalculation = state.recalculation.recalculate_all_metal_based_products().await;

    Ok(Json(build_response(
        RateSource::Manual,
        MANUAL_UPDATE_LABEL.to_string(),
        None,
        &reports,
        recalculation,
    )))
}

fn build_response(
    source: RateSource,
    source_label: String,
    feed_error: Option<String>,
    reports: &[RateWriteReport],
    recalculation: PricingResult<RecalculationSummary>,
) -> RateUpdateResponse {
    let rates: Vec<RateWriteEntry> = reports.iter().map(RateWriteEntry::from).collect();

    let (recalculation, recalculation_error) = match recalculation {
        Ok(summary) => (Some(summary), None),
        Err(e) => {
            warn!(error = %e, "Rates written but catalog repricing failed");
            (None, Some(e.to_string()))
        }
    };

    RateUpdateResponse {
        success: rates.iter().all(|r| r.success) && recalculation_error.is_none(),
        source,
        source_label,
        feed_error,
        rates,
        recalculation,
        recalculation_error,
    }
}
