//! Metal Rate Sync Job
//!
//! Periodically refreshes the canonical metal rates (live feed when
//! configured, static dataset otherwise) and reprices the catalog.

use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

use crate::error::PricingResult;
use crate::services::metal_price_feed::MetalPriceFeed;
use crate::services::metal_rates::{MetalRateStore, RefreshSummary};
use crate::services::recalculation::{RecalculationService, RecalculationSummary};
use crate::services::sync_status::{self, jobs};
use crate::AppState;

/// Refresh rates, then reprice every metal-based product. The rate writes
/// stand even when the repricing pass cannot read the catalog.
pub async fn refresh_and_reprice(
    rates: &MetalRateStore,
    feed: Option<&MetalPriceFeed>,
    recalculation: &RecalculationService,
) -> (RefreshSummary, PricingResult<RecalculationSummary>) {
    let refresh = rates.refresh_rates(feed).await;
    let summary = recalculation.recalculate_all_metal_based_products().await;
    (refresh, summary)
}

pub async fn start_metal_rate_sync_job(state: AppState, interval_secs: u64) {
    if interval_secs == 0 {
        info!("Metal rate sync job disabled");
        return;
    }

    let min_interval_secs = i32::try_from(interval_secs).unwrap_or(i32::MAX);

    tokio::spawn(async move {
        info!(interval_secs, live_feed = state.feed.is_some(), "Metal rate sync job started");

        let mut interval = interval(Duration::from_secs(interval_secs));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping metal rate sync job");
                    break;
                }
                _ = interval.tick() => {
                    match sync_status::should_sync(&state.db, jobs::METAL_RATE_SYNC, min_interval_secs).await {
                        Ok(true) => run_once(&state, min_interval_secs).await,
                        Ok(false) => {}
                        Err(e) => {
                            warn!("Failed to check sync status, running sync anyway: {}", e);
                            run_once(&state, min_interval_secs).await;
                        }
                    }
                }
            }
        }

        info!("Metal rate sync job stopped");
    });
}

async fn run_once(state: &AppState, min_interval_secs: i32) {
    info!("Starting scheduled metal rate sync");
    let started_at = Utc::now().naive_utc();

    let (refresh, recalculation) =
        refresh_and_reprice(&state.rates, state.feed.as_ref(), &state.recalculation).await;
    let failed_rates = refresh.reports.iter().filter(|r| !r.outcome.is_applied()).count();

    let result = match (&refresh.feed_error, recalculation) {
        (_, Err(e)) => {
            error!(source = %refresh.source_label, failed_rates, "Scheduled repricing failed: {}", e);
            sync_status::record_failure(&state.db, jobs::METAL_RATE_SYNC, &e.to_string(), min_interval_secs).await
        }
        (feed_error, Ok(summary)) => {
            info!(
                source = %refresh.source_label,
                failed_rates,
                updated = summary.updated,
                errors = summary.errors,
                "Scheduled metal rate sync complete"
            );
            match feed_error {
                Some(feed_error) => {
                    sync_status::record_failure(&state.db, jobs::METAL_RATE_SYNC, feed_error, min_interval_secs)
                        .await
                }
                None => {
                    sync_status::record_success_at(&state.db, jobs::METAL_RATE_SYNC, min_interval_secs, started_at)
                        .await
                }
            }
        }
    };

    if let Err(e) = result {
        warn!("Failed to record sync status: {}", e);
    }
}
