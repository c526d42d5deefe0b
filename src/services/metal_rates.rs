//! Metal Rate Store
//!
//! Single source of truth for the current per-gram price of each
//! (metal, purity, market) triple. Every writer, whether the start-up seed,
//! an admin manual update or the live feed, goes through [`MetalRateStore::upsert_rate`],
//! which resolves conflicts on the unique triple index in one statement.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

use crate::entities::sea_orm_active_enums::{Market, MetalType};
use crate::entities::{metal_rates, prelude::*};
use crate::error::{PricingError, PricingResult};
use crate::models::metal_rate::ManualRateUpdate;
use crate::services::currency::PerGramPrices;
use crate::services::metal_price_feed::{usd_per_gram, MetalPriceFeed};

/// Provenance label for rows written from the built-in dataset
pub const STATIC_DATASET_LABEL: &str = "static fallback (2024-11 dataset)";

pub const MANUAL_UPDATE_LABEL: &str = "manual update";

/// Largest per-gram rate accepted from an admin or the feed, in the
/// market's own currency (USD for feed quotes)
pub const MAX_RATE_PER_GRAM: Decimal = dec!(10000000);

/// One of the six rate slots the storefront prices against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSlot {
    /// Key used by the admin manual-update form
    pub key: &'static str,
    pub metal: MetalType,
    pub purity: &'static str,
    pub market: Market,
}

pub const CANONICAL_SLOTS: [RateSlot; 6] = [
    RateSlot { key: "indiaGold22k", metal: MetalType::Gold, purity: "22K", market: Market::India },
    RateSlot { key: "indiaGold18k", metal: MetalType::Gold, purity: "18K", market: Market::India },
    RateSlot { key: "indiaSilver", metal: MetalType::Silver, purity: "925", market: Market::India },
    RateSlot { key: "bahrainGold22k", metal: MetalType::Gold, purity: "22K", market: Market::Bahrain },
    RateSlot { key: "bahrainGold18k", metal: MetalType::Gold, purity: "18K", market: Market::Bahrain },
    RateSlot { key: "bahrainSilver", metal: MetalType::Silver, purity: "925", market: Market::Bahrain },
];

/// Static India quotes, INR per gram
const INDIA_STATIC_INR: [(MetalType, &str, Decimal); 3] = [
    (MetalType::Gold, "22K", dec!(6563)),
    (MetalType::Gold, "18K", dec!(5370)),
    (MetalType::Silver, "925", dec!(78)),
];

/// Static Bahrain quotes, BHD per gram
const BAHRAIN_STATIC_BHD: [(MetalType, &str, Decimal); 3] = [
    (MetalType::Gold, "22K", dec!(29.500)),
    (MetalType::Gold, "18K", dec!(24.200)),
    (MetalType::Silver, "925", dec!(0.350)),
];

/// Result of a single rate write. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Applied,
    Failed { reason: String },
}

impl UpsertOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, UpsertOutcome::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWriteReport {
    pub metal: MetalType,
    pub purity: String,
    pub market: Market,
    pub outcome: UpsertOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Rows already existed; nothing was written
    AlreadySeeded { existing_rows: u64 },
    Seeded(Vec<RateWriteReport>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    LiveFeed,
    StaticFallback,
    Manual,
}

#[derive(Debug, Clone)]
pub struct RefreshSummary {
    pub source: RateSource,
    pub source_label: String,
    /// Why the live feed was not used, when one is configured
    pub feed_error: Option<String>,
    pub reports: Vec<RateWriteReport>,
}

/// The six canonical rows derived from the static per-market tables
pub fn fallback_rates() -> Vec<(MetalType, &'static str, Market, PerGramPrices)> {
    let india = INDIA_STATIC_INR
        .iter()
        .map(|(metal, purity, inr)| (*metal, *purity, Market::India, PerGramPrices::from_inr(*inr)));
    let bahrain = BAHRAIN_STATIC_BHD
        .iter()
        .map(|(metal, purity, bhd)| (*metal, *purity, Market::Bahrain, PerGramPrices::from_bhd(*bhd)));

    india.chain(bahrain).collect()
}

#[derive(Clone)]
pub struct MetalRateStore {
    db: DatabaseConnection,
}

impl MetalRateStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert or overwrite the row for (metal, purity, market) and stamp
    /// `last_updated`. Errors are logged and returned as [`UpsertOutcome::Failed`].
    pub async fn upsert_rate(
        &self,
        metal: MetalType,
        purity: &str,
        prices: &PerGramPrices,
        market: Market,
        source: &str,
    ) -> UpsertOutcome {
        match self.try_upsert(metal, purity, prices, market, source).await {
            Ok(()) => {
                tracing::debug!(
                    metal = %metal,
                    purity = purity,
                    market = %market,
                    inr = %prices.inr,
                    bhd = %prices.bhd,
                    "Upserted metal rate"
                );
                UpsertOutcome::Applied
            }
            Err(e) => {
                tracing::error!(
                    metal = %metal,
                    purity = purity,
                    market = %market,
                    error = %e,
                    "Failed to upsert metal rate"
                );
                UpsertOutcome::Failed { reason: e.to_string() }
            }
        }
    }

    async fn try_upsert(
        &self,
        metal: MetalType,
        purity: &str,
        prices: &PerGramPrices,
        market: Market,
        source: &str,
    ) -> Result<(), DbErr> {
        let row = metal_rates::ActiveModel {
            metal: Set(metal),
            purity: Set(purity.to_string()),
            market: Set(market),
            price_per_gram_inr: Set(prices.inr_string()),
            price_per_gram_bhd: Set(prices.bhd_string()),
            price_per_gram_usd: Set(prices.usd_string()),
            source: Set(source.to_string()),
            last_updated: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        MetalRates::insert(row)
            .on_conflict(
                OnConflict::columns([
                    metal_rates::Column::Metal,
                    metal_rates::Column::Purity,
                    metal_rates::Column::Market,
                ])
                .update_columns([
                    metal_rates::Column::PricePerGramInr,
                    metal_rates::Column::PricePerGramBhd,
                    metal_rates::Column::PricePerGramUsd,
                    metal_rates::Column::Source,
                    metal_rates::Column::LastUpdated,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    /// Seed the six canonical rows from the static dataset if the table is empty.
    pub async fn initialize_fallback_rates(&self) -> PricingResult<SeedOutcome> {
        let existing_rows = MetalRates::find().count(&self.db).await?;

        if existing_rows > 0 {
            tracing::info!(existing_rows, "Metal rates already initialized, skipping fallback seed");
            return Ok(SeedOutcome::AlreadySeeded { existing_rows });
        }

        tracing::info!("No metal rates found, seeding static fallback dataset");
        let reports = self.apply_static_rates().await;
        log_write_summary("fallback seed", &reports);

        Ok(SeedOutcome::Seeded(reports))
    }

    /// Write the static dataset over whatever is stored
    pub async fn apply_static_rates(&self) -> Vec<RateWriteReport> {
        let mut reports = Vec::with_capacity(CANONICAL_SLOTS.len());

        for (metal, purity, market, prices) in fallback_rates() {
            let outcome = self
                .upsert_rate(metal, purity, &prices, market, STATIC_DATASET_LABEL)
                .await;
            reports.push(RateWriteReport {
                metal,
                purity: purity.to_string(),
                market,
                outcome,
            });
        }

        reports
    }

    /// All rows, optionally restricted to one market
    pub async fn get_latest_rates(&self, market: Option<Market>) -> Result<Vec<metal_rates::Model>, DbErr> {
        let mut query = MetalRates::find();

        if let Some(market) = market {
            query = query.filter(metal_rates::Column::Market.eq(market));
        }

        query
            .order_by_asc(metal_rates::Column::Market)
            .order_by_asc(metal_rates::Column::Metal)
            .order_by_asc(metal_rates::Column::Purity)
            .all(&self.db)
            .await
    }

    pub async fn get_all_rates_from_db(&self) -> Result<Vec<metal_rates::Model>, DbErr> {
        MetalRates::find()
            .order_by_asc(metal_rates::Column::Id)
            .all(&self.db)
            .await
    }

    /// Apply admin-entered rates. All supplied values are validated before
    /// anything is written.
    pub async fn apply_manual_update(&self, update: &ManualRateUpdate) -> PricingResult<Vec<RateWriteReport>> {
        let mut entries = Vec::new();

        for slot in CANONICAL_SLOTS.iter() {
            if let Some(value) = update.value_for(slot.key) {
                if value <= Decimal::ZERO {
                    return Err(PricingError::InvalidAmount(format!(
                        "{} must be greater than zero, got {}",
                        slot.key, value
                    )));
                }
                if value > MAX_RATE_PER_GRAM {
                    return Err(PricingError::InvalidAmount(format!(
                        "{} cannot exceed {}, got {}",
                        slot.key, MAX_RATE_PER_GRAM, value
                    )));
                }
                entries.push((slot, value));
            }
        }

        if entries.is_empty() {
            return Err(PricingError::InvalidAmount("no rates supplied".to_string()));
        }

        let mut reports = Vec::with_capacity(entries.len());
        for (slot, value) in entries {
            let prices = PerGramPrices::from_native(slot.market, value);
            let outcome = self
                .upsert_rate(slot.metal, slot.purity, &prices, slot.market, MANUAL_UPDATE_LABEL)
                .await;
            reports.push(RateWriteReport {
                metal: slot.metal,
                purity: slot.purity.to_string(),
                market: slot.market,
                outcome,
            });
        }

        log_write_summary("manual update", &reports);
        Ok(reports)
    }

    /// Refresh the canonical slots from the live feed, or re-apply the static
    /// dataset when no feed is configured or the feed fails.
    pub async fn refresh_rates(&self, feed: Option<&MetalPriceFeed>) -> RefreshSummary {
        let feed_error = match feed {
            Some(feed) => match feed.fetch_spot_prices().await {
                Ok(spot) => {
                    let source_label = feed.source_label();
                    let mut reports = Vec::with_capacity(CANONICAL_SLOTS.len());

                    for slot in CANONICAL_SLOTS.iter() {
                        let outcome = match usd_per_gram(&spot, slot.metal, slot.purity) {
                            Some(usd) if usd > MAX_RATE_PER_GRAM => UpsertOutcome::Failed {
                                reason: format!("feed quote {} USD/g is out of range", usd),
                            },
                            Some(usd) => {
                                let prices = PerGramPrices::from_usd(usd);
                                self.upsert_rate(slot.metal, slot.purity, &prices, slot.market, &source_label)
                                    .await
                            }
                            None => UpsertOutcome::Failed {
                                reason: format!("unsupported purity '{}'", slot.purity),
                            },
                        };
                        reports.push(RateWriteReport {
                            metal: slot.metal,
                            purity: slot.purity.to_string(),
                            market: slot.market,
                            outcome,
                        });
                    }

                    log_write_summary("live feed refresh", &reports);
                    return RefreshSummary {
                        source: RateSource::LiveFeed,
                        source_label,
                        feed_error: None,
                        reports,
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Live metal price feed failed, falling back to static dataset");
                    Some(e.to_string())
                }
            },
            None => {
                tracing::info!("No live metal price feed configured, applying static dataset");
                None
            }
        };

        let reports = self.apply_static_rates().await;
        log_write_summary("static refresh", &reports);

        RefreshSummary {
            source: RateSource::StaticFallback,
            source_label: STATIC_DATASET_LABEL.to_string(),
            feed_error,
            reports,
        }
    }
}

fn log_write_summary(operation: &str, reports: &[RateWriteReport]) {
    let failed: Vec<String> = reports
        .iter()
        .filter(|r| !r.outcome.is_applied())
        .map(|r| format!("{} {} {}", r.market, r.metal, r.purity))
        .collect();

    if failed.is_empty() {
        tracing::info!("{}: {} rates written", operation, reports.len());
    } else {
        tracing::warn!(
            "{}: {} of {} rates failed: {:?}",
            operation,
            failed.len(),
            reports.len(),
            failed
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use crate::services::currency::{inr_per_bhd, parse_amount, INR_PER_USD};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, ConnectionTrait, Database};

    /// In-memory SQLite with migrations applied. A single pooled connection
    /// keeps every query on the same database.
    pub(crate) async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("in-memory sqlite should open");
        Migrator::up(&db, None).await.expect("migrations should apply");
        db
    }

    pub(crate) async fn setup_store() -> MetalRateStore {
        MetalRateStore::new(setup_db().await)
    }

    fn find<'a>(
        rates: &'a [metal_rates::Model],
        metal: MetalType,
        purity: &str,
        market: Market,
    ) -> &'a metal_rates::Model {
        rates
            .iter()
            .find(|r| r.metal == metal && r.purity == purity && r.market == market)
            .expect("rate row should exist")
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = setup_store().await;

        let first = store.initialize_fallback_rates().await.unwrap();
        match first {
            SeedOutcome::Seeded(reports) => {
                assert_eq!(reports.len(), 6);
                assert!(reports.iter().all(|r| r.outcome.is_applied()));
            }
            other => panic!("expected seed, got {:?}", other),
        }

        let second = store.initialize_fallback_rates().await.unwrap();
        assert_eq!(second, SeedOutcome::AlreadySeeded { existing_rows: 6 });

        let rates = store.get_all_rates_from_db().await.unwrap();
        assert_eq!(rates.len(), 6);
        for slot in CANONICAL_SLOTS.iter() {
            let matching = rates
                .iter()
                .filter(|r| r.metal == slot.metal && r.purity == slot.purity && r.market == slot.market)
                .count();
            assert_eq!(matching, 1, "exactly one row for {}", slot.key);
        }
    }

    #[test]
    fn test_fallback_rates_are_cross_currency_consistent() {
        for (metal, purity, market, prices) in fallback_rates() {
            // India rows are INR-native and derive BHD from it; Bahrain rows
            // derive INR from BHD so the whole-rupee rounding widens the band.
            let bhd_tolerance = match market {
                Market::India => dec!(0.0005),
                Market::Bahrain => dec!(0.003),
            };
            let usd_tolerance = match market {
                Market::India => dec!(0.005),
                Market::Bahrain => dec!(0.01),
            };

            let bhd_from_inr = prices.inr / inr_per_bhd();
            assert!(
                (prices.bhd - bhd_from_inr).abs() <= bhd_tolerance,
                "{} {} {}: bhd {} vs {}",
                metal,
                purity,
                market,
                prices.bhd,
                bhd_from_inr
            );

            let usd_from_inr = prices.inr / INR_PER_USD;
            assert!(
                (prices.usd - usd_from_inr).abs() <= usd_tolerance,
                "{} {} {}: usd {} vs {}",
                metal,
                purity,
                market,
                prices.usd,
                usd_from_inr
            );
        }
    }

    #[tokio::test]
    async fn test_seeded_values_are_stored_as_formatted_strings() {
        let store = setup_store().await;
        store.initialize_fallback_rates().await.unwrap();

        let india = store.get_latest_rates(Some(Market::India)).await.unwrap();
        assert_eq!(india.len(), 3);
        assert!(india.iter().all(|r| r.market == Market::India));

        let gold = find(&india, MetalType::Gold, "22K", Market::India);
        assert_eq!(gold.price_per_gram_inr, "6563");
        assert_eq!(gold.price_per_gram_bhd, "29.553");
        assert_eq!(gold.price_per_gram_usd, "78.60");
        assert_eq!(gold.source, STATIC_DATASET_LABEL);

        let bahrain = store.get_latest_rates(Some(Market::Bahrain)).await.unwrap();
        let silver = find(&bahrain, MetalType::Silver, "925", Market::Bahrain);
        assert_eq!(silver.price_per_gram_bhd, "0.350");
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let store = setup_store().await;
        store.initialize_fallback_rates().await.unwrap();

        let outcome = store
            .upsert_rate(
                MetalType::Gold,
                "22K",
                &PerGramPrices::from_inr(dec!(6600)),
                Market::India,
                "test",
            )
            .await;
        assert_eq!(outcome, UpsertOutcome::Applied);

        let rates = store.get_all_rates_from_db().await.unwrap();
        assert_eq!(rates.len(), 6);
        let gold = find(&rates, MetalType::Gold, "22K", Market::India);
        assert_eq!(gold.price_per_gram_inr, "6600");
        assert_eq!(gold.source, "test");
    }

    #[tokio::test]
    async fn test_upsert_inserts_new_triple() {
        let store = setup_store().await;

        let outcome = store
            .upsert_rate(
                MetalType::Gold,
                "24K",
                &PerGramPrices::from_inr(dec!(7160)),
                Market::India,
                "test",
            )
            .await;
        assert!(outcome.is_applied());
        assert_eq!(store.get_all_rates_from_db().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_failure_is_reported_not_raised() {
        let store = setup_store().await;
        store
            .db
            .execute_unprepared("DROP TABLE metal_rates")
            .await
            .unwrap();

        let outcome = store
            .upsert_rate(
                MetalType::Silver,
                "925",
                &PerGramPrices::from_inr(dec!(80)),
                Market::India,
                "test",
            )
            .await;
        assert!(matches!(outcome, UpsertOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_manual_update_round_trip() {
        let store = setup_store().await;
        store.initialize_fallback_rates().await.unwrap();

        let before = find(
            &store.get_latest_rates(Some(Market::India)).await.unwrap(),
            MetalType::Gold,
            "22K",
            Market::India,
        )
        .last_updated;

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let update = ManualRateUpdate {
            india_gold_22k: Some(dec!(7000)),
            ..Default::default()
        };
        let reports = store.apply_manual_update(&update).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].outcome.is_applied());

        let india = store.get_latest_rates(Some(Market::India)).await.unwrap();
        let gold = find(&india, MetalType::Gold, "22K", Market::India);
        assert_eq!(gold.price_per_gram_inr, "7000");
        assert_eq!(gold.source, MANUAL_UPDATE_LABEL);
        assert!(gold.last_updated > before);

        // BHD and USD derived by cross-rate
        assert_eq!(parse_amount(&gold.price_per_gram_usd).unwrap(), dec!(83.83));
        assert_eq!(parse_amount(&gold.price_per_gram_bhd).unwrap(), dec!(31.521));

        // Untouched slot keeps the seed value
        let gold_18k = find(&india, MetalType::Gold, "18K", Market::India);
        assert_eq!(gold_18k.price_per_gram_inr, "5370");
    }

    #[tokio::test]
    async fn test_manual_update_bahrain_slot_is_bhd_native() {
        let store = setup_store().await;

        let update = ManualRateUpdate {
            bahrain_gold_22k: Some(dec!(30.125)),
            ..Default::default()
        };
        store.apply_manual_update(&update).await.unwrap();

        let bahrain = store.get_latest_rates(Some(Market::Bahrain)).await.unwrap();
        let gold = find(&bahrain, MetalType::Gold, "22K", Market::Bahrain);
        assert_eq!(gold.price_per_gram_bhd, "30.125");
    }

    #[tokio::test]
    async fn test_manual_update_rejects_non_positive_values() {
        let store = setup_store().await;
        store.initialize_fallback_rates().await.unwrap();

        let update = ManualRateUpdate {
            india_gold_22k: Some(dec!(7000)),
            india_silver: Some(dec!(0)),
            ..Default::default()
        };
        let result = store.apply_manual_update(&update).await;
        assert!(matches!(result, Err(PricingError::InvalidAmount(_))));

        // Nothing written, not even the valid slot
        let india = store.get_latest_rates(Some(Market::India)).await.unwrap();
        let gold = find(&india, MetalType::Gold, "22K", Market::India);
        assert_eq!(gold.price_per_gram_inr, "6563");
    }

    #[tokio::test]
    async fn test_manual_update_rejects_oversized_values() {
        let store = setup_store().await;
        store.initialize_fallback_rates().await.unwrap();

        let update = ManualRateUpdate {
            india_gold_22k: Some(dec!(1000000000000000000000000000)),
            ..Default::default()
        };
        let result = store.apply_manual_update(&update).await;
        assert!(matches!(result, Err(PricingError::InvalidAmount(_))));

        let india = store.get_latest_rates(Some(Market::India)).await.unwrap();
        let gold = find(&india, MetalType::Gold, "22K", Market::India);
        assert_eq!(gold.price_per_gram_inr, "6563");
    }

    #[tokio::test]
    async fn test_manual_update_requires_a_value() {
        let store = setup_store().await;
        let result = store.apply_manual_update(&ManualRateUpdate::default()).await;
        assert!(matches!(result, Err(PricingError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn test_refresh_without_feed_reapplies_static_dataset() {
        let store = setup_store().await;
        store.initialize_fallback_rates().await.unwrap();
        store
            .apply_manual_update(&ManualRateUpdate {
                india_gold_22k: Some(dec!(7000)),
                ..Default::default()
            })
            .await
            .unwrap();

        let summary = store.refresh_rates(None).await;
        assert_eq!(summary.source, RateSource::StaticFallback);
        assert!(summary.feed_error.is_none());
        assert_eq!(summary.reports.len(), 6);

        let india = store.get_latest_rates(Some(Market::India)).await.unwrap();
        let gold = find(&india, MetalType::Gold, "22K", Market::India);
        assert_eq!(gold.price_per_gram_inr, "6563");
        assert_eq!(gold.source, STATIC_DATASET_LABEL);
    }

    /// Serves a fixed metals-api `/latest` body on an ephemeral local port
    async fn spawn_feed(body: serde_json::Value) -> String {
        use axum::{routing::get, Json, Router};

        let app = Router::new().route("/latest", get(move || {
            let body = body.clone();
            async move { Json(body) }
        }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn feed_at(base_url: String) -> MetalPriceFeed {
        MetalPriceFeed::new(&FeedConfig {
            base_url,
            api_key: "test-key".to_string(),
        })
    }

    #[tokio::test]
    async fn test_refresh_from_live_feed_writes_every_slot() {
        let store = setup_store().await;
        store.initialize_fallback_rates().await.unwrap();

        let base_url = spawn_feed(serde_json::json!({
            "success": true,
            "base": "USD",
            "rates": { "XAU": 0.0005, "XAG": 0.04 }
        }))
        .await;
        let feed = feed_at(base_url);

        let summary = store.refresh_rates(Some(&feed)).await;
        assert_eq!(summary.source, RateSource::LiveFeed);
        assert!(summary.feed_error.is_none());
        assert!(summary.source_label.starts_with("live feed "));
        assert_eq!(summary.reports.len(), 6);
        assert!(summary.reports.iter().all(|r| r.outcome.is_applied()));

        let rates = store.get_all_rates_from_db().await.unwrap();
        assert_eq!(rates.len(), 6);
        assert!(rates.iter().all(|r| r.source == summary.source_label));

        // 2000 USD/oz / 31.1034768 * 22/24 = 58.943 USD/g
        let india = find(&rates, MetalType::Gold, "22K", Market::India);
        assert_eq!(india.price_per_gram_usd, "58.94");
        assert_eq!(india.price_per_gram_inr, "4922");
        let bahrain = find(&rates, MetalType::Gold, "22K", Market::Bahrain);
        assert_eq!(bahrain.price_per_gram_bhd, "22.163");
    }

    #[tokio::test]
    async fn test_refresh_with_unreachable_feed_falls_back() {
        let store = setup_store().await;
        store
            .apply_manual_update(&ManualRateUpdate {
                india_silver: Some(dec!(95)),
                ..Default::default()
            })
            .await
            .unwrap();

        // Nothing listens on the discard port
        let feed = feed_at("http://127.0.0.1:9".to_string());

        let summary = store.refresh_rates(Some(&feed)).await;
        assert_eq!(summary.source, RateSource::StaticFallback);
        assert!(summary.feed_error.is_some());
        assert_eq!(summary.source_label, STATIC_DATASET_LABEL);
        assert_eq!(summary.reports.len(), 6);
        assert!(summary.reports.iter().all(|r| r.outcome.is_applied()));

        let india = store.get_latest_rates(Some(Market::India)).await.unwrap();
        let silver = find(&india, MetalType::Silver, "925", Market::India);
        assert_eq!(silver.price_per_gram_inr, "78");
    }

    #[tokio::test]
    async fn test_refresh_with_failing_feed_response_falls_back() {
        let store = setup_store().await;

        let base_url = spawn_feed(serde_json::json!({
            "success": false,
            "error": { "code": 101, "info": "invalid access key" }
        }))
        .await;
        let feed = feed_at(base_url);

        let summary = store.refresh_rates(Some(&feed)).await;
        assert_eq!(summary.source, RateSource::StaticFallback);
        let feed_error = summary.feed_error.expect("feed error should be reported");
        assert!(feed_error.contains("invalid access key"));
        assert_eq!(store.get_all_rates_from_db().await.unwrap().len(), 6);
    }
}
