//! Live precious-metal spot price client.
//!
//! Talks to a metals-api style endpoint:
//! `GET {base_url}/latest?access_key=..&base=USD&symbols=XAU,XAG`
//! which answers with troy ounces per US dollar. Responses are cached for a
//! few minutes so a scheduled refresh and an admin click do not double-bill.

use chrono::Utc;
use moka::future::Cache;
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::entities::sea_orm_active_enums::MetalType;
use crate::error::{PricingError, PricingResult};

/// Grams in one troy ounce
pub const GRAMS_PER_TROY_OUNCE: Decimal = dec!(31.1034768);

const GOLD_SYMBOL: &str = "XAU";
const SILVER_SYMBOL: &str = "XAG";
const SPOT_CACHE_KEY: &str = "usd_spot";

/// USD per troy ounce of fine metal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotPrices {
    pub gold_usd_per_ounce: Decimal,
    pub silver_usd_per_ounce: Decimal,
}

impl SpotPrices {
    pub fn per_ounce(&self, metal: MetalType) -> Decimal {
        match metal {
            MetalType::Gold => self.gold_usd_per_ounce,
            MetalType::Silver => self.silver_usd_per_ounce,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
    error: Option<FeedErrorBody>,
}

#[derive(Debug, Deserialize)]
struct FeedErrorBody {
    #[serde(default)]
    info: String,
}

fn default_success() -> bool {
    true
}

#[derive(Clone)]
pub struct MetalPriceFeed {
    client: Client,
    api_key: String,
    base_url: String,
    cache: Arc<Cache<String, SpotPrices>>,
}

impl MetalPriceFeed {
    pub fn new(config: &FeedConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(Duration::from_secs(300))
            .build();

        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: Arc::new(cache),
        }
    }

    /// Label written to `metal_rates.source` for rows coming from this feed
    pub fn source_label(&self) -> String {
        format!("live feed {}", Utc::now().format("%Y-%m-%d %H:%M"))
    }

    pub async fn fetch_spot_prices(&self) -> PricingResult<SpotPrices> {
        if let Some(cached) = self.cache.get(SPOT_CACHE_KEY).await {
            tracing::debug!("Cache hit for spot prices");
            return Ok(cached);
        }

        tracing::info!("Fetching metal spot prices from {}", self.base_url);

        let url = format!("{}/latest", self.base_url);
        let symbols = format!("{},{}", GOLD_SYMBOL, SILVER_SYMBOL);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("base", "USD"),
                ("symbols", symbols.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PricingError::Feed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PricingError::Feed(format!("HTTP {}: {}", status, error_text)));
        }

        let body: LatestResponse = response
            .json()
            .await
            .map_err(|e| PricingError::Feed(format!("invalid response body: {}", e)))?;

        let spot = parse_latest(body)?;

        tracing::info!(
            gold = %spot.gold_usd_per_ounce,
            silver = %spot.silver_usd_per_ounce,
            "Fetched spot prices (USD/oz)"
        );

        self.cache.insert(SPOT_CACHE_KEY.to_string(), spot).await;

        Ok(spot)
    }
}

fn parse_latest(body: LatestResponse) -> PricingResult<SpotPrices> {
    if !body.success {
        let info = body.error.map(|e| e.info).unwrap_or_default();
        return Err(PricingError::Feed(format!("feed reported failure: {}", info)));
    }

    Ok(SpotPrices {
        gold_usd_per_ounce: ounce_price(&body.rates, GOLD_SYMBOL)?,
        silver_usd_per_ounce: ounce_price(&body.rates, SILVER_SYMBOL)?,
    })
}

/// Rates are ounces per dollar; invert to dollars per ounce
fn ounce_price(rates: &HashMap<String, Decimal>, symbol: &str) -> PricingResult<Decimal> {
    let rate = rates
        .get(symbol)
        .copied()
        .ok_or_else(|| PricingError::Feed(format!("missing {} in feed response", symbol)))?;

    if rate <= Decimal::ZERO {
        return Err(PricingError::Feed(format!("non-positive {} rate {}", symbol, rate)));
    }

    Ok(Decimal::ONE / rate)
}

/// Share of pure metal for a purity label: "22K" -> 22/24, "925" -> 0.925
pub fn purity_fraction(metal: MetalType, purity: &str) -> Option<Decimal> {
    let label = purity.trim().to_uppercase();
    match metal {
        MetalType::Gold => {
            let karat: Decimal = label.strip_suffix('K')?.parse().ok()?;
            (karat > Decimal::ZERO && karat <= dec!(24)).then(|| karat / dec!(24))
        }
        MetalType::Silver => {
            let fineness: Decimal = label.parse().ok()?;
            (fineness > Decimal::ZERO && fineness <= dec!(1000)).then(|| fineness / dec!(1000))
        }
    }
}

/// Unrounded USD per gram of metal at `purity`
pub fn usd_per_gram(spot: &SpotPrices, metal: MetalType, purity: &str) -> Option<Decimal> {
    let fraction = purity_fraction(metal, purity)?;
    Some(spot.per_ounce(metal) / GRAMS_PER_TROY_OUNCE * fraction)
}
