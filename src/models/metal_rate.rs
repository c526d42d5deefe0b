//! Metal rate request/response models
//!
//! Models for the `/api/metal-rates` endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::metal_rates;
use crate::entities::sea_orm_active_enums::{Market, MetalType};
use crate::services::metal_rates::{RateSource, RateWriteReport, UpsertOutcome};
use crate::services::recalculation::RecalculationSummary;

/// Query parameters for GET /api/metal-rates
#[derive(Debug, Clone, Deserialize)]
pub struct MetalRatesQuery {
    /// Market name, any case ("india", "BAHRAIN")
    pub market: Option<String>,
}

impl MetalRatesQuery {
    pub fn market(&self) -> Result<Option<Market>, String> {
        self.market
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::parse)
            .transpose()
    }
}

/// Admin-entered per-gram rates. India slots are INR, Bahrain slots are BHD.
/// Omitted slots are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRateUpdate {
    pub india_gold_22k: Option<Decimal>,
    pub india_gold_18k: Option<Decimal>,
    pub india_silver: Option<Decimal>,
    pub bahrain_gold_22k: Option<Decimal>,
    pub bahrain_gold_18k: Option<Decimal>,
    pub bahrain_silver: Option<Decimal>,
}

impl ManualRateUpdate {
    /// Value supplied for a canonical slot key ("indiaGold22k", ...)
    pub fn value_for(&self, slot_key: &str) -> Option<Decimal> {
        match slot_key {
            "indiaGold22k" => self.india_gold_22k,
            "indiaGold18k" => self.india_gold_18k,
            "indiaSilver" => self.india_silver,
            "bahrainGold22k" => self.bahrain_gold_22k,
            "bahrainGold18k" => self.bahrain_gold_18k,
            "bahrainSilver" => self.bahrain_silver,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetalRatesResponse {
    pub rates: Vec<metal_rates::Model>,
}

/// Outcome of one slot write, flattened for JSON
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateWriteEntry {
    pub metal: MetalType,
    pub purity: String,
    pub market: Market,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&RateWriteReport> for RateWriteEntry {
    fn from(report: &RateWriteReport) -> Self {
        let (success, error) = match &report.outcome {
            UpsertOutcome::Applied => (true, None),
            UpsertOutcome::Failed { reason } => (false, Some(reason.clone())),
        };

        Self {
            metal: report.metal,
            purity: report.purity.clone(),
            market: report.market,
            success,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdateResponse {
    pub success: bool,
    pub source: RateSource,
    pub source_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_error: Option<String>,
    pub rates: Vec<RateWriteEntry>,
    /// Absent when the catalog could not be read; the rate writes still stand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recalculation: Option<RecalculationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recalculation_error: Option<String>,
}
