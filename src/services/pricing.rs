//! Pricing Calculator
//!
//! Derives a sale price in INR and BHD from the current metal rate for a
//! market and a product's net weight and making-charge percentage. Rates are
//! read on every call; nothing is cached here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::entities::metal_rates;
use crate::entities::sea_orm_active_enums::{Market, MetalType};
use crate::error::{PricingError, PricingResult};
use crate::services::currency::{parse_amount, round_currency, Currency};
use crate::services::metal_rates::MetalRateStore;

pub const DEFAULT_MAKING_CHARGES_PERCENTAGE: Decimal = dec!(15);

/// Upper bounds accepted from request bodies
pub const MAX_WEIGHT_GRAMS: Decimal = dec!(100000);
pub const MAX_MAKING_CHARGES_PERCENTAGE: Decimal = dec!(1000);

/// Purity labels are stored upper-case and trimmed ("22k " -> "22K")
pub fn normalize_purity(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// INR figures behind a calculated price, for display and audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_metal_cost: Decimal,
    pub making_charges_amount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculation {
    pub price_inr: Decimal,
    pub price_bhd: Decimal,
    pub metal_cost_inr: Decimal,
    pub metal_cost_bhd: Decimal,
    /// Percentage applied, e.g. 15 for 15%
    pub making_charges: Decimal,
    pub breakdown: PriceBreakdown,
}

#[derive(Clone)]
pub struct PricingCalculator {
    rates: MetalRateStore,
}

impl PricingCalculator {
    pub fn new(rates: MetalRateStore) -> Self {
        Self { rates }
    }

    /// Price a piece against the `market` rate for (metal_type, purity).
    ///
    /// Only `net_weight` is priced as metal; `gross_weight` includes stones
    /// and findings and does not affect the result.
    pub async fn calculate_product_pricing(
        &self,
        metal_type: MetalType,
        purity: &str,
        gross_weight: Decimal,
        net_weight: Decimal,
        making_charges_percentage: Option<Decimal>,
        market: Market,
    ) -> PricingResult<PricingCalculation> {
        let rates = self.rates.get_latest_rates(Some(market)).await?;

        let rate = rates
            .iter()
            .find(|r| r.metal == metal_type && r.purity == purity && r.market == market)
            .ok_or_else(|| PricingError::RateNotFound {
                metal: metal_type,
                purity: purity.to_string(),
                market,
            })?;

        tracing::debug!(
            metal = %metal_type,
            purity = purity,
            market = %market,
            gross_weight = %gross_weight,
            net_weight = %net_weight,
            "Calculating product pricing"
        );

        price_from_rate(
            rate,
            net_weight,
            making_charges_percentage.unwrap_or(DEFAULT_MAKING_CHARGES_PERCENTAGE),
        )
    }
}

/// Pure pricing step against an already selected rate row
pub fn price_from_rate(
    rate: &metal_rates::Model,
    net_weight: Decimal,
    making_charges_percentage: Decimal,
) -> PricingResult<PricingCalculation> {
    if net_weight < Decimal::ZERO {
        return Err(PricingError::InvalidAmount(format!(
            "net weight cannot be negative, got {}",
            net_weight
        )));
    }
    if making_charges_percentage < Decimal::ZERO {
        return Err(PricingError::InvalidAmount(format!(
            "making charges percentage cannot be negative, got {}",
            making_charges_percentage
        )));
    }

    let per_gram_inr = parse_amount(&rate.price_per_gram_inr)?;
    let per_gram_bhd = parse_amount(&rate.price_per_gram_bhd)?;

    let metal_cost_inr = net_weight.checked_mul(per_gram_inr).ok_or_else(|| overflow("INR metal cost"))?;
    let metal_cost_bhd = net_weight.checked_mul(per_gram_bhd).ok_or_else(|| overflow("BHD metal cost"))?;

    let making_inr = making_charges(metal_cost_inr, making_charges_percentage)
        .ok_or_else(|| overflow("INR making charges"))?;
    let making_bhd = making_charges(metal_cost_bhd, making_charges_percentage)
        .ok_or_else(|| overflow("BHD making charges"))?;

    let total_inr = metal_cost_inr.checked_add(making_inr).ok_or_else(|| overflow("INR total"))?;
    let total_bhd = metal_cost_bhd.checked_add(making_bhd).ok_or_else(|| overflow("BHD total"))?;

    let price_inr = round_currency(total_inr, Currency::Inr);

    Ok(PricingCalculation {
        price_inr,
        price_bhd: round_currency(total_bhd, Currency::Bhd),
        metal_cost_inr: round_currency(metal_cost_inr, Currency::Inr),
        metal_cost_bhd: round_currency(metal_cost_bhd, Currency::Bhd),
        making_charges: making_charges_percentage,
        breakdown: PriceBreakdown {
            base_metal_cost: metal_cost_inr.normalize(),
            making_charges_amount: making_inr.normalize(),
            total: price_inr,
        },
    })
}

fn making_charges(metal_cost: Decimal, percentage: Decimal) -> Option<Decimal> {
    metal_cost.checked_mul(percentage)?.checked_div(dec!(100))
}

fn overflow(what: &str) -> PricingError {
    PricingError::InvalidAmount(format!("{} exceeds the representable range", what))
}
