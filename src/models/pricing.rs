//! Pricing preview request model (POST /api/pricing/calculate)

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::entities::sea_orm_active_enums::{Market, MetalType};
use crate::services::pricing::{MAX_MAKING_CHARGES_PERCENTAGE, MAX_WEIGHT_GRAMS};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePricingRequest {
    pub metal_type: MetalType,
    pub purity: String,
    pub gross_weight: Decimal,
    pub net_weight: Decimal,
    pub making_charges_percentage: Option<Decimal>,
    /// Defaults to INDIA
    pub market: Option<Market>,
}

impl CalculatePricingRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.purity.trim().is_empty() {
            return Err("purity is required".to_string());
        }
        if self.net_weight <= Decimal::ZERO {
            return Err("netWeight must be greater than zero".to_string());
        }
        if self.gross_weight < self.net_weight {
            return Err("grossWeight cannot be less than netWeight".to_string());
        }
        if self.gross_weight > MAX_WEIGHT_GRAMS {
            return Err(format!("grossWeight cannot exceed {} grams", MAX_WEIGHT_GRAMS));
        }
        if let Some(pct) = self.making_charges_percentage {
            if pct < Decimal::ZERO {
                return Err("makingChargesPercentage cannot be negative".to_string());
            }
            if pct > MAX_MAKING_CHARGES_PERCENTAGE {
                return Err(format!(
                    "makingChargesPercentage cannot exceed {}",
                    MAX_MAKING_CHARGES_PERCENTAGE
                ));
            }
        }
        Ok(())
    }
}
