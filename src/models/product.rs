//! Product request/response models for the admin product form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::products;
use crate::entities::sea_orm_active_enums::MetalType;
use crate::services::pricing::{normalize_purity, MAX_MAKING_CHARGES_PERCENTAGE, MAX_WEIGHT_GRAMS};
use crate::services::product_storage::MetalAttributes;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetalAttributesRequest {
    pub metal_type: MetalType,
    pub purity: String,
    pub gross_weight: Decimal,
    pub net_weight: Decimal,
    pub making_charges_percentage: Option<Decimal>,
    #[serde(default = "default_metal_price_based")]
    pub is_metal_price_based: bool,
}

fn default_metal_price_based() -> bool {
    true
}

impl UpdateMetalAttributesRequest {
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
        if matches!(self.making_charges_percentage, Some(pct) if pct < Decimal::ZERO) {
            return Err("makingChargesPercentage cannot be negative".to_string());
        }
        if matches!(self.making_charges_percentage, Some(pct) if pct > MAX_MAKING_CHARGES_PERCENTAGE) {
            return Err(format!(
                "makingChargesPercentage cannot exceed {}",
                MAX_MAKING_CHARGES_PERCENTAGE
            ));
        }
        Ok(())
    }

    pub fn into_attributes(self) -> MetalAttributes {
        MetalAttributes {
            metal_type: self.metal_type,
            purity: normalize_purity(&self.purity),
            gross_weight: self.gross_weight,
            net_weight: self.net_weight,
            making_charges_percentage: self.making_charges_percentage,
            is_metal_price_based: self.is_metal_price_based,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<products::Model>,
    pub total: usize,
}
