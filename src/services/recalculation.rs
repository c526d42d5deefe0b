//! Bulk Recalculation Job
//!
//! Reprices every metal-price-based product after a rate change. Products
//! are processed one at a time in catalog order; a failure on one product is
//! logged and counted, never fatal to the batch. Only a failure to read the
//! catalog itself aborts the run.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::entities::products;
use crate::entities::sea_orm_active_enums::{Market, MetalType};
use crate::error::{PricingError, PricingResult};
use crate::services::pricing::PricingCalculator;
use crate::services::product_storage::{ProductStorage, ProductUpdate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecalculationSummary {
    pub updated: usize,
    pub errors: usize,
}

/// Prices for both markets, each from that market's own rate row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketPrices {
    pub price_inr: Decimal,
    pub price_bhd: Decimal,
}

struct PricingInputs<'a> {
    metal_type: MetalType,
    purity: &'a str,
    gross_weight: Decimal,
    net_weight: Decimal,
    making_charges_percentage: Option<Decimal>,
}

fn pricing_inputs(product: &products::Model) -> PricingResult<PricingInputs<'_>> {
    let mut missing = Vec::new();
    if product.metal_type.is_none() {
        missing.push("metalType");
    }
    if product.purity.as_deref().map_or(true, str::is_empty) {
        missing.push("purity");
    }
    if product.gross_weight.is_none() {
        missing.push("grossWeight");
    }
    if product.net_weight.is_none() {
        missing.push("netWeight");
    }

    match (&product.metal_type, &product.purity, product.gross_weight, product.net_weight) {
        (Some(metal_type), Some(purity), Some(gross_weight), Some(net_weight)) if missing.is_empty() => {
            Ok(PricingInputs {
                metal_type: *metal_type,
                purity: purity.as_str(),
                gross_weight,
                net_weight,
                making_charges_percentage: product.making_charges_percentage,
            })
        }
        _ => Err(PricingError::MissingProductAttributes {
            product_id: product.id,
            missing,
        }),
    }
}

#[derive(Clone)]
pub struct RecalculationService {
    calculator: PricingCalculator,
    products: Arc<dyn ProductStorage>,
}

impl RecalculationService {
    pub fn new(calculator: PricingCalculator, products: Arc<dyn ProductStorage>) -> Self {
        Self { calculator, products }
    }

    pub fn calculator(&self) -> &PricingCalculator {
        &self.calculator
    }

    /// INR price from the India rate, BHD price from the Bahrain rate
    pub async fn price_for_markets(&self, product: &products::Model) -> PricingResult<MarketPrices> {
        let inputs = pricing_inputs(product)?;

        let india = self
            .calculator
            .calculate_product_pricing(
                inputs.metal_type,
                inputs.purity,
                inputs.gross_weight,
                inputs.net_weight,
                inputs.making_charges_percentage,
                Market::India,
            )
            .await?;

        let bahrain = self
            .calculator
            .calculate_product_pricing(
                inputs.metal_type,
                inputs.purity,
                inputs.gross_weight,
                inputs.net_weight,
                inputs.making_charges_percentage,
                Market::Bahrain,
            )
            .await?;

        Ok(MarketPrices {
            price_inr: india.price_inr,
            price_bhd: bahrain.price_bhd,
        })
    }

    /// Reprice and persist one product
    pub async fn recalculate_product(&self, product: &products::Model) -> PricingResult<products::Model> {
        let prices = self.price_for_markets(product).await?;

        let updated = self
            .products
            .update_product(product.id, ProductUpdate::prices(prices.price_inr, prices.price_bhd))
            .await?;

        tracing::debug!(
            product_id = product.id,
            price_inr = %prices.price_inr,
            price_bhd = %prices.price_bhd,
            "Repriced product"
        );

        Ok(updated)
    }

    pub async fn recalculate_all_metal_based_products(&self) -> PricingResult<RecalculationSummary> {
        let catalog = self.products.get_all_products().await?;

        let metal_based: Vec<&products::Model> =
            catalog.iter().filter(|p| p.is_metal_price_based).collect();

        tracing::info!(
            "Recalculating prices for {} metal-based products ({} in catalog)",
            metal_based.len(),
            catalog.len()
        );

        let mut summary = RecalculationSummary::default();

        for product in metal_based {
            match self.recalculate_product(product).await {
                Ok(_) => summary.updated += 1,
                Err(e @ PricingError::MissingProductAttributes { .. }) => {
                    tracing::warn!(product_id = product.id, error = %e, "Skipping product");
                    summary.errors += 1;
                }
                Err(e) => {
                    tracing::error!(product_id = product.id, error = %e, "Failed to recalculate product price");
                    summary.errors += 1;
                }
            }
        }

        tracing::info!(
            updated = summary.updated,
            errors = summary.errors,
            "Product price recalculation complete"
        );

        Ok(summary)
    }
}
