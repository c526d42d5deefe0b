//! Error taxonomy for the pricing core.

use sea_orm::DbErr;
use thiserror::Error;

use crate::entities::sea_orm_active_enums::{Market, MetalType};

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("metal rate not found for {metal} {purity} in {market}")]
    RateNotFound {
        metal: MetalType,
        purity: String,
        market: Market,
    },

    #[error("product {product_id} is missing metal pricing attributes: {}", missing.join(", "))]
    MissingProductAttributes {
        product_id: i32,
        missing: Vec<&'static str>,
    },

    #[error("product {0} not found")]
    ProductNotFound(i32),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("metal price feed error: {0}")]
    Feed(String),

    #[error("stored rate value '{0}' is not a decimal")]
    CorruptRate(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

pub type PricingResult<T> = Result<T, PricingError>;
