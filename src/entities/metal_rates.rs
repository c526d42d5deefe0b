//! SeaORM Entity for metal_rates
//!
//! One row per (metal, purity, market). Prices are kept as decimal strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Market, MetalType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metal_rates")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub metal: MetalType,
    /// Karat for gold ("22K"), fineness for silver ("925")
    pub purity: String,
    pub market: Market,
    /// Whole rupees per gram
    pub price_per_gram_inr: String,
    /// Dinars per gram, 3 decimal places
    pub price_per_gram_bhd: String,
    /// Dollars per gram, 2 decimal places
    pub price_per_gram_usd: String,
    /// Provenance label ("static fallback 2026-10-01", "manual update", ...)
    pub source: String,
    pub last_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
