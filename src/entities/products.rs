//! SeaORM Entity for products
//!
//! Only the columns the pricing core reads or writes are modelled here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::MetalType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub metal_type: Option<MetalType>,
    pub purity: Option<String>,
    /// Grams, including stones and findings
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub gross_weight: Option<Decimal>,
    /// Grams of precious metal only
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub net_weight: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub making_charges_percentage: Option<Decimal>,
    pub is_metal_price_based: bool,
    #[sea_orm(column_type = "Decimal(Some((12, 0)))")]
    pub price_inr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub price_bhd: Decimal,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
