//! Enumerations shared by the `metal_rates` and `products` entities.
//!
//! Stored as upper-case strings so rows stay readable from psql.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum MetalType {
    #[sea_orm(string_value = "GOLD")]
    Gold,
    #[sea_orm(string_value = "SILVER")]
    Silver,
}

/// Geographic pricing context. Each market quotes its own per-gram rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    #[sea_orm(string_value = "INDIA")]
    India,
    #[sea_orm(string_value = "BAHRAIN")]
    Bahrain,
}

impl MetalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetalType::Gold => "GOLD",
            MetalType::Silver => "SILVER",
        }
    }
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::India => "INDIA",
            Market::Bahrain => "BAHRAIN",
        }
    }
}

impl fmt::Display for MetalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GOLD" => Ok(MetalType::Gold),
            "SILVER" => Ok(MetalType::Silver),
            other => Err(format!("unknown metal type '{}'", other)),
        }
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INDIA" => Ok(Market::India),
            "BAHRAIN" => Ok(Market::Bahrain),
            other => Err(format!("unknown market '{}'", other)),
        }
    }
}
