pub mod error;
pub mod metal_rate;
pub mod pricing;
pub mod product;
