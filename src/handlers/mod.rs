pub mod metal_rates;
pub mod pricing;
pub mod products;
