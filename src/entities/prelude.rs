pub use super::metal_rates::Entity as MetalRates;
pub use super::products::Entity as Products;
pub use super::sync_status::Entity as SyncStatus;
