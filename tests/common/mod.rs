use jewelry_pricing_backend::{
    entities::{products, sea_orm_active_enums::MetalType},
    services::product_storage::InMemoryProductStorage,
    AppState,
};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;

/// Fresh in-memory database with all migrations applied
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// AppState over a seeded rate table and an in-memory catalog
pub async fn setup_test_state(catalog: Vec<products::Model>) -> (AppState, InMemoryProductStorage) {
    let db = setup_test_db().await.expect("Failed to set up test DB");
    let storage = InMemoryProductStorage::new(catalog);
    let state = AppState::new(db, Arc::new(storage.clone()), None);

    state
        .rates
        .initialize_fallback_rates()
        .await
        .expect("Failed to seed metal rates");

    (state, storage)
}

pub fn metal_product(id: i32, metal: MetalType, purity: &str, net_weight: Option<Decimal>) -> products::Model {
    products::Model {
        id,
        name: format!("Product {}", id),
        metal_type: Some(metal),
        purity: Some(purity.to_string()),
        gross_weight: net_weight,
        net_weight,
        making_charges_percentage: None,
        is_metal_price_based: true,
        price_inr: Decimal::ZERO,
        price_bhd: Decimal::ZERO,
        updated_at: None,
    }
}
