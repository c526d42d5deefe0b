use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jewelry_pricing_backend::{
    build_router,
    config::Config,
    jobs::metal_rate_sync::start_metal_rate_sync_job,
    services::{
        metal_price_feed::MetalPriceFeed,
        metal_rates::SeedOutcome,
        product_storage::SeaOrmProductStorage,
    },
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jewelry_pricing_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    let feed = config.feed.as_ref().map(MetalPriceFeed::new);
    if feed.is_none() {
        tracing::info!("METAL_PRICE_API_URL/METAL_PRICE_API_KEY not set, rate refreshes use the static dataset");
    }

    let products = Arc::new(SeaOrmProductStorage::new(db.clone()));
    let state = AppState::new(db, products, feed);

    // Never start with an empty rate table
    match state.rates.initialize_fallback_rates().await? {
        SeedOutcome::AlreadySeeded { existing_rows } => {
            tracing::info!(existing_rows, "Metal rates present");
        }
        SeedOutcome::Seeded(reports) => {
            let failed = reports.iter().filter(|r| !r.outcome.is_applied()).count();
            if failed > 0 {
                tracing::warn!(failed, "Some fallback metal rates could not be seeded");
            }
        }
    }

    start_metal_rate_sync_job(state.clone(), config.rate_sync_interval_secs).await;

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
