// src/lib.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use services::{
    metal_price_feed::MetalPriceFeed,
    metal_rates::MetalRateStore,
    pricing::PricingCalculator,
    product_storage::ProductStorage,
    recalculation::RecalculationService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub rates: MetalRateStore,
    pub products: Arc<dyn ProductStorage>,
    pub recalculation: RecalculationService,
    pub feed: Option<MetalPriceFeed>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        products: Arc<dyn ProductStorage>,
        feed: Option<MetalPriceFeed>,
    ) -> Self {
        let rates = MetalRateStore::new(db.clone());
        let recalculation =
            RecalculationService::new(PricingCalculator::new(rates.clone()), products.clone());

        Self {
            db,
            rates,
            products,
            recalculation,
            feed,
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod metal_rates;
    pub mod products;
    pub mod sea_orm_active_enums;
    pub mod sync_status;
}

pub mod services {
    pub mod currency;
    pub mod metal_price_feed;
    pub mod metal_rates;
    pub mod pricing;
    pub mod product_storage;
    pub mod recalculation;
    pub mod sync_status;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod models;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/metal-rates", get(handlers::metal_rates::get_metal_rates))
        .route("/api/metal-rates/all", get(handlers::metal_rates::get_all_metal_rates))
        .route("/api/metal-rates/update", post(handlers::metal_rates::update_metal_rates))
        .route(
            "/api/metal-rates/manual-update",
            post(handlers::metal_rates::manual_update_metal_rates),
        )
        .route("/api/pricing/calculate", post(handlers::pricing::calculate_pricing))
        .route("/api/products", get(handlers::products::list_products))
        .route("/api/products/recalculate", post(handlers::products::recalculate_products))
        .route(
            "/api/products/{id}/metal-attributes",
            put(handlers::products::update_metal_attributes),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
