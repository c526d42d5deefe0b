//! Product catalog storage.
//!
//! The pricing core only needs to list the catalog and write a handful of
//! fields back, so storage sits behind [`ProductStorage`].

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryOrder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::entities::sea_orm_active_enums::MetalType;
use crate::entities::{prelude::*, products};

/// Physical attributes the calculator prices from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalAttributes {
    pub metal_type: MetalType,
    pub purity: String,
    pub gross_weight: Decimal,
    pub net_weight: Decimal,
    pub making_charges_percentage: Option<Decimal>,
    pub is_metal_price_based: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub metal_attributes: Option<MetalAttributes>,
    pub price_inr: Option<Decimal>,
    pub price_bhd: Option<Decimal>,
}

impl ProductUpdate {
    pub fn prices(price_inr: Decimal, price_bhd: Decimal) -> Self {
        Self {
            metal_attributes: None,
            price_inr: Some(price_inr),
            price_bhd: Some(price_bhd),
        }
    }

    fn apply_to(&self, product: &mut products::Model) {
        if let Some(attrs) = &self.metal_attributes {
            product.metal_type = Some(attrs.metal_type);
            product.purity = Some(attrs.purity.clone());
            product.gross_weight = Some(attrs.gross_weight);
            product.net_weight = Some(attrs.net_weight);
            product.making_charges_percentage = attrs.making_charges_percentage;
            product.is_metal_price_based = attrs.is_metal_price_based;
        }
        if let Some(price_inr) = self.price_inr {
            product.price_inr = price_inr;
        }
        if let Some(price_bhd) = self.price_bhd {
            product.price_bhd = price_bhd;
        }
        product.updated_at = Some(Utc::now().naive_utc());
    }
}

#[async_trait]
pub trait ProductStorage: Send + Sync {
    async fn get_all_products(&self) -> Result<Vec<products::Model>, DbErr>;

    async fn get_product(&self, id: i32) -> Result<Option<products::Model>, DbErr>;

    /// Both price fields are written in the same statement
    async fn update_product(&self, id: i32, update: ProductUpdate) -> Result<products::Model, DbErr>;
}

#[derive(Clone)]
pub struct SeaOrmProductStorage {
    db: DatabaseConnection,
}

impl SeaOrmProductStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStorage for SeaOrmProductStorage {
    async fn get_all_products(&self) -> Result<Vec<products::Model>, DbErr> {
        Products::find()
            .order_by_asc(products::Column::Id)
            .all(&self.db)
            .await
    }

    async fn get_product(&self, id: i32) -> Result<Option<products::Model>, DbErr> {
        Products::find_by_id(id).one(&self.db).await
    }

    async fn update_product(&self, id: i32, update: ProductUpdate) -> Result<products::Model, DbErr> {
        let existing = Products::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("product {}", id)))?;

        let mut active_model = existing.into_active_model();

        if let Some(attrs) = update.metal_attributes {
            active_model.metal_type = Set(Some(attrs.metal_type));
            active_model.purity = Set(Some(attrs.purity));
            active_model.gross_weight = Set(Some(attrs.gross_weight));
            active_model.net_weight = Set(Some(attrs.net_weight));
            active_model.making_charges_percentage = Set(attrs.making_charges_percentage);
            active_model.is_metal_price_based = Set(attrs.is_metal_price_based);
        }
        if let Some(price_inr) = update.price_inr {
            active_model.price_inr = Set(price_inr);
        }
        if let Some(price_bhd) = update.price_bhd {
            active_model.price_bhd = Set(price_bhd);
        }
        active_model.updated_at = Set(Some(Utc::now().naive_utc()));

        active_model.update(&self.db).await
    }
}

/// Catalog held in memory, used by tests and local demos.
///
/// Ids listed in `failing_updates` reject writes, which lets callers exercise
/// per-product failure handling. `catalog_unavailable` fails catalog listing.
#[derive(Clone, Default)]
pub struct InMemoryProductStorage {
    products: Arc<Mutex<Vec<products::Model>>>,
    failing_updates: Arc<Mutex<Vec<i32>>>,
    catalog_unavailable: Arc<AtomicBool>,
}

impl InMemoryProductStorage {
    pub fn new(products: Vec<products::Model>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
            failing_updates: Arc::default(),
            catalog_unavailable: Arc::default(),
        }
    }

    pub fn fail_catalog_reads(&self) {
        self.catalog_unavailable.store(true, Ordering::SeqCst);
    }

    pub fn fail_updates_for(&self, id: i32) {
        if let Ok(mut failing) = self.failing_updates.lock() {
            failing.push(id);
        }
    }

    pub fn snapshot(&self) -> Vec<products::Model> {
        self.products.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

fn poisoned() -> DbErr {
    DbErr::Custom("product store lock poisoned".to_string())
}

#[async_trait]
impl ProductStorage for InMemoryProductStorage {
    async fn get_all_products(&self) -> Result<Vec<products::Model>, DbErr> {
        if self.catalog_unavailable.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("catalog unavailable".to_string()));
        }
        let products = self.products.lock().map_err(|_| poisoned())?;
        Ok(products.clone())
    }

    async fn get_product(&self, id: i32) -> Result<Option<products::Model>, DbErr> {
        let products = self.products.lock().map_err(|_| poisoned())?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn update_product(&self, id: i32, update: ProductUpdate) -> Result<products::Model, DbErr> {
        if self.failing_updates.lock().map_err(|_| poisoned())?.contains(&id) {
            return Err(DbErr::Custom(format!("write rejected for product {}", id)));
        }

        let mut products = self.products.lock().map_err(|_| poisoned())?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DbErr::RecordNotFound(format!("product {}", id)))?;

        update.apply_to(product);
        Ok(product.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: i32) -> products::Model {
        products::Model {
            id,
            name: format!("Ring {}", id),
            metal_type: None,
            purity: None,
            gross_weight: None,
            net_weight: None,
            making_charges_percentage: None,
            is_metal_price_based: false,
            price_inr: dec!(1000),
            price_bhd: dec!(4.5),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_price_update_leaves_attributes() {
        let storage = InMemoryProductStorage::new(vec![product(1)]);

        let updated = storage
            .update_product(1, ProductUpdate::prices(dec!(2000), dec!(9.25)))
            .await
            .unwrap();

        assert_eq!(updated.price_inr, dec!(2000));
        assert_eq!(updated.price_bhd, dec!(9.25));
        assert!(updated.metal_type.is_none());
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_attribute_update() {
        let storage = InMemoryProductStorage::new(vec![product(1)]);

        let update = ProductUpdate {
            metal_attributes: Some(MetalAttributes {
                metal_type: MetalType::Gold,
                purity: "22K".to_string(),
                gross_weight: dec!(5.5),
                net_weight: dec!(5),
                making_charges_percentage: Some(dec!(12)),
                is_metal_price_based: true,
            }),
            ..Default::default()
        };
        let updated = storage.update_product(1, update).await.unwrap();

        assert_eq!(updated.metal_type, Some(MetalType::Gold));
        assert_eq!(updated.net_weight, Some(dec!(5)));
        assert!(updated.is_metal_price_based);
        assert_eq!(updated.price_inr, dec!(1000));
    }

    #[tokio::test]
    async fn test_unknown_and_failing_ids() {
        let storage = InMemoryProductStorage::new(vec![product(1), product(2)]);
        storage.fail_updates_for(2);

        assert!(matches!(
            storage.update_product(9, ProductUpdate::default()).await,
            Err(DbErr::RecordNotFound(_))
        ));
        assert!(matches!(
            storage.update_product(2, ProductUpdate::prices(dec!(1), dec!(1))).await,
            Err(DbErr::Custom(_))
        ));
        assert_eq!(storage.snapshot()[1].price_inr, dec!(1000));
    }

    async fn seaorm_storage_with(model: products::Model) -> SeaOrmProductStorage {
        let db = crate::services::metal_rates::tests::setup_db().await;
        let mut row = model.into_active_model().reset_all();
        row.id = sea_orm::ActiveValue::NotSet;
        row.insert(&db).await.unwrap();
        SeaOrmProductStorage::new(db)
    }

    #[tokio::test]
    async fn test_seaorm_price_update_persists_both_currencies() {
        let storage = seaorm_storage_with(product(1)).await;

        let updated = storage
            .update_product(1, ProductUpdate::prices(dec!(3409), dec!(15.25)))
            .await
            .unwrap();
        assert_eq!(updated.price_inr, dec!(3409));
        assert_eq!(updated.price_bhd, dec!(15.25));

        let stored = storage.get_product(1).await.unwrap().unwrap();
        assert_eq!(stored.price_inr, dec!(3409));
        assert_eq!(stored.price_bhd, dec!(15.25));
        assert_eq!(stored.name, "Ring 1");
        assert!(stored.metal_type.is_none());
        assert!(stored.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_seaorm_attribute_update_keeps_prices() {
        let storage = seaorm_storage_with(product(1)).await;

        let update = ProductUpdate {
            metal_attributes: Some(MetalAttributes {
                metal_type: MetalType::Silver,
                purity: "925".to_string(),
                gross_weight: dec!(40),
                net_weight: dec!(38),
                making_charges_percentage: Some(dec!(12)),
                is_metal_price_based: true,
            }),
            ..Default::default()
        };
        storage.update_product(1, update).await.unwrap();

        let catalog = storage.get_all_products().await.unwrap();
        assert_eq!(catalog.len(), 1);
        let stored = &catalog[0];
        assert_eq!(stored.metal_type, Some(MetalType::Silver));
        assert_eq!(stored.purity.as_deref(), Some("925"));
        assert_eq!(stored.net_weight, Some(dec!(38)));
        assert_eq!(stored.making_charges_percentage, Some(dec!(12)));
        assert!(stored.is_metal_price_based);
        assert_eq!(stored.price_inr, dec!(1000));
        assert_eq!(stored.price_bhd, dec!(4.5));
    }

    #[tokio::test]
    async fn test_seaorm_unknown_product_is_record_not_found() {
        let storage = seaorm_storage_with(product(1)).await;

        assert!(storage.get_product(42).await.unwrap().is_none());
        assert!(matches!(
            storage.update_product(42, ProductUpdate::prices(dec!(1), dec!(1))).await,
            Err(DbErr::RecordNotFound(_))
        ));
    }
}
