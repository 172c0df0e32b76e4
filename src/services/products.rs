use crate::{
    db::DbPool,
    entities::product::{self, Entity as Product},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Input for creating a product. Defaults (`unit = "adet"`, `vat_rate = 20`)
/// are applied at the DTO layer before this struct is built.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub unit: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub vat_rate: Decimal,
    pub stock_quantity: Decimal,
    pub critical_stock: Option<Decimal>,
    pub warehouse_id: Option<Uuid>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub unit: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub vat_rate: Option<Decimal>,
    pub stock_quantity: Option<Decimal>,
    pub critical_stock: Option<Decimal>,
    pub warehouse_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// Service for managing a tenant's products
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new: NewProduct) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            name: Set(new.name.clone()),
            description: Set(new.description),
            barcode: Set(new.barcode),
            unit: Set(new.unit),
            purchase_price: Set(new.purchase_price),
            sale_price: Set(new.sale_price),
            vat_rate: Set(new.vat_rate),
            stock_quantity: Set(new.stock_quantity),
            critical_stock: Set(new.critical_stock),
            warehouse_id: Set(new.warehouse_id),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create product: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        info!(product_id = %created.id, name = %new.name, "Product created");
        Ok(created)
    }

    /// Fetch one product of the tenant; unknown ids and other tenants' rows
    /// are both a NotFound.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        Product::find_by_id(id)
            .filter(product::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(product_id = %id, error = %e, "Database error when fetching product");
                ServiceError::db_error(format!("Failed to get product: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        search: Option<String>,
        is_active: Option<bool>,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Product::find().filter(product::Column::UserId.eq(user_id));

        if let Some(is_active) = is_active {
            query = query.filter(product::Column::IsActive.eq(is_active));
        }

        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            query = query.filter(
                product::Column::Name
                    .like(&pattern)
                    .or(product::Column::Barcode.like(&pattern)),
            );
        }

        let paginator = query
            .order_by_desc(product::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting products");
            ServiceError::db_error(format!("Failed to count products: {}", e))
        })?;

        let products = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching products");
            ServiceError::db_error(format!("Failed to fetch products: {}", e))
        })?;

        Ok((products, total))
    }

    /// Products at or below their critical stock threshold.
    #[instrument(skip(self))]
    pub async fn list_low_stock(&self, user_id: Uuid) -> Result<Vec<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        Product::find()
            .filter(product::Column::UserId.eq(user_id))
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::CriticalStock.is_not_null())
            .filter(
                Expr::col(product::Column::StockQuantity)
                    .lte(Expr::col(product::Column::CriticalStock)),
            )
            .order_by_asc(product::Column::StockQuantity)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when listing low stock products");
                ServiceError::db_error(format!("Failed to list low stock products: {}", e))
            })
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        let mut model: product::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }
        if let Some(barcode) = patch.barcode {
            model.barcode = Set(Some(barcode));
        }
        if let Some(unit) = patch.unit {
            model.unit = Set(unit);
        }
        if let Some(purchase_price) = patch.purchase_price {
            model.purchase_price = Set(purchase_price);
        }
        if let Some(sale_price) = patch.sale_price {
            model.sale_price = Set(sale_price);
        }
        if let Some(vat_rate) = patch.vat_rate {
            model.vat_rate = Set(vat_rate);
        }
        if let Some(stock_quantity) = patch.stock_quantity {
            model.stock_quantity = Set(stock_quantity);
        }
        if let Some(critical_stock) = patch.critical_stock {
            model.critical_stock = Set(Some(critical_stock));
        }
        if let Some(warehouse_id) = patch.warehouse_id {
            model.warehouse_id = Set(Some(warehouse_id));
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(product_id = %id, error = %e, "Database error when updating product");
            ServiceError::db_error(format!("Failed to update product: {}", e))
        })?;

        info!(product_id = %updated.id, "Product updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(product_id = %id, error = %e, "Database error when deleting product");
            ServiceError::db_error(format!("Failed to delete product: {}", e))
        })?;

        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
