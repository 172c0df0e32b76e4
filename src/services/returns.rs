use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as Product},
        sales_return::{self, Entity as SalesReturn},
    },
    errors::ServiceError,
};
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewReturnItem {
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewReturn {
    pub user_id: Uuid,
    pub sale_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub return_date: Option<NaiveDateTime>,
    pub reason: Option<String>,
    pub restock: bool,
    pub items: Vec<NewReturnItem>,
}

#[derive(Debug, Clone, Default)]
pub struct ReturnPatch {
    pub status: Option<String>,
    pub reason: Option<String>,
}

/// Line shape stored in the return's `items` JSON column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnLine {
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Service for recording customer returns
pub struct ReturnService {
    db_pool: Arc<DbPool>,
}

impl ReturnService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a return. With `restock` set, every line that references a
    /// product puts its quantity back on that product's stock in the same
    /// transaction; a line pointing at an unknown product aborts the return.
    #[instrument(skip(self, new), fields(user_id = %new.user_id, item_count = new.items.len(), restock = new.restock))]
    pub async fn create(&self, new: NewReturn) -> Result<sales_return::Model, ServiceError> {
        let db = &*self.db_pool;

        if new.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A return requires at least one item".to_string(),
            ));
        }

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction for return");
            ServiceError::db_error(format!("Failed to begin transaction: {}", e))
        })?;

        let now = Utc::now().naive_utc();
        let mut total_amount = Decimal::ZERO;
        let mut lines = Vec::with_capacity(new.items.len());

        for item in &new.items {
            let line_total = (item.quantity * item.unit_price).round_dp(2);
            total_amount += line_total;

            let mut product_name = item.product_name.clone();

            if let Some(product_id) = item.product_id {
                let product = Product::find_by_id(product_id)
                    .filter(product::Column::UserId.eq(new.user_id))
                    .one(&txn)
                    .await
                    .map_err(|e| {
                        error!(product_id = %product_id, error = %e, "Database error when loading returned product");
                        ServiceError::db_error(format!("Failed to load product: {}", e))
                    })?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "Product with ID {} not found",
                            product_id
                        ))
                    })?;

                if product_name.is_none() {
                    product_name = Some(product.name.clone());
                }

                if new.restock {
                    let restored = product.stock_quantity + item.quantity;
                    let mut model: product::ActiveModel = product.into();
                    model.stock_quantity = Set(restored);
                    model.updated_at = Set(Some(now));
                    model.update(&txn).await.map_err(|e| {
                        error!(product_id = %product_id, error = %e, "Database error when restocking product");
                        ServiceError::db_error(format!("Failed to restock product: {}", e))
                    })?;
                }
            }

            lines.push(ReturnLine {
                product_id: item.product_id,
                product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total,
            });
        }

        let items_json = serde_json::to_value(&lines).map_err(|e| {
            error!(error = %e, "Failed to serialize return items");
            ServiceError::InternalError(format!("Failed to serialize return items: {}", e))
        })?;

        let model = sales_return::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            sale_id: Set(new.sale_id),
            customer_id: Set(new.customer_id),
            return_date: Set(new.return_date.unwrap_or(now)),
            status: Set(sales_return::STATUS_PENDING.to_string()),
            reason: Set(new.reason),
            total: Set(total_amount.round_dp(2)),
            items: Set(items_json),
            restock: Set(new.restock),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = model.insert(&txn).await.map_err(|e| {
            let msg = format!("Failed to create return: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit return");
            ServiceError::db_error(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            return_id = %created.id,
            total = %created.total,
            restock = created.restock,
            "Return recorded"
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<sales_return::Model, ServiceError> {
        let db = &*self.db_pool;

        SalesReturn::find_by_id(id)
            .filter(sales_return::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(return_id = %id, error = %e, "Database error when fetching return");
                ServiceError::db_error(format!("Failed to get return: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Return with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        status: Option<String>,
    ) -> Result<(Vec<sales_return::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = SalesReturn::find().filter(sales_return::Column::UserId.eq(user_id));

        if let Some(status) = status {
            query = query.filter(sales_return::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(sales_return::Column::ReturnDate)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting returns");
            ServiceError::db_error(format!("Failed to count returns: {}", e))
        })?;

        let returns = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching returns");
            ServiceError::db_error(format!("Failed to fetch returns: {}", e))
        })?;

        Ok((returns, total))
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ReturnPatch,
    ) -> Result<sales_return::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        let mut model: sales_return::ActiveModel = existing.into();

        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if let Some(reason) = patch.reason {
            model.reason = Set(Some(reason));
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(return_id = %id, error = %e, "Database error when updating return");
            ServiceError::db_error(format!("Failed to update return: {}", e))
        })?;

        info!(return_id = %updated.id, status = %updated.status, "Return updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(return_id = %id, error = %e, "Database error when deleting return");
            ServiceError::db_error(format!("Failed to delete return: {}", e))
        })?;

        info!(return_id = %id, "Return deleted");
        Ok(())
    }
}
