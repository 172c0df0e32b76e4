use crate::{
    db::DbPool,
    entities::warehouse::{self, Entity as Warehouse},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewWarehouse {
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WarehousePatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Service for managing a tenant's warehouses
pub struct WarehouseService {
    db_pool: Arc<DbPool>,
}

impl WarehouseService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a warehouse. When the new warehouse is flagged as default the
    /// tenant's previous default is cleared in the same transaction.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewWarehouse) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction for warehouse creation");
            ServiceError::db_error(format!("Failed to begin transaction: {}", e))
        })?;

        if new.is_default {
            Warehouse::update_many()
                .col_expr(warehouse::Column::IsDefault, Expr::value(false))
                .filter(warehouse::Column::UserId.eq(new.user_id))
                .filter(warehouse::Column::IsDefault.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to clear previous default warehouse");
                    ServiceError::db_error(format!("Failed to clear default warehouse: {}", e))
                })?;
        }

        let model = warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            name: Set(new.name.clone()),
            address: Set(new.address),
            is_default: Set(new.is_default),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
        };

        let created = model.insert(&txn).await.map_err(|e| {
            let msg = format!("Failed to create warehouse: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit warehouse creation");
            ServiceError::db_error(format!("Failed to commit transaction: {}", e))
        })?;

        info!(warehouse_id = %created.id, name = %new.name, "Warehouse created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        Warehouse::find_by_id(id)
            .filter(warehouse::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(warehouse_id = %id, error = %e, "Database error when fetching warehouse");
                ServiceError::db_error(format!("Failed to get warehouse: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<warehouse::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let paginator = Warehouse::find()
            .filter(warehouse::Column::UserId.eq(user_id))
            .order_by_desc(warehouse::Column::IsDefault)
            .order_by_asc(warehouse::Column::Name)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting warehouses");
            ServiceError::db_error(format!("Failed to count warehouses: {}", e))
        })?;

        let warehouses = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching warehouses");
            ServiceError::db_error(format!("Failed to fetch warehouses: {}", e))
        })?;

        Ok((warehouses, total))
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: WarehousePatch,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        let mut model: warehouse::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(address) = patch.address {
            model.address = Set(Some(address));
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(warehouse_id = %id, error = %e, "Database error when updating warehouse");
            ServiceError::db_error(format!("Failed to update warehouse: {}", e))
        })?;

        info!(warehouse_id = %updated.id, "Warehouse updated");
        Ok(updated)
    }

    /// Marks one warehouse as the tenant's default, clearing the flag on all
    /// of the tenant's other warehouses.
    #[instrument(skip(self))]
    pub async fn set_default(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction for default warehouse change");
            ServiceError::db_error(format!("Failed to begin transaction: {}", e))
        })?;

        Warehouse::update_many()
            .col_expr(warehouse::Column::IsDefault, Expr::value(false))
            .filter(warehouse::Column::UserId.eq(user_id))
            .filter(warehouse::Column::Id.ne(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to clear previous default warehouse");
                ServiceError::db_error(format!("Failed to clear default warehouse: {}", e))
            })?;

        let mut model: warehouse::ActiveModel = existing.into();
        model.is_default = Set(true);
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(&txn).await.map_err(|e| {
            error!(warehouse_id = %id, error = %e, "Database error when setting default warehouse");
            ServiceError::db_error(format!("Failed to set default warehouse: {}", e))
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit default warehouse change");
            ServiceError::db_error(format!("Failed to commit transaction: {}", e))
        })?;

        info!(warehouse_id = %id, "Warehouse set as default");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(warehouse_id = %id, error = %e, "Database error when deleting warehouse");
            ServiceError::db_error(format!("Failed to delete warehouse: {}", e))
        })?;

        info!(warehouse_id = %id, "Warehouse deleted");
        Ok(())
    }
}
