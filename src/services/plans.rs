use crate::{
    db::DbPool,
    entities::plan::{self, Entity as Plan},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub code: String,
    pub name: String,
    pub monthly_price: Decimal,
    pub max_products: i32,
    pub max_customers: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PlanPatch {
    pub name: Option<String>,
    pub monthly_price: Option<Decimal>,
    pub max_products: Option<i32>,
    pub max_customers: Option<i32>,
    pub is_active: Option<bool>,
}

/// Service for subscription plans
pub struct PlanService {
    db_pool: Arc<DbPool>,
}

impl PlanService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a plan. Codes are unique; reusing one is a conflict.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewPlan) -> Result<plan::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = Plan::find()
            .filter(plan::Column::Code.eq(new.code.clone()))
            .one(db)
            .await
            .map_err(|e| {
                error!(code = %new.code, error = %e, "Database error when checking plan code");
                ServiceError::db_error(format!("Failed to check plan code: {}", e))
            })?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Plan with code '{}' already exists",
                new.code
            )));
        }

        let model = plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(new.code.clone()),
            name: Set(new.name.clone()),
            monthly_price: Set(new.monthly_price),
            max_products: Set(new.max_products),
            max_customers: Set(new.max_customers),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create plan: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        info!(plan_id = %created.id, code = %new.code, "Plan created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<plan::Model, ServiceError> {
        let db = &*self.db_pool;

        Plan::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| {
                error!(plan_id = %id, error = %e, "Database error when fetching plan");
                ServiceError::db_error(format!("Failed to get plan: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Plan with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
        include_inactive: bool,
    ) -> Result<(Vec<plan::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Plan::find();
        if !include_inactive {
            query = query.filter(plan::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(plan::Column::MonthlyPrice)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting plans");
            ServiceError::db_error(format!("Failed to count plans: {}", e))
        })?;

        let plans = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching plans");
            ServiceError::db_error(format!("Failed to fetch plans: {}", e))
        })?;

        Ok((plans, total))
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: Uuid, patch: PlanPatch) -> Result<plan::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(id).await?;
        let mut model: plan::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(monthly_price) = patch.monthly_price {
            model.monthly_price = Set(monthly_price);
        }
        if let Some(max_products) = patch.max_products {
            model.max_products = Set(max_products);
        }
        if let Some(max_customers) = patch.max_customers {
            model.max_customers = Set(max_customers);
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(plan_id = %id, error = %e, "Database error when updating plan");
            ServiceError::db_error(format!("Failed to update plan: {}", e))
        })?;

        info!(plan_id = %updated.id, "Plan updated");
        Ok(updated)
    }

    /// Deletes a plan. Tenants on the plan keep running; the schema clears
    /// their plan reference.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(plan_id = %id, error = %e, "Database error when deleting plan");
            ServiceError::db_error(format!("Failed to delete plan: {}", e))
        })?;

        info!(plan_id = %id, "Plan deleted");
        Ok(())
    }
}
