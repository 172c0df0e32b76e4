use crate::{
    db::DbPool,
    entities::{
        plan::{self, Entity as Plan},
        user::{self, Entity as User},
    },
    errors::ServiceError,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Service for the operator-facing tenant administration surface
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        User::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| {
                error!(user_id = %id, error = %e, "Database error when fetching user");
                ServiceError::db_error(format!("Failed to get user: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("User with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
        role: Option<String>,
        is_active: Option<bool>,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = User::find();

        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(is_active) = is_active {
            query = query.filter(user::Column::IsActive.eq(is_active));
        }

        let paginator = query
            .order_by_desc(user::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting users");
            ServiceError::db_error(format!("Failed to count users: {}", e))
        })?;

        let users = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching users");
            ServiceError::db_error(format!("Failed to fetch users: {}", e))
        })?;

        Ok((users, total))
    }

    /// Activates or suspends a tenant account.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(id).await?;
        let mut model: user::ActiveModel = existing.into();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(user_id = %id, error = %e, "Database error when changing user activation");
            ServiceError::db_error(format!("Failed to change user activation: {}", e))
        })?;

        info!(user_id = %id, is_active = is_active, "User activation changed");
        Ok(updated)
    }

    /// Puts a tenant on a plan, or takes them off one when `plan_id` is None.
    /// The plan must exist and be active to be assigned.
    #[instrument(skip(self))]
    pub async fn assign_plan(
        &self,
        id: Uuid,
        plan_id: Option<Uuid>,
        plan_expires_at: Option<NaiveDateTime>,
    ) -> Result<user::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(id).await?;

        if let Some(plan_id) = plan_id {
            let plan = Plan::find_by_id(plan_id)
                .one(db)
                .await
                .map_err(|e| {
                    error!(plan_id = %plan_id, error = %e, "Database error when fetching plan");
                    ServiceError::db_error(format!("Failed to get plan: {}", e))
                })?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Plan with ID {} not found", plan_id))
                })?;

            if !plan.is_active {
                return Err(ServiceError::InvalidOperation(format!(
                    "Plan '{}' is inactive and cannot be assigned",
                    plan.code
                )));
            }
        }

        let mut model: user::ActiveModel = existing.into();
        model.plan_id = Set(plan_id);
        model.plan_expires_at = Set(plan_expires_at);
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(user_id = %id, error = %e, "Database error when assigning plan");
            ServiceError::db_error(format!("Failed to assign plan: {}", e))
        })?;

        match plan_id {
            Some(plan_id) => info!(user_id = %id, plan_id = %plan_id, "Plan assigned"),
            None => info!(user_id = %id, "Plan cleared"),
        }
        Ok(updated)
    }
}
