use crate::{
    db::DbPool,
    entities::expense::{self, Entity as Expense},
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: Uuid,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
}

/// Service for tracking business expenses
pub struct ExpenseService {
    db_pool: Arc<DbPool>,
}

impl ExpenseService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new: NewExpense) -> Result<expense::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = expense::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            category: Set(new.category.clone()),
            description: Set(new.description),
            amount: Set(new.amount),
            expense_date: Set(new.expense_date),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create expense: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        info!(expense_id = %created.id, category = %new.category, amount = %created.amount, "Expense recorded");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<expense::Model, ServiceError> {
        let db = &*self.db_pool;

        Expense::find_by_id(id)
            .filter(expense::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(expense_id = %id, error = %e, "Database error when fetching expense");
                ServiceError::db_error(format!("Failed to get expense: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Expense with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        category: Option<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<(Vec<expense::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Expense::find().filter(expense::Column::UserId.eq(user_id));

        if let Some(category) = category {
            query = query.filter(expense::Column::Category.eq(category));
        }
        if let Some(from) = from {
            query = query.filter(expense::Column::ExpenseDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(expense::Column::ExpenseDate.lte(to));
        }

        let paginator = query
            .order_by_desc(expense::Column::ExpenseDate)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting expenses");
            ServiceError::db_error(format!("Failed to count expenses: {}", e))
        })?;

        let expenses = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching expenses");
            ServiceError::db_error(format!("Failed to fetch expenses: {}", e))
        })?;

        Ok((expenses, total))
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ExpensePatch,
    ) -> Result<expense::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        let mut model: expense::ActiveModel = existing.into();

        if let Some(category) = patch.category {
            model.category = Set(category);
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }
        if let Some(amount) = patch.amount {
            model.amount = Set(amount);
        }
        if let Some(expense_date) = patch.expense_date {
            model.expense_date = Set(expense_date);
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(expense_id = %id, error = %e, "Database error when updating expense");
            ServiceError::db_error(format!("Failed to update expense: {}", e))
        })?;

        info!(expense_id = %updated.id, "Expense updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(expense_id = %id, error = %e, "Database error when deleting expense");
            ServiceError::db_error(format!("Failed to delete expense: {}", e))
        })?;

        info!(expense_id = %id, "Expense deleted");
        Ok(())
    }
}
