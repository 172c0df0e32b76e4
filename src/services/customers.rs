use crate::{
    db::DbPool,
    entities::customer::{self, Entity as Customer},
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
pub struct NewCustomer {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub is_active: Option<bool>,
}

/// Service for managing a tenant's customers
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new: NewCustomer) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            name: Set(new.name.clone()),
            email: Set(new.email),
            phone: Set(new.phone),
            address: Set(new.address),
            tax_number: Set(new.tax_number),
            balance: Set(Decimal::ZERO),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create customer: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        info!(customer_id = %created.id, name = %new.name, "Customer created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;

        Customer::find_by_id(id)
            .filter(customer::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(customer_id = %id, error = %e, "Database error when fetching customer");
                ServiceError::db_error(format!("Failed to get customer: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        search: Option<String>,
        is_active: Option<bool>,
    ) -> Result<(Vec<customer::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Customer::find().filter(customer::Column::UserId.eq(user_id));

        if let Some(is_active) = is_active {
            query = query.filter(customer::Column::IsActive.eq(is_active));
        }

        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            query = query.filter(
                customer::Column::Name
                    .like(&pattern)
                    .or(customer::Column::Email.like(&pattern))
                    .or(customer::Column::Phone.like(&pattern)),
            );
        }

        let paginator = query
            .order_by_desc(customer::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting customers");
            ServiceError::db_error(format!("Failed to count customers: {}", e))
        })?;

        let customers = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching customers");
            ServiceError::db_error(format!("Failed to fetch customers: {}", e))
        })?;

        Ok((customers, total))
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: CustomerPatch,
    ) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        let mut model: customer::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(email) = patch.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = patch.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = patch.address {
            model.address = Set(Some(address));
        }
        if let Some(tax_number) = patch.tax_number {
            model.tax_number = Set(Some(tax_number));
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(customer_id = %id, error = %e, "Database error when updating customer");
            ServiceError::db_error(format!("Failed to update customer: {}", e))
        })?;

        info!(customer_id = %updated.id, "Customer updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(customer_id = %id, error = %e, "Database error when deleting customer");
            ServiceError::db_error(format!("Failed to delete customer: {}", e))
        })?;

        info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}
