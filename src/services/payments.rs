use crate::{
    db::DbPool,
    entities::{
        customer::{self, Entity as Customer},
        payment::{self, Entity as Payment, PaymentMethod},
    },
    errors::ServiceError,
};
use chrono::{NaiveDateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub sale_id: Option<Uuid>,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub paid_at: Option<NaiveDateTime>,
    pub note: Option<String>,
}

/// Service for collecting customer payments
pub struct PaymentService {
    db_pool: Arc<DbPool>,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a payment. When it is tied to a customer the customer's open
    /// balance is reduced by the collected amount in the same transaction.
    #[instrument(skip(self, new), fields(user_id = %new.user_id, amount = %new.amount, method = %new.method))]
    pub async fn create(&self, new: NewPayment) -> Result<payment::Model, ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction for payment");
            ServiceError::db_error(format!("Failed to begin transaction: {}", e))
        })?;

        if let Some(customer_id) = new.customer_id {
            let customer = self.get_customer(&txn, new.user_id, customer_id).await?;
            let balance = customer.balance - new.amount;
            let mut model: customer::ActiveModel = customer.into();
            model.balance = Set(balance);
            model.updated_at = Set(Some(Utc::now().naive_utc()));
            model.update(&txn).await.map_err(|e| {
                error!(customer_id = %customer_id, error = %e, "Database error when adjusting customer balance");
                ServiceError::db_error(format!("Failed to adjust customer balance: {}", e))
            })?;
        }

        let model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            customer_id: Set(new.customer_id),
            sale_id: Set(new.sale_id),
            amount: Set(new.amount),
            method: Set(new.method),
            paid_at: Set(new.paid_at.unwrap_or_else(|| Utc::now().naive_utc())),
            note: Set(new.note),
            created_at: Set(Utc::now().naive_utc()),
        };

        let created = model.insert(&txn).await.map_err(|e| {
            let msg = format!("Failed to create payment: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit payment");
            ServiceError::db_error(format!("Failed to commit transaction: {}", e))
        })?;

        counter!("defter_payments.recorded", 1);

        info!(payment_id = %created.id, amount = %created.amount, "Payment recorded");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<payment::Model, ServiceError> {
        let db = &*self.db_pool;

        Payment::find_by_id(id)
            .filter(payment::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(payment_id = %id, error = %e, "Database error when fetching payment");
                ServiceError::db_error(format!("Failed to get payment: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Payment with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        customer_id: Option<Uuid>,
        method: Option<PaymentMethod>,
    ) -> Result<(Vec<payment::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Payment::find().filter(payment::Column::UserId.eq(user_id));

        if let Some(customer_id) = customer_id {
            query = query.filter(payment::Column::CustomerId.eq(customer_id));
        }
        if let Some(method) = method {
            query = query.filter(payment::Column::Method.eq(method));
        }

        let paginator = query
            .order_by_desc(payment::Column::PaidAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting payments");
            ServiceError::db_error(format!("Failed to count payments: {}", e))
        })?;

        let payments = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching payments");
            ServiceError::db_error(format!("Failed to fetch payments: {}", e))
        })?;

        Ok((payments, total))
    }

    /// Deletes a payment and puts the amount back on the customer's balance
    /// so the ledger stays consistent.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction for payment deletion");
            ServiceError::db_error(format!("Failed to begin transaction: {}", e))
        })?;

        if let Some(customer_id) = existing.customer_id {
            let customer = self.get_customer(&txn, user_id, customer_id).await?;
            let balance = customer.balance + existing.amount;
            let mut model: customer::ActiveModel = customer.into();
            model.balance = Set(balance);
            model.updated_at = Set(Some(Utc::now().naive_utc()));
            model.update(&txn).await.map_err(|e| {
                error!(customer_id = %customer_id, error = %e, "Database error when restoring customer balance");
                ServiceError::db_error(format!("Failed to restore customer balance: {}", e))
            })?;
        }

        existing.delete(&txn).await.map_err(|e| {
            error!(payment_id = %id, error = %e, "Database error when deleting payment");
            ServiceError::db_error(format!("Failed to delete payment: {}", e))
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit payment deletion");
            ServiceError::db_error(format!("Failed to commit transaction: {}", e))
        })?;

        info!(payment_id = %id, "Payment deleted");
        Ok(())
    }

    async fn get_customer<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
        customer_id: Uuid,
    ) -> Result<customer::Model, ServiceError> {
        Customer::find_by_id(customer_id)
            .filter(customer::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(|e| {
                error!(customer_id = %customer_id, error = %e, "Database error when fetching customer");
                ServiceError::db_error(format!("Failed to get customer: {}", e))
            })?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer with ID {} not found", customer_id))
            })
    }
}
