use crate::{
    db::DbPool,
    entities::account::{self, AccountKind, Entity as Account},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub opening_balance: Decimal,
    pub iban: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub iban: Option<String>,
    pub is_active: Option<bool>,
}

/// Both sides of a completed transfer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferOutcome {
    pub from: account::Model,
    pub to: account::Model,
    pub amount: Decimal,
}

/// Service for cash and bank accounts and transfers between them
pub struct AccountService {
    db_pool: Arc<DbPool>,
}

impl AccountService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new: NewAccount) -> Result<account::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = account::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            name: Set(new.name.clone()),
            kind: Set(new.kind),
            currency: Set(new.currency),
            balance: Set(new.opening_balance),
            iban: Set(new.iban),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create account: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        info!(account_id = %created.id, name = %new.name, kind = %created.kind, "Account created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<account::Model, ServiceError> {
        let db = &*self.db_pool;
        self.get_account(db, user_id, id).await
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        kind: Option<AccountKind>,
    ) -> Result<(Vec<account::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Account::find().filter(account::Column::UserId.eq(user_id));

        if let Some(kind) = kind {
            query = query.filter(account::Column::Kind.eq(kind));
        }

        let paginator = query
            .order_by_asc(account::Column::Name)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting accounts");
            ServiceError::db_error(format!("Failed to count accounts: {}", e))
        })?;

        let accounts = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching accounts");
            ServiceError::db_error(format!("Failed to fetch accounts: {}", e))
        })?;

        Ok((accounts, total))
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: AccountPatch,
    ) -> Result<account::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_account(db, user_id, id).await?;
        let mut model: account::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(iban) = patch.iban {
            model.iban = Set(Some(iban));
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(account_id = %id, error = %e, "Database error when updating account");
            ServiceError::db_error(format!("Failed to update account: {}", e))
        })?;

        info!(account_id = %updated.id, "Account updated");
        Ok(updated)
    }

    /// Moves money between two of the tenant's accounts: one debit, one
    /// credit, committed together. The source balance may go negative.
    #[instrument(skip(self))]
    pub async fn transfer(
        &self,
        user_id: Uuid,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: Decimal,
    ) -> Result<TransferOutcome, ServiceError> {
        let db = &*self.db_pool;

        if from_account_id == to_account_id {
            return Err(ServiceError::ValidationError(
                "Transfer requires two different accounts".to_string(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Transfer amount must be positive".to_string(),
            ));
        }

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction for transfer");
            ServiceError::db_error(format!("Failed to begin transaction: {}", e))
        })?;

        let from = self.get_account(&txn, user_id, from_account_id).await?;
        let to = self.get_account(&txn, user_id, to_account_id).await?;

        let now = Utc::now().naive_utc();

        let debited_balance = from.balance - amount;
        let mut from_model: account::ActiveModel = from.into();
        from_model.balance = Set(debited_balance);
        from_model.updated_at = Set(Some(now));
        let from = from_model.update(&txn).await.map_err(|e| {
            error!(account_id = %from_account_id, error = %e, "Database error when debiting account");
            ServiceError::db_error(format!("Failed to debit account: {}", e))
        })?;

        let credited_balance = to.balance + amount;
        let mut to_model: account::ActiveModel = to.into();
        to_model.balance = Set(credited_balance);
        to_model.updated_at = Set(Some(now));
        let to = to_model.update(&txn).await.map_err(|e| {
            error!(account_id = %to_account_id, error = %e, "Database error when crediting account");
            ServiceError::db_error(format!("Failed to credit account: {}", e))
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit transfer");
            ServiceError::db_error(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            from_account = %from.id,
            to_account = %to.id,
            amount = %amount,
            "Transfer completed"
        );

        Ok(TransferOutcome { from, to, amount })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_account(db, user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(account_id = %id, error = %e, "Database error when deleting account");
            ServiceError::db_error(format!("Failed to delete account: {}", e))
        })?;

        info!(account_id = %id, "Account deleted");
        Ok(())
    }

    async fn get_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<account::Model, ServiceError> {
        Account::find_by_id(id)
            .filter(account::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(|e| {
                error!(account_id = %id, error = %e, "Database error when fetching account");
                ServiceError::db_error(format!("Failed to get account: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Account with ID {} not found", id)))
    }
}
