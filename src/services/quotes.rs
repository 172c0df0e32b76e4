use crate::{
    db::DbPool,
    entities::quote::{self, Entity as Quote},
    errors::ServiceError,
    services::generate_document_number,
};
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewQuoteItem {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewQuote {
    pub user_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub quote_number: Option<String>,
    pub quote_date: Option<NaiveDateTime>,
    pub valid_until: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub items: Vec<NewQuoteItem>,
}

#[derive(Debug, Clone, Default)]
pub struct QuotePatch {
    pub status: Option<String>,
    pub valid_until: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

/// Line shape stored in the quote's `items` JSON column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLine {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Service for price quotes. Quotes never touch stock or balances; they are
/// offers, not transactions.
pub struct QuoteService {
    db_pool: Arc<DbPool>,
}

impl QuoteService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, new), fields(user_id = %new.user_id, item_count = new.items.len()))]
    pub async fn create(&self, new: NewQuote) -> Result<quote::Model, ServiceError> {
        let db = &*self.db_pool;

        if new.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A quote requires at least one item".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let mut total_amount = Decimal::ZERO;
        let mut lines = Vec::with_capacity(new.items.len());

        for item in &new.items {
            let line_total = (item.quantity * item.unit_price).round_dp(2);
            total_amount += line_total;
            lines.push(QuoteLine {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total,
            });
        }

        let items_json = serde_json::to_value(&lines).map_err(|e| {
            error!(error = %e, "Failed to serialize quote items");
            ServiceError::InternalError(format!("Failed to serialize quote items: {}", e))
        })?;

        let quote_number = new
            .quote_number
            .unwrap_or_else(|| generate_document_number("QT"));

        let model = quote::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            customer_id: Set(new.customer_id),
            quote_number: Set(quote_number),
            quote_date: Set(new.quote_date.unwrap_or(now)),
            valid_until: Set(new.valid_until),
            status: Set(quote::STATUS_DRAFT.to_string()),
            total: Set(total_amount.round_dp(2)),
            items: Set(items_json),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = model.insert(db).await.map_err(|e| {
            let msg = format!("Failed to create quote: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        info!(
            quote_id = %created.id,
            quote_number = %created.quote_number,
            total = %created.total,
            "Quote created"
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<quote::Model, ServiceError> {
        let db = &*self.db_pool;

        Quote::find_by_id(id)
            .filter(quote::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(quote_id = %id, error = %e, "Database error when fetching quote");
                ServiceError::db_error(format!("Failed to get quote: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Quote with ID {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        status: Option<String>,
        customer_id: Option<Uuid>,
    ) -> Result<(Vec<quote::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Quote::find().filter(quote::Column::UserId.eq(user_id));

        if let Some(status) = status {
            query = query.filter(quote::Column::Status.eq(status));
        }
        if let Some(customer_id) = customer_id {
            query = query.filter(quote::Column::CustomerId.eq(customer_id));
        }

        let paginator = query
            .order_by_desc(quote::Column::QuoteDate)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting quotes");
            ServiceError::db_error(format!("Failed to count quotes: {}", e))
        })?;

        let quotes = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching quotes");
            ServiceError::db_error(format!("Failed to fetch quotes: {}", e))
        })?;

        Ok((quotes, total))
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: QuotePatch,
    ) -> Result<quote::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        let mut model: quote::ActiveModel = existing.into();

        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if let Some(valid_until) = patch.valid_until {
            model.valid_until = Set(Some(valid_until));
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(quote_id = %id, error = %e, "Database error when updating quote");
            ServiceError::db_error(format!("Failed to update quote: {}", e))
        })?;

        info!(quote_id = %updated.id, status = %updated.status, "Quote updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get(user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(quote_id = %id, error = %e, "Database error when deleting quote");
            ServiceError::db_error(format!("Failed to delete quote: {}", e))
        })?;

        info!(quote_id = %id, "Quote deleted");
        Ok(())
    }
}
