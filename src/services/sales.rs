use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as Product},
        sale::{self, Entity as Sale},
        sale_item::{self, Entity as SaleItem},
    },
    errors::ServiceError,
    services::generate_document_number,
};
use chrono::{NaiveDateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// One line of a new sale. Missing unit price and VAT rate fall back to the
/// product's own values at the time of sale.
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub vat_rate: Option<Decimal>,
    pub discount: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub user_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub sale_number: Option<String>,
    pub sale_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<NewSaleItem>,
}

#[derive(Debug, Clone, Default)]
pub struct SalePatch {
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// A sale together with its line items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: sale::Model,
    pub items: Vec<sale_item::Model>,
}

/// Service for recording sales and issuing their invoices
pub struct SaleService {
    db_pool: Arc<DbPool>,
}

impl SaleService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a sale: prices each line, totals the document, inserts the
    /// sale with its items and decrements product stock, all in one
    /// transaction. Any line exceeding available stock aborts the whole sale.
    #[instrument(skip(self, new), fields(user_id = %new.user_id, item_count = new.items.len()))]
    pub async fn create(&self, new: NewSale) -> Result<SaleWithItems, ServiceError> {
        let db = &*self.db_pool;

        if new.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A sale requires at least one item".to_string(),
            ));
        }

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction for sale creation");
            ServiceError::db_error(format!("Failed to begin transaction: {}", e))
        })?;

        let sale_id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        let mut subtotal = Decimal::ZERO;
        let mut discount_total = Decimal::ZERO;
        let mut vat_total = Decimal::ZERO;
        let mut item_models = Vec::with_capacity(new.items.len());

        for line in &new.items {
            let product = Product::find_by_id(line.product_id)
                .filter(product::Column::UserId.eq(new.user_id))
                .one(&txn)
                .await
                .map_err(|e| {
                    error!(product_id = %line.product_id, error = %e, "Database error when pricing sale item");
                    ServiceError::db_error(format!("Failed to load product: {}", e))
                })?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Product with ID {} not found",
                        line.product_id
                    ))
                })?;

            if product.stock_quantity < line.quantity {
                warn!(
                    product_id = %product.id,
                    requested = %line.quantity,
                    available = %product.stock_quantity,
                    "Sale rejected for insufficient stock"
                );
                return Err(ServiceError::InsufficientStock(format!(
                    "Product '{}' has {} in stock, requested {}",
                    product.name, product.stock_quantity, line.quantity
                )));
            }

            let unit_price = line.unit_price.unwrap_or(product.sale_price);
            let vat_rate = line.vat_rate.unwrap_or(product.vat_rate);
            let gross = line.quantity * unit_price;
            let net = gross - line.discount;
            let line_vat = (net * vat_rate / dec!(100)).round_dp(2);
            let line_total = (net + line_vat).round_dp(2);

            subtotal += gross;
            discount_total += line.discount;
            vat_total += line_vat;

            item_models.push(sale_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                product_id: Set(Some(product.id)),
                product_name: Set(product.name.clone()),
                quantity: Set(line.quantity),
                unit: Set(product.unit.clone()),
                unit_price: Set(unit_price.round_dp(2)),
                vat_rate: Set(vat_rate),
                discount: Set(line.discount),
                line_total: Set(line_total),
            });

            let remaining = product.stock_quantity - line.quantity;
            let mut stock_update: product::ActiveModel = product.into();
            stock_update.stock_quantity = Set(remaining);
            stock_update.updated_at = Set(Some(now));
            stock_update.update(&txn).await.map_err(|e| {
                error!(product_id = %line.product_id, error = %e, "Database error when decrementing stock");
                ServiceError::db_error(format!("Failed to decrement stock: {}", e))
            })?;
        }

        let subtotal = subtotal.round_dp(2);
        let discount_total = discount_total.round_dp(2);
        let vat_total = vat_total.round_dp(2);
        let grand_total = (subtotal - discount_total + vat_total).round_dp(2);

        let sale_number = new
            .sale_number
            .unwrap_or_else(|| generate_document_number("SL"));

        let sale_model = sale::ActiveModel {
            id: Set(sale_id),
            user_id: Set(new.user_id),
            customer_id: Set(new.customer_id),
            sale_number: Set(sale_number),
            sale_date: Set(new.sale_date.unwrap_or(now)),
            status: Set(new.status.unwrap_or_else(|| sale::STATUS_COMPLETED.to_string())),
            subtotal: Set(subtotal),
            discount: Set(discount_total),
            vat_total: Set(vat_total),
            grand_total: Set(grand_total),
            notes: Set(new.notes),
            invoice_number: Set(None),
            invoice_issued: Set(false),
            invoice_issued_at: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = sale_model.insert(&txn).await.map_err(|e| {
            let msg = format!("Failed to create sale: {}", e);
            error!(%msg);
            ServiceError::db_error(msg)
        })?;

        for item in item_models {
            item.insert(&txn).await.map_err(|e| {
                error!(sale_id = %sale_id, error = %e, "Database error when inserting sale item");
                ServiceError::db_error(format!("Failed to insert sale item: {}", e))
            })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit sale creation");
            ServiceError::db_error(format!("Failed to commit transaction: {}", e))
        })?;

        counter!("defter_sales.created", 1);

        info!(
            sale_id = %created.id,
            sale_number = %created.sale_number,
            grand_total = %created.grand_total,
            "Sale recorded"
        );

        self.get(new.user_id, created.id).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<SaleWithItems, ServiceError> {
        let db = &*self.db_pool;

        let sale = self.get_sale(db, user_id, id).await?;

        let items = SaleItem::find()
            .filter(sale_item::Column::SaleId.eq(id))
            .all(db)
            .await
            .map_err(|e| {
                error!(sale_id = %id, error = %e, "Database error when fetching sale items");
                ServiceError::db_error(format!("Failed to fetch sale items: {}", e))
            })?;

        Ok(SaleWithItems { sale, items })
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
        customer_id: Option<Uuid>,
        status: Option<String>,
    ) -> Result<(Vec<sale::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = Sale::find().filter(sale::Column::UserId.eq(user_id));

        if let Some(customer_id) = customer_id {
            query = query.filter(sale::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = status {
            query = query.filter(sale::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(sale::Column::SaleDate)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting sales");
            ServiceError::db_error(format!("Failed to count sales: {}", e))
        })?;

        let sales = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page = %page, error = %e, "Database error when fetching sales");
            ServiceError::db_error(format!("Failed to fetch sales: {}", e))
        })?;

        Ok((sales, total))
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: SalePatch,
    ) -> Result<sale::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_sale(db, user_id, id).await?;
        let mut model: sale::ActiveModel = existing.into();

        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = model.update(db).await.map_err(|e| {
            error!(sale_id = %id, error = %e, "Database error when updating sale");
            ServiceError::db_error(format!("Failed to update sale: {}", e))
        })?;

        info!(sale_id = %updated.id, "Sale updated");
        Ok(updated)
    }

    /// Stamps the sale with an invoice number. A sale can be invoiced once;
    /// a second attempt is a conflict.
    #[instrument(skip(self))]
    pub async fn issue_invoice(
        &self,
        user_id: Uuid,
        id: Uuid,
        invoice_number: Option<String>,
    ) -> Result<sale::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_sale(db, user_id, id).await?;

        if existing.invoice_issued {
            return Err(ServiceError::Conflict(format!(
                "Sale {} already has invoice {}",
                id,
                existing.invoice_number.as_deref().unwrap_or("(unnumbered)")
            )));
        }

        let now = Utc::now().naive_utc();
        let number = invoice_number.unwrap_or_else(|| generate_document_number("INV"));

        let mut model: sale::ActiveModel = existing.into();
        model.invoice_number = Set(Some(number.clone()));
        model.invoice_issued = Set(true);
        model.invoice_issued_at = Set(Some(now));
        model.updated_at = Set(Some(now));

        let updated = model.update(db).await.map_err(|e| {
            error!(sale_id = %id, error = %e, "Database error when issuing invoice");
            ServiceError::db_error(format!("Failed to issue invoice: {}", e))
        })?;

        info!(sale_id = %id, invoice_number = %number, "Invoice issued");
        Ok(updated)
    }

    /// Deletes a sale and, via the schema's cascade, its items. Stock is not
    /// restored; record a return when goods actually come back.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self.get_sale(db, user_id, id).await?;
        existing.delete(db).await.map_err(|e| {
            error!(sale_id = %id, error = %e, "Database error when deleting sale");
            ServiceError::db_error(format!("Failed to delete sale: {}", e))
        })?;

        info!(sale_id = %id, "Sale deleted");
        Ok(())
    }

    async fn get_sale<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<sale::Model, ServiceError> {
        Sale::find_by_id(id)
            .filter(sale::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(|e| {
                error!(sale_id = %id, error = %e, "Database error when fetching sale");
                ServiceError::db_error(format!("Failed to get sale: {}", e))
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale with ID {} not found", id)))
    }
}
