use super::common::{
    validate_input, validate_min_zero, validate_positive, validate_vat_rate, PaginationParams,
    TenantParams,
};
use crate::entities::sale;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::sales::{NewSale, NewSaleItem, SalePatch, SaleWithItems};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "product_id": "550e8400-e29b-41d4-a716-446655440000",
    "quantity": "2",
    "unit_price": "19.90",
    "discount": "0"
}))]
pub struct CreateSaleItemRequest {
    pub product_id: Uuid,
    #[validate(custom = "validate_positive")]
    pub quantity: Decimal,
    /// Defaults to the product's sale price
    #[validate(custom = "validate_min_zero")]
    pub unit_price: Option<Decimal>,
    /// Defaults to the product's VAT rate
    #[validate(custom = "validate_vat_rate")]
    pub vat_rate: Option<Decimal>,
    #[serde(default)]
    #[validate(custom = "validate_min_zero")]
    pub discount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSaleRequest {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub sale_number: Option<String>,
    pub sale_date: Option<NaiveDateTime>,
    #[validate(length(max = 50))]
    pub status: Option<String>,
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    #[validate]
    pub items: Vec<CreateSaleItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSaleRequest {
    #[validate(length(min = 1, max = 50))]
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct IssueInvoiceRequest {
    /// Generated when absent
    #[validate(length(min = 1, max = 100))]
    pub invoice_number: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SaleListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    pub customer_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Record a sale
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    params(TenantParams),
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded", body = ApiResponse<SaleWithItems>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed or insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SaleWithItems>>), ApiError> {
    validate_input(&req)?;

    let items = req
        .items
        .into_iter()
        .map(|item| NewSaleItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            vat_rate: item.vat_rate,
            discount: item.discount,
        })
        .collect();

    let created = state
        .services
        .sales
        .create(NewSale {
            user_id: tenant.user_id,
            customer_id: req.customer_id,
            sale_number: req.sale_number,
            sale_date: req.sale_date,
            status: req.status,
            notes: req.notes,
            items,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a sale with its items
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    params(("id" = Uuid, Path, description = "Sale ID"), TenantParams),
    responses(
        (status = 200, description = "Sale found", body = ApiResponse<SaleWithItems>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<SaleWithItems>>, ApiError> {
    let found = state.services.sales.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List sales
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(SaleListParams),
    responses(
        (status = 200, description = "Sales listed", body = ApiResponse<PaginatedResponse<sale::Model>>)
    ),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<SaleListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<sale::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .sales
        .list(
            params.user_id,
            page,
            per_page,
            params.customer_id,
            params.status,
        )
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update a sale's status or notes
#[utoipa::path(
    put,
    path = "/api/v1/sales/{id}",
    params(("id" = Uuid, Path, description = "Sale ID"), TenantParams),
    request_body = UpdateSaleRequest,
    responses(
        (status = 200, description = "Sale updated", body = ApiResponse<sale::Model>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateSaleRequest>,
) -> Result<Json<ApiResponse<sale::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .sales
        .update(
            tenant.user_id,
            id,
            SalePatch {
                status: req.status,
                notes: req.notes,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Issue the invoice for a sale
#[utoipa::path(
    post,
    path = "/api/v1/sales/{id}/invoice",
    params(("id" = Uuid, Path, description = "Sale ID"), TenantParams),
    request_body = IssueInvoiceRequest,
    responses(
        (status = 200, description = "Invoice issued", body = ApiResponse<sale::Model>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Invoice already issued", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn issue_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<IssueInvoiceRequest>,
) -> Result<Json<ApiResponse<sale::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .sales
        .issue_invoice(tenant.user_id, id, req.invoice_number)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a sale
#[utoipa::path(
    delete,
    path = "/api/v1/sales/{id}",
    params(("id" = Uuid, Path, description = "Sale ID"), TenantParams),
    responses(
        (status = 204, description = "Sale deleted"),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.sales.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sale).get(list_sales))
        .route("/:id", get(get_sale).put(update_sale).delete(delete_sale))
        .route("/:id/invoice", post(issue_invoice))
}
