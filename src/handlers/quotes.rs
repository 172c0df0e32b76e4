use super::common::{
    validate_input, validate_min_zero, validate_positive, PaginationParams, TenantParams,
};
use crate::entities::quote;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::quotes::{NewQuote, NewQuoteItem, QuotePatch};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
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
    "product_name": "Çay Bardağı",
    "quantity": "100",
    "unit_price": "18.50"
}))]
pub struct CreateQuoteItemRequest {
    pub product_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub product_name: String,
    #[validate(custom = "validate_positive")]
    pub quantity: Decimal,
    #[validate(custom = "validate_min_zero")]
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuoteRequest {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub quote_number: Option<String>,
    pub quote_date: Option<NaiveDateTime>,
    pub valid_until: Option<NaiveDateTime>,
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    #[validate]
    pub items: Vec<CreateQuoteItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateQuoteRequest {
    #[validate(length(min = 1, max = 50))]
    pub status: Option<String>,
    pub valid_until: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuoteListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    pub status: Option<String>,
    pub customer_id: Option<Uuid>,
}

/// Create a quote
#[utoipa::path(
    post,
    path = "/api/v1/quotes",
    params(TenantParams),
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote created", body = ApiResponse<quote::Model>),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Quotes"
)]
pub async fn create_quote(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<quote::Model>>), ApiError> {
    validate_input(&req)?;

    let items = req
        .items
        .into_iter()
        .map(|item| NewQuoteItem {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect();

    let created = state
        .services
        .quotes
        .create(NewQuote {
            user_id: tenant.user_id,
            customer_id: req.customer_id,
            quote_number: req.quote_number,
            quote_date: req.quote_date,
            valid_until: req.valid_until,
            notes: req.notes,
            items,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a quote
#[utoipa::path(
    get,
    path = "/api/v1/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quote ID"), TenantParams),
    responses(
        (status = 200, description = "Quote found", body = ApiResponse<quote::Model>),
        (status = 404, description = "Quote not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Quotes"
)]
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<quote::Model>>, ApiError> {
    let found = state.services.quotes.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List quotes
#[utoipa::path(
    get,
    path = "/api/v1/quotes",
    params(QuoteListParams),
    responses(
        (status = 200, description = "Quotes listed", body = ApiResponse<PaginatedResponse<quote::Model>>)
    ),
    tag = "Quotes"
)]
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(params): Query<QuoteListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<quote::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .quotes
        .list(params.user_id, page, per_page, params.status, params.customer_id)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update a quote's status, validity, or notes
#[utoipa::path(
    put,
    path = "/api/v1/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quote ID"), TenantParams),
    request_body = UpdateQuoteRequest,
    responses(
        (status = 200, description = "Quote updated", body = ApiResponse<quote::Model>),
        (status = 404, description = "Quote not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Quotes"
)]
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateQuoteRequest>,
) -> Result<Json<ApiResponse<quote::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .quotes
        .update(
            tenant.user_id,
            id,
            QuotePatch {
                status: req.status,
                valid_until: req.valid_until,
                notes: req.notes,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a quote
#[utoipa::path(
    delete,
    path = "/api/v1/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quote ID"), TenantParams),
    responses(
        (status = 204, description = "Quote deleted"),
        (status = 404, description = "Quote not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Quotes"
)]
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.quotes.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn quotes_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_quote).get(list_quotes))
        .route(
            "/:id",
            get(get_quote).put(update_quote).delete(delete_quote),
        )
}
