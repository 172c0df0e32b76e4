use super::common::{
    default_true, validate_input, validate_min_zero, validate_positive, PaginationParams,
    TenantParams,
};
use crate::entities::sales_return;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::returns::{NewReturn, NewReturnItem, ReturnPatch};
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
    "product_id": "550e8400-e29b-41d4-a716-446655440000",
    "quantity": "1",
    "unit_price": "19.90"
}))]
pub struct CreateReturnItemRequest {
    /// Product to restock; free-text lines may omit it
    pub product_id: Option<Uuid>,
    /// Required when no product is referenced
    #[validate(length(min = 1, max = 255))]
    pub product_name: Option<String>,
    #[validate(custom = "validate_positive")]
    pub quantity: Decimal,
    #[validate(custom = "validate_min_zero")]
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReturnRequest {
    pub sale_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub return_date: Option<NaiveDateTime>,
    pub reason: Option<String>,
    /// Put returned quantities back on stock; defaults to true
    #[serde(default = "default_true")]
    pub restock: bool,
    #[validate(length(min = 1))]
    #[validate]
    pub items: Vec<CreateReturnItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReturnRequest {
    #[validate(length(min = 1, max = 50))]
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReturnListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    pub status: Option<String>,
}

/// Record a return
#[utoipa::path(
    post,
    path = "/api/v1/returns",
    params(TenantParams),
    request_body = CreateReturnRequest,
    responses(
        (status = 201, description = "Return recorded", body = ApiResponse<sales_return::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Returns"
)]
pub async fn create_return(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateReturnRequest>,
) -> Result<(StatusCode, Json<ApiResponse<sales_return::Model>>), ApiError> {
    validate_input(&req)?;

    let items = req
        .items
        .into_iter()
        .map(|item| NewReturnItem {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect();

    let created = state
        .services
        .returns
        .create(NewReturn {
            user_id: tenant.user_id,
            sale_id: req.sale_id,
            customer_id: req.customer_id,
            return_date: req.return_date,
            reason: req.reason,
            restock: req.restock,
            items,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a return
#[utoipa::path(
    get,
    path = "/api/v1/returns/{id}",
    params(("id" = Uuid, Path, description = "Return ID"), TenantParams),
    responses(
        (status = 200, description = "Return found", body = ApiResponse<sales_return::Model>),
        (status = 404, description = "Return not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Returns"
)]
pub async fn get_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<sales_return::Model>>, ApiError> {
    let found = state.services.returns.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List returns
#[utoipa::path(
    get,
    path = "/api/v1/returns",
    params(ReturnListParams),
    responses(
        (status = 200, description = "Returns listed", body = ApiResponse<PaginatedResponse<sales_return::Model>>)
    ),
    tag = "Returns"
)]
pub async fn list_returns(
    State(state): State<AppState>,
    Query(params): Query<ReturnListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<sales_return::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .returns
        .list(params.user_id, page, per_page, params.status)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update a return's status or reason
#[utoipa::path(
    put,
    path = "/api/v1/returns/{id}",
    params(("id" = Uuid, Path, description = "Return ID"), TenantParams),
    request_body = UpdateReturnRequest,
    responses(
        (status = 200, description = "Return updated", body = ApiResponse<sales_return::Model>),
        (status = 404, description = "Return not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Returns"
)]
pub async fn update_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateReturnRequest>,
) -> Result<Json<ApiResponse<sales_return::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .returns
        .update(
            tenant.user_id,
            id,
            ReturnPatch {
                status: req.status,
                reason: req.reason,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a return
#[utoipa::path(
    delete,
    path = "/api/v1/returns/{id}",
    params(("id" = Uuid, Path, description = "Return ID"), TenantParams),
    responses(
        (status = 204, description = "Return deleted"),
        (status = 404, description = "Return not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Returns"
)]
pub async fn delete_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.returns.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn returns_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_return).get(list_returns))
        .route(
            "/:id",
            get(get_return).put(update_return).delete(delete_return),
        )
}
