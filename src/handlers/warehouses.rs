use super::common::{validate_input, PaginationParams, TenantParams};
use crate::entities::warehouse;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::warehouses::{NewWarehouse, WarehousePatch};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"name": "Merkez Depo", "is_default": true}))]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateWarehouseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WarehouseListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
}

/// Create a warehouse
#[utoipa::path(
    post,
    path = "/api/v1/warehouses",
    params(TenantParams),
    request_body = CreateWarehouseRequest,
    responses(
        (status = 201, description = "Warehouse created", body = ApiResponse<warehouse::Model>),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Warehouses"
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<warehouse::Model>>), ApiError> {
    validate_input(&req)?;

    let created = state
        .services
        .warehouses
        .create(NewWarehouse {
            user_id: tenant.user_id,
            name: req.name,
            address: req.address,
            is_default: req.is_default,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a warehouse
#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse ID"), TenantParams),
    responses(
        (status = 200, description = "Warehouse found", body = ApiResponse<warehouse::Model>),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Warehouses"
)]
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<warehouse::Model>>, ApiError> {
    let found = state.services.warehouses.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List warehouses
#[utoipa::path(
    get,
    path = "/api/v1/warehouses",
    params(WarehouseListParams),
    responses(
        (status = 200, description = "Warehouses listed", body = ApiResponse<PaginatedResponse<warehouse::Model>>)
    ),
    tag = "Warehouses"
)]
pub async fn list_warehouses(
    State(state): State<AppState>,
    Query(params): Query<WarehouseListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<warehouse::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .warehouses
        .list(params.user_id, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update a warehouse
#[utoipa::path(
    put,
    path = "/api/v1/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse ID"), TenantParams),
    request_body = UpdateWarehouseRequest,
    responses(
        (status = 200, description = "Warehouse updated", body = ApiResponse<warehouse::Model>),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Warehouses"
)]
pub async fn update_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateWarehouseRequest>,
) -> Result<Json<ApiResponse<warehouse::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .warehouses
        .update(
            tenant.user_id,
            id,
            WarehousePatch {
                name: req.name,
                address: req.address,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Make a warehouse the tenant's default
#[utoipa::path(
    put,
    path = "/api/v1/warehouses/{id}/default",
    params(("id" = Uuid, Path, description = "Warehouse ID"), TenantParams),
    responses(
        (status = 200, description = "Warehouse set as default", body = ApiResponse<warehouse::Model>),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Warehouses"
)]
pub async fn set_default_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<warehouse::Model>>, ApiError> {
    let updated = state
        .services
        .warehouses
        .set_default(tenant.user_id, id)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a warehouse
#[utoipa::path(
    delete,
    path = "/api/v1/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse ID"), TenantParams),
    responses(
        (status = 204, description = "Warehouse deleted"),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Warehouses"
)]
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.warehouses.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn warehouses_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            axum::routing::post(create_warehouse).get(list_warehouses),
        )
        .route(
            "/:id",
            get(get_warehouse)
                .put(update_warehouse)
                .delete(delete_warehouse),
        )
        .route("/:id/default", put(set_default_warehouse))
}
