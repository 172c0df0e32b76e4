use super::common::{
    default_unit, default_vat_rate, validate_input, validate_min_zero, validate_vat_rate,
    PaginationParams, TenantParams,
};
use crate::entities::product;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::products::{NewProduct, ProductPatch};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Çay Bardağı",
    "barcode": "8690000000017",
    "unit": "adet",
    "purchase_price": "12.50",
    "sale_price": "19.90",
    "vat_rate": "20",
    "stock_quantity": "150"
}))]
pub struct CreateProductRequest {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub barcode: Option<String>,
    /// Unit of measure; defaults to `adet` (piece)
    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    #[serde(default)]
    #[validate(custom = "validate_min_zero")]
    pub purchase_price: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_min_zero")]
    pub sale_price: Decimal,
    /// VAT percentage; defaults to 20
    #[serde(default = "default_vat_rate")]
    #[validate(custom = "validate_vat_rate")]
    pub vat_rate: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_min_zero")]
    pub stock_quantity: Decimal,
    #[validate(custom = "validate_min_zero")]
    pub critical_stock: Option<Decimal>,
    pub warehouse_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 2, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub barcode: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub unit: Option<String>,
    #[validate(custom = "validate_min_zero")]
    pub purchase_price: Option<Decimal>,
    #[validate(custom = "validate_min_zero")]
    pub sale_price: Option<Decimal>,
    #[validate(custom = "validate_vat_rate")]
    pub vat_rate: Option<Decimal>,
    #[validate(custom = "validate_min_zero")]
    pub stock_quantity: Option<Decimal>,
    #[validate(custom = "validate_min_zero")]
    pub critical_stock: Option<Decimal>,
    pub warehouse_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    /// Matches against name or barcode
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    params(TenantParams),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<product::Model>),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<product::Model>>), ApiError> {
    validate_input(&req)?;

    let created = state
        .services
        .products
        .create(NewProduct {
            user_id: tenant.user_id,
            name: req.name,
            description: req.description,
            barcode: req.barcode,
            unit: req.unit,
            purchase_price: req.purchase_price,
            sale_price: req.sale_price,
            vat_rate: req.vat_rate,
            stock_quantity: req.stock_quantity,
            critical_stock: req.critical_stock,
            warehouse_id: req.warehouse_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID"), TenantParams),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<product::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<product::Model>>, ApiError> {
    let found = state.services.products.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListParams),
    responses(
        (status = 200, description = "Products listed", body = ApiResponse<PaginatedResponse<product::Model>>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<product::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .products
        .list(params.user_id, page, per_page, params.search, params.is_active)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Products at or below their critical stock level
#[utoipa::path(
    get,
    path = "/api/v1/products/low-stock",
    params(TenantParams),
    responses(
        (status = 200, description = "Low stock products", body = ApiResponse<Vec<product::Model>>)
    ),
    tag = "Products"
)]
pub async fn list_low_stock_products(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<Vec<product::Model>>>, ApiError> {
    let items = state.services.products.list_low_stock(tenant.user_id).await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID"), TenantParams),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<product::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<product::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .products
        .update(
            tenant.user_id,
            id,
            ProductPatch {
                name: req.name,
                description: req.description,
                barcode: req.barcode,
                unit: req.unit,
                purchase_price: req.purchase_price,
                sale_price: req.sale_price,
                vat_rate: req.vat_rate,
                stock_quantity: req.stock_quantity,
                critical_stock: req.critical_stock,
                warehouse_id: req.warehouse_id,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID"), TenantParams),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.products.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_product).get(list_products))
        .route("/low-stock", get(list_low_stock_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}
