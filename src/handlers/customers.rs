use super::common::{validate_input, PaginationParams, TenantParams};
use crate::entities::customer;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::customers::{CustomerPatch, NewCustomer};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Ayşe Yılmaz",
    "email": "ayse@example.com",
    "phone": "+90 532 000 00 00",
    "tax_number": "1234567890"
}))]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub tax_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub tax_number: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CustomerListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    /// Matches against name, email, or phone
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    params(TenantParams),
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<customer::Model>),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<customer::Model>>), ApiError> {
    validate_input(&req)?;

    let created = state
        .services
        .customers
        .create(NewCustomer {
            user_id: tenant.user_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            tax_number: req.tax_number,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a customer
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID"), TenantParams),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse<customer::Model>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<customer::Model>>, ApiError> {
    let found = state.services.customers.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(CustomerListParams),
    responses(
        (status = 200, description = "Customers listed", body = ApiResponse<PaginatedResponse<customer::Model>>)
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<CustomerListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<customer::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .customers
        .list(params.user_id, page, per_page, params.search, params.is_active)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID"), TenantParams),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<customer::Model>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<customer::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .customers
        .update(
            tenant.user_id,
            id,
            CustomerPatch {
                name: req.name,
                email: req.email,
                phone: req.phone,
                address: req.address,
                tax_number: req.tax_number,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID"), TenantParams),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.customers.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn customers_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_customer).get(list_customers))
        .route(
            "/:id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
}
