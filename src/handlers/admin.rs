//! Operator-facing administration surface, guarded by the admin secret.

use super::common::{validate_input, validate_min_zero, PaginationParams};
use crate::entities::{plan, user};
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::plans::{NewPlan, PlanPatch};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
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
    "code": "pro",
    "name": "Pro",
    "monthly_price": "499.00",
    "max_products": 10000,
    "max_customers": 5000
}))]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom = "validate_min_zero")]
    pub monthly_price: Decimal,
    #[validate(range(min = 0))]
    pub max_products: i32,
    #[validate(range(min = 0))]
    pub max_customers: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom = "validate_min_zero")]
    pub monthly_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub max_products: Option<i32>,
    #[validate(range(min = 0))]
    pub max_customers: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetActivationRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssignPlanRequest {
    /// Plan to assign; null clears the assignment
    pub plan_id: Option<Uuid>,
    pub plan_expires_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminUserListParams {
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    /// Filter by role, e.g. `admin` or `super_admin`
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PlanListParams {
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// List tenant accounts
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(AdminUserListParams),
    responses(
        (status = 200, description = "Users listed", body = ApiResponse<PaginatedResponse<user::Model>>),
        (status = 401, description = "Invalid admin secret", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<AdminUserListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<user::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .users
        .list(page, per_page, params.role, params.is_active)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Get a tenant account
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<user::Model>),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    let found = state.services.users.get(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// Activate or suspend a tenant
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/activation",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = SetActivationRequest,
    responses(
        (status = 200, description = "Activation changed", body = ApiResponse<user::Model>),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn set_user_activation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetActivationRequest>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    let updated = state.services.users.set_active(id, req.is_active).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Assign a plan to a tenant
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/plan",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AssignPlanRequest,
    responses(
        (status = 200, description = "Plan assigned", body = ApiResponse<user::Model>),
        (status = 400, description = "Plan is inactive", body = crate::errors::ErrorResponse),
        (status = 404, description = "User or plan not found", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn assign_user_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignPlanRequest>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    let updated = state
        .services
        .users
        .assign_plan(id, req.plan_id, req.plan_expires_at)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Create a plan
#[utoipa::path(
    post,
    path = "/api/v1/admin/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = ApiResponse<plan::Model>),
        (status = 409, description = "Plan code already exists", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<plan::Model>>), ApiError> {
    validate_input(&req)?;

    let created = state
        .services
        .plans
        .create(NewPlan {
            code: req.code,
            name: req.name,
            monthly_price: req.monthly_price,
            max_products: req.max_products,
            max_customers: req.max_customers,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a plan
#[utoipa::path(
    get,
    path = "/api/v1/admin/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan found", body = ApiResponse<plan::Model>),
        (status = 404, description = "Plan not found", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<plan::Model>>, ApiError> {
    let found = state.services.plans.get(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List plans
#[utoipa::path(
    get,
    path = "/api/v1/admin/plans",
    params(PlanListParams),
    responses(
        (status = 200, description = "Plans listed", body = ApiResponse<PaginatedResponse<plan::Model>>)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn list_plans(
    State(state): State<AppState>,
    Query(params): Query<PlanListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<plan::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .plans
        .list(page, per_page, params.include_inactive)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update a plan
#[utoipa::path(
    put,
    path = "/api/v1/admin/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = ApiResponse<plan::Model>),
        (status = 404, description = "Plan not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<ApiResponse<plan::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .plans
        .update(
            id,
            PlanPatch {
                name: req.name,
                monthly_price: req.monthly_price,
                max_products: req.max_products,
                max_customers: req.max_customers,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete a plan
#[utoipa::path(
    delete,
    path = "/api/v1/admin/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 204, description = "Plan deleted"),
        (status = 404, description = "Plan not found", body = crate::errors::ErrorResponse)
    ),
    security(("AdminSecret" = [])),
    tag = "Admin"
)]
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.plans.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/activation", put(set_user_activation))
        .route("/users/:id/plan", put(assign_user_plan))
        .route("/plans", axum::routing::post(create_plan).get(list_plans))
        .route(
            "/plans/:id",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}
