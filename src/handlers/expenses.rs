use super::common::{validate_input, validate_positive, PaginationParams, TenantParams};
use crate::entities::expense;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::expenses::{ExpensePatch, NewExpense};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "category": "kira",
    "description": "Dükkan kirası",
    "amount": "15000.00",
    "expense_date": "2026-08-01"
}))]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub description: Option<String>,
    #[validate(custom = "validate_positive")]
    pub amount: Decimal,
    pub expense_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateExpenseRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_positive")]
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExpenseListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    pub category: Option<String>,
    /// Earliest expense date to include
    pub from: Option<NaiveDate>,
    /// Latest expense date to include
    pub to: Option<NaiveDate>,
}

/// Record an expense
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    params(TenantParams),
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = ApiResponse<expense::Model>),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn create_expense(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<expense::Model>>), ApiError> {
    validate_input(&req)?;

    let created = state
        .services
        .expenses
        .create(NewExpense {
            user_id: tenant.user_id,
            category: req.category,
            description: req.description,
            amount: req.amount,
            expense_date: req.expense_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get an expense
#[utoipa::path(
    get,
    path = "/api/v1/expenses/{id}",
    params(("id" = Uuid, Path, description = "Expense ID"), TenantParams),
    responses(
        (status = 200, description = "Expense found", body = ApiResponse<expense::Model>),
        (status = 404, description = "Expense not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<expense::Model>>, ApiError> {
    let found = state.services.expenses.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List expenses
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    params(ExpenseListParams),
    responses(
        (status = 200, description = "Expenses listed", body = ApiResponse<PaginatedResponse<expense::Model>>)
    ),
    tag = "Expenses"
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<expense::Model>>>, ApiError> {
    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .expenses
        .list(
            params.user_id,
            page,
            per_page,
            params.category,
            params.from,
            params.to,
        )
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update an expense
#[utoipa::path(
    put,
    path = "/api/v1/expenses/{id}",
    params(("id" = Uuid, Path, description = "Expense ID"), TenantParams),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ApiResponse<expense::Model>),
        (status = 404, description = "Expense not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateExpenseRequest>,
) -> Result<Json<ApiResponse<expense::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .expenses
        .update(
            tenant.user_id,
            id,
            ExpensePatch {
                category: req.category,
                description: req.description,
                amount: req.amount,
                expense_date: req.expense_date,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete an expense
#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    params(("id" = Uuid, Path, description = "Expense ID"), TenantParams),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.expenses.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn expenses_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_expense).get(list_expenses))
        .route(
            "/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}
