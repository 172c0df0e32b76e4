use super::common::{
    default_account_kind, default_currency, validate_account_kind, validate_input,
    validate_min_zero, validate_payment_amount, PaginationParams, TenantParams,
};
use crate::entities::account::{self, AccountKind};
use crate::errors::{ApiError, ServiceError};
use crate::handlers::AppState;
use crate::services::accounts::{AccountPatch, NewAccount, TransferOutcome};
use crate::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Ana Kasa",
    "kind": "kasa",
    "currency": "TRY",
    "opening_balance": "0"
}))]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// One of `kasa`, `banka`; defaults to `kasa`
    #[serde(default = "default_account_kind")]
    #[validate(custom = "validate_account_kind")]
    pub kind: String,
    /// ISO 4217 code; defaults to `TRY`
    #[serde(default = "default_currency")]
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
    #[serde(default)]
    #[validate(custom = "validate_min_zero")]
    pub opening_balance: Decimal,
    #[validate(length(max = 50))]
    pub iban: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub iban: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "from_account_id": "550e8400-e29b-41d4-a716-446655440000",
    "to_account_id": "660e8400-e29b-41d4-a716-446655440001",
    "amount": "1000.00"
}))]
pub struct TransferRequest {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    #[validate(custom = "validate_payment_amount")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AccountListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    /// One of `kasa`, `banka`
    pub kind: Option<String>,
}

/// Create an account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    params(TenantParams),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<account::Model>),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<account::Model>>), ApiError> {
    validate_input(&req)?;

    let kind = AccountKind::from_str(&req.kind).map_err(|_| {
        ServiceError::ValidationError(format!("Unknown account kind '{}'", req.kind))
    })?;

    let created = state
        .services
        .accounts
        .create(NewAccount {
            user_id: tenant.user_id,
            name: req.name,
            kind,
            currency: req.currency,
            opening_balance: req.opening_balance,
            iban: req.iban,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get an account
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account ID"), TenantParams),
    responses(
        (status = 200, description = "Account found", body = ApiResponse<account::Model>),
        (status = 404, description = "Account not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<account::Model>>, ApiError> {
    let found = state.services.accounts.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    params(AccountListParams),
    responses(
        (status = 200, description = "Accounts listed", body = ApiResponse<PaginatedResponse<account::Model>>),
        (status = 422, description = "Unknown account kind filter", body = crate::errors::ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<AccountListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<account::Model>>>, ApiError> {
    let kind = match params.kind.as_deref() {
        Some(raw) => Some(AccountKind::from_str(raw).map_err(|_| {
            ServiceError::ValidationError(format!("Unknown account kind '{}'", raw))
        })?),
        None => None,
    };

    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .accounts
        .list(params.user_id, page, per_page, kind)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Update an account
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account ID"), TenantParams),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<account::Model>),
        (status = 404, description = "Account not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<account::Model>>, ApiError> {
    validate_input(&req)?;

    let updated = state
        .services
        .accounts
        .update(
            tenant.user_id,
            id,
            AccountPatch {
                name: req.name,
                iban: req.iban,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Transfer money between two accounts
#[utoipa::path(
    post,
    path = "/api/v1/accounts/transfer",
    params(TenantParams),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = ApiResponse<TransferOutcome>),
        (status = 404, description = "Account not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn transfer(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<ApiResponse<TransferOutcome>>, ApiError> {
    validate_input(&req)?;

    if req.from_account_id == req.to_account_id {
        return Err(ServiceError::ValidationError(
            "Transfer requires two different accounts".to_string(),
        )
        .into());
    }

    let outcome = state
        .services
        .accounts
        .transfer(
            tenant.user_id,
            req.from_account_id,
            req.to_account_id,
            req.amount,
        )
        .await?;

    Ok(Json(ApiResponse::success(outcome)))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account ID"), TenantParams),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Accounts"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.accounts.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn accounts_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_account).get(list_accounts))
        .route("/transfer", post(transfer))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
}
