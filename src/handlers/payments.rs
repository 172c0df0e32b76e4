use super::common::{
    validate_input, validate_payment_amount, validate_payment_method, PaginationParams,
    TenantParams,
};
use crate::entities::payment::{self, PaymentMethod};
use crate::errors::{ApiError, ServiceError};
use crate::handlers::AppState;
use crate::services::payments::NewPayment;
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
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "customer_id": "550e8400-e29b-41d4-a716-446655440000",
    "amount": "250.00",
    "method": "nakit"
}))]
pub struct CreatePaymentRequest {
    /// Customer whose balance the payment reduces
    pub customer_id: Option<Uuid>,
    /// Sale this payment settles, if any
    pub sale_id: Option<Uuid>,
    #[validate(custom = "validate_payment_amount")]
    pub amount: Decimal,
    /// One of `nakit`, `kredi_karti`, `havale`
    #[validate(custom = "validate_payment_method")]
    pub method: String,
    pub paid_at: Option<NaiveDateTime>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentListParams {
    pub user_id: Uuid,
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub per_page: Option<u64>,
    pub customer_id: Option<Uuid>,
    /// One of `nakit`, `kredi_karti`, `havale`
    pub method: Option<String>,
}

/// Record a payment
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    params(TenantParams),
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<payment::Model>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Query(tenant): Query<TenantParams>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<payment::Model>>), ApiError> {
    validate_input(&req)?;

    let method = PaymentMethod::from_str(&req.method).map_err(|_| {
        ServiceError::ValidationError(format!("Unknown payment method '{}'", req.method))
    })?;

    let created = state
        .services
        .payments
        .create(NewPayment {
            user_id: tenant.user_id,
            customer_id: req.customer_id,
            sale_id: req.sale_id,
            amount: req.amount,
            method,
            paid_at: req.paid_at,
            note: req.note,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a payment
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment ID"), TenantParams),
    responses(
        (status = 200, description = "Payment found", body = ApiResponse<payment::Model>),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<Json<ApiResponse<payment::Model>>, ApiError> {
    let found = state.services.payments.get(tenant.user_id, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

/// List payments
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(PaymentListParams),
    responses(
        (status = 200, description = "Payments listed", body = ApiResponse<PaginatedResponse<payment::Model>>),
        (status = 422, description = "Unknown payment method filter", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<payment::Model>>>, ApiError> {
    let method = match params.method.as_deref() {
        Some(raw) => Some(PaymentMethod::from_str(raw).map_err(|_| {
            ServiceError::ValidationError(format!("Unknown payment method '{}'", raw))
        })?),
        None => None,
    };

    let (page, per_page) = PaginationParams::resolve(&state.config, params.page, params.per_page);
    let (items, total) = state
        .services
        .payments
        .list(params.user_id, page, per_page, params.customer_id, method)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Delete a payment, restoring the customer's balance
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment ID"), TenantParams),
    responses(
        (status = 204, description = "Payment deleted"),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(tenant): Query<TenantParams>,
) -> Result<StatusCode, ApiError> {
    state.services.payments.delete(tenant.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn payments_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_payment).get(list_payments))
        .route("/:id", get(get_payment).delete(delete_payment))
}
