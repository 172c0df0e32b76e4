//! Request validation behavior: every violated field is reported in one
//! 422 response, defaults fill omitted fields, and the Turkish wire
//! vocabulary for payment methods and account kinds is enforced.

mod common;

use axum::body;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

fn decimal_field(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string"))
        .expect("parse decimal field")
}

// ==================== Multi-field reporting ====================

#[tokio::test]
async fn test_product_create_reports_every_invalid_field_at_once() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/products?user_id={user_id}"),
            Some(json!({
                "name": "",
                "purchase_price": "-5",
                "vat_rate": "150"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Unprocessable Entity");
    assert_eq!(
        body["message"],
        "Validation failed: 3 invalid field(s): name, purchase_price, vat_rate"
    );

    let details = body["details"].as_object().expect("violation details");
    assert!(details.contains_key("name"));
    assert_eq!(details["purchase_price"][0], "must not be negative");
    assert_eq!(details["vat_rate"][0], "must be between 0 and 100");
    // sale_price was omitted and defaults to zero, which is allowed
    assert!(!details.contains_key("sale_price"));
}

#[tokio::test]
async fn test_sale_item_violations_name_the_offending_row() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let product = app
        .seed_product(user_id, "Filtre Kahve", dec!(120), dec!(10))
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({
                "items": [
                    { "product_id": product.id, "quantity": "1" },
                    { "product_id": product.id, "quantity": "0", "discount": "-2" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    let details = body["details"].as_object().expect("violation details");
    assert_eq!(details["items[1].quantity"][0], "must be greater than zero");
    assert_eq!(details["items[1].discount"][0], "must not be negative");
    // the first row was fine and must not be reported
    assert!(!details.keys().any(|key| key.starts_with("items[0]")));
}

#[tokio::test]
async fn test_sale_requires_at_least_one_item() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({ "items": [] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    let details = body["details"].as_object().expect("violation details");
    assert!(details.contains_key("items"));
}

// ==================== Defaults ====================

#[tokio::test]
async fn test_product_defaults_fill_unit_and_vat_rate() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/products?user_id={user_id}"),
            Some(json!({ "name": "Çay Bardağı" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);

    let product = &body["data"];
    assert_eq!(product["unit"], "adet");
    assert_eq!(decimal_field(&product["vat_rate"]), dec!(20));
    assert_eq!(decimal_field(&product["stock_quantity"]), Decimal::ZERO);
    assert_eq!(product["is_active"], true);
}

#[tokio::test]
async fn test_account_defaults_fill_kind_and_currency() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/accounts?user_id={user_id}"),
            Some(json!({ "name": "Ana Kasa" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    let account = &body["data"];
    assert_eq!(account["kind"], "kasa");
    assert_eq!(account["currency"], "TRY");
    assert_eq!(decimal_field(&account["balance"]), Decimal::ZERO);
}

// ==================== Wire vocabulary ====================

#[tokio::test]
async fn test_payment_method_must_use_the_turkish_vocabulary() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let customer = app.seed_customer(user_id, "Ayşe Yılmaz").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/payments?user_id={user_id}"),
            Some(json!({
                "customer_id": customer.id,
                "amount": "100",
                "method": "cheque"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(
        body["details"]["method"][0],
        "must be one of nakit, kredi_karti, havale"
    );

    for method in ["nakit", "kredi_karti", "havale"] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/v1/payments?user_id={user_id}"),
                Some(json!({
                    "customer_id": customer.id,
                    "amount": "50",
                    "method": method
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED, "{method}");

        let body = response_json(response).await;
        assert_eq!(body["data"]["method"], method);
    }
}

#[tokio::test]
async fn test_payment_amount_floor_is_one_kurus() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let customer = app.seed_customer(user_id, "Mehmet Demir").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/payments?user_id={user_id}"),
            Some(json!({
                "customer_id": customer.id,
                "amount": "0",
                "method": "nakit"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["details"]["amount"][0], "must be at least 0.01");

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/payments?user_id={user_id}"),
            Some(json!({
                "customer_id": customer.id,
                "amount": "0.01",
                "method": "nakit"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_account_kind_must_use_the_turkish_vocabulary() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/accounts?user_id={user_id}"),
            Some(json!({ "name": "Nakit Kasa", "kind": "cash" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["details"]["kind"][0], "must be one of kasa, banka");
}

#[tokio::test]
async fn test_account_currency_must_be_three_letters() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/accounts?user_id={user_id}"),
            Some(json!({ "name": "Döviz Hesabı", "currency": "TL" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    let details = body["details"].as_object().expect("violation details");
    assert!(details.contains_key("currency"));
}

// ==================== Transfers ====================

#[tokio::test]
async fn test_transfer_rejects_zero_amount_and_same_account() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let kasa = app.seed_account(user_id, "Ana Kasa", dec!(1000)).await;
    let banka = app.seed_account(user_id, "İş Bankası", dec!(0)).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/accounts/transfer?user_id={user_id}"),
            Some(json!({
                "from_account_id": kasa.id,
                "to_account_id": banka.id,
                "amount": "0"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["details"]["amount"][0], "must be at least 0.01");

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/accounts/transfer?user_id={user_id}"),
            Some(json!({
                "from_account_id": kasa.id,
                "to_account_id": kasa.id,
                "amount": "10"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .expect("error message")
        .contains("two different accounts"));
}

#[tokio::test]
async fn test_transfer_accepts_one_kurus() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let kasa = app.seed_account(user_id, "Ana Kasa", dec!(100)).await;
    let banka = app.seed_account(user_id, "İş Bankası", dec!(0)).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/accounts/transfer?user_id={user_id}"),
            Some(json!({
                "from_account_id": kasa.id,
                "to_account_id": banka.id,
                "amount": "0.01"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(decimal_field(&body["data"]["from"]["balance"]), dec!(99.99));
    assert_eq!(decimal_field(&body["data"]["to"]["balance"]), dec!(0.01));
    assert_eq!(decimal_field(&body["data"]["amount"]), dec!(0.01));
}
