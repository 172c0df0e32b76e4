//! End-to-end business flows through the HTTP surface: sale pricing and
//! stock movement, invoicing, payments against customer balances, returns
//! with restocking, quotes, expenses, and tenant isolation.

mod common;

use axum::body;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;
use uuid::Uuid;

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

async fn product_stock(app: &TestApp, user_id: Uuid, product_id: Uuid) -> Decimal {
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products/{product_id}?user_id={user_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    decimal_field(&body["data"]["stock_quantity"])
}

#[tokio::test]
async fn test_health_and_status_endpoints_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "healthy");

    let response = app.request(Method::GET, "/api/v1/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
}

// ==================== Sales ====================

#[tokio::test]
async fn test_sale_prices_lines_totals_the_document_and_moves_stock() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let bardak = app
        .seed_product(user_id, "Çay Bardağı", dec!(19.90), dec!(10))
        .await;
    let kahve = app
        .seed_product(user_id, "Filtre Kahve", dec!(25.00), dec!(8))
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({
                "items": [
                    { "product_id": bardak.id, "quantity": "3" },
                    {
                        "product_id": kahve.id,
                        "quantity": "2",
                        "unit_price": "10",
                        "vat_rate": "10",
                        "discount": "5"
                    }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    let sale = &body["data"];

    // 3 x 19.90 = 59.70 gross plus 2 x 10 = 20 gross
    assert_eq!(decimal_field(&sale["subtotal"]), dec!(79.70));
    assert_eq!(decimal_field(&sale["discount"]), dec!(5));
    // VAT: 59.70 at 20% = 11.94, (20 - 5) at 10% = 1.50
    assert_eq!(decimal_field(&sale["vat_total"]), dec!(13.44));
    assert_eq!(decimal_field(&sale["grand_total"]), dec!(88.14));

    assert_eq!(sale["status"], "completed");
    assert!(sale["sale_number"]
        .as_str()
        .expect("sale number")
        .starts_with("SL-"));
    assert_eq!(sale["invoice_issued"], false);

    let items = sale["items"].as_array().expect("sale items");
    assert_eq!(items.len(), 2);
    let bardak_line = items
        .iter()
        .find(|item| item["product_name"] == "Çay Bardağı")
        .expect("tea glass line");
    assert_eq!(decimal_field(&bardak_line["line_total"]), dec!(71.64));
    let kahve_line = items
        .iter()
        .find(|item| item["product_name"] == "Filtre Kahve")
        .expect("coffee line");
    assert_eq!(decimal_field(&kahve_line["line_total"]), dec!(16.50));
    // the overridden unit price is kept on the line
    assert_eq!(decimal_field(&kahve_line["unit_price"]), dec!(10));

    assert_eq!(product_stock(&app, user_id, bardak.id).await, dec!(7));
    assert_eq!(product_stock(&app, user_id, kahve.id).await, dec!(6));
}

#[tokio::test]
async fn test_sale_exceeding_stock_is_rejected_without_side_effects() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let product = app
        .seed_product(user_id, "Porselen Fincan", dec!(45), dec!(5))
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({
                "items": [{ "product_id": product.id, "quantity": "6" }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    let message = body["message"].as_str().expect("error message");
    assert!(message.contains("has 5 in stock, requested 6"), "{message}");

    // nothing was written
    assert_eq!(product_stock(&app, user_id, product.id).await, dec!(5));
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/sales?user_id={user_id}"),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 0);
}

#[tokio::test]
async fn test_sale_with_unknown_product_is_not_found() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({
                "items": [{ "product_id": Uuid::new_v4(), "quantity": "1" }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invoice_can_be_issued_exactly_once() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let product = app
        .seed_product(user_id, "Demlik", dec!(150), dec!(4))
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({
                "items": [{ "product_id": product.id, "quantity": "1" }]
            })),
        )
        .await;
    let body = response_json(response).await;
    let sale_id = body["data"]["id"].as_str().expect("sale id").to_string();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales/{sale_id}/invoice?user_id={user_id}"),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["invoice_issued"], true);
    assert!(body["data"]["invoice_number"]
        .as_str()
        .expect("invoice number")
        .starts_with("INV-"));

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales/{sale_id}/invoice?user_id={user_id}"),
            Some(json!({ "invoice_number": "INV-2026-0001" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn test_deleting_a_sale_does_not_restore_stock() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let product = app
        .seed_product(user_id, "Cezve", dec!(200), dec!(10))
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({
                "items": [{ "product_id": product.id, "quantity": "4" }]
            })),
        )
        .await;
    let body = response_json(response).await;
    let sale_id = body["data"]["id"].as_str().expect("sale id").to_string();
    assert_eq!(product_stock(&app, user_id, product.id).await, dec!(6));

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/sales/{sale_id}?user_id={user_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // goods only come back through a return
    assert_eq!(product_stock(&app, user_id, product.id).await, dec!(6));
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/sales/{sale_id}?user_id={user_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== Payments ====================

#[tokio::test]
async fn test_payment_lifecycle_adjusts_the_customer_balance() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let customer = app.seed_customer(user_id, "Ayşe Yılmaz").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/payments?user_id={user_id}"),
            Some(json!({
                "customer_id": customer.id,
                "amount": "250.00",
                "method": "havale",
                "note": "Ağustos tahsilatı"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let payment_id = body["data"]["id"].as_str().expect("payment id").to_string();

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/customers/{}?user_id={user_id}", customer.id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(decimal_field(&body["data"]["balance"]), dec!(-250));

    // deleting the payment puts the amount back
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/payments/{payment_id}?user_id={user_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/customers/{}?user_id={user_id}", customer.id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(decimal_field(&body["data"]["balance"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_payment_list_filters_by_method() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let customer = app.seed_customer(user_id, "Mehmet Demir").await;

    for (amount, method) in [("100", "nakit"), ("200", "havale"), ("300", "nakit")] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/v1/payments?user_id={user_id}"),
                Some(json!({
                    "customer_id": customer.id,
                    "amount": amount,
                    "method": method
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/payments?user_id={user_id}&method=nakit"),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 2);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/payments?user_id={user_id}&method=posta_ceki"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ==================== Returns ====================

#[tokio::test]
async fn test_return_restock_flag_controls_stock_movement() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let product = app
        .seed_product(user_id, "Çay Bardağı", dec!(19.90), dec!(10))
        .await;

    // sell four, leaving six
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={user_id}"),
            Some(json!({
                "items": [{ "product_id": product.id, "quantity": "4" }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let sale_id = body["data"]["id"].as_str().expect("sale id").to_string();

    // two come back and go on the shelf
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/returns?user_id={user_id}"),
            Some(json!({
                "sale_id": sale_id,
                "reason": "Kırık geldi",
                "items": [{
                    "product_id": product.id,
                    "quantity": "2",
                    "unit_price": "19.90"
                }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["restock"], true);
    assert_eq!(decimal_field(&body["data"]["total"]), dec!(39.80));
    assert_eq!(product_stock(&app, user_id, product.id).await, dec!(8));

    // one more comes back damaged beyond resale; no restock
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/returns?user_id={user_id}"),
            Some(json!({
                "restock": false,
                "items": [{
                    "product_id": product.id,
                    "quantity": "1",
                    "unit_price": "19.90"
                }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(product_stock(&app, user_id, product.id).await, dec!(8));
}

// ==================== Quotes ====================

#[tokio::test]
async fn test_quote_totals_without_touching_stock() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;
    let product = app
        .seed_product(user_id, "Semaver", dec!(1250), dec!(3))
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/quotes?user_id={user_id}"),
            Some(json!({
                "items": [
                    {
                        "product_id": product.id,
                        "product_name": "Semaver",
                        "quantity": "2",
                        "unit_price": "1250"
                    },
                    {
                        "product_name": "Kurulum",
                        "quantity": "1",
                        "unit_price": "500"
                    }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "draft");
    assert!(body["data"]["quote_number"]
        .as_str()
        .expect("quote number")
        .starts_with("QT-"));
    assert_eq!(decimal_field(&body["data"]["total"]), dec!(3000));

    // quotes are offers, not transactions
    assert_eq!(product_stock(&app, user_id, product.id).await, dec!(3));

    let quote_id = body["data"]["id"].as_str().expect("quote id").to_string();
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/quotes/{quote_id}?user_id={user_id}"),
            Some(json!({ "status": "accepted" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "accepted");
}

// ==================== Expenses ====================

#[tokio::test]
async fn test_expenses_filter_by_category_and_date_range() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    for (category, amount, date) in [
        ("kira", "15000.00", "2026-08-01"),
        ("elektrik", "2300.50", "2026-07-15"),
    ] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/v1/expenses?user_id={user_id}"),
                Some(json!({
                    "category": category,
                    "amount": amount,
                    "expense_date": date
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/expenses?user_id={user_id}"),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 2);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/expenses?user_id={user_id}&category=kira"),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 1);
    assert_eq!(body["data"]["items"][0]["category"], "kira");

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/expenses?user_id={user_id}&from=2026-08-01"),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 1);
}

// ==================== Warehouses ====================

#[tokio::test]
async fn test_only_one_warehouse_stays_default() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    for (name, is_default) in [("Merkez Depo", true), ("Şube Depo", true)] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/v1/warehouses?user_id={user_id}"),
                Some(json!({ "name": name, "is_default": is_default })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/warehouses?user_id={user_id}"),
            None,
        )
        .await;
    let body = response_json(response).await;
    let items = body["data"]["items"].as_array().expect("warehouses");
    let defaults: Vec<&Value> = items
        .iter()
        .filter(|w| w["is_default"] == true)
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["name"], "Şube Depo");
}

// ==================== Tenant isolation ====================

#[tokio::test]
async fn test_tenants_never_see_each_others_rows() {
    let app = TestApp::new().await;
    let owner = app.seed_tenant("birinci@defter.app").await;
    let intruder = app.seed_tenant("ikinci@defter.app").await;

    let product = app
        .seed_product(owner, "Çay Bardağı", dec!(19.90), dec!(10))
        .await;
    let account = app.seed_account(owner, "Ana Kasa", dec!(1000)).await;

    // direct reads under the other tenant come back empty-handed
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products/{}?user_id={intruder}", product.id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products?user_id={intruder}"),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 0);

    // writes are scoped the same way
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/products/{}?user_id={intruder}", product.id),
            Some(json!({ "sale_price": "1.00" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}?user_id={intruder}", product.id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // selling another tenant's product fails before touching stock
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/sales?user_id={intruder}"),
            Some(json!({
                "items": [{ "product_id": product.id, "quantity": "1" }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(product_stock(&app, owner, product.id).await, dec!(10));

    // and so does moving money out of another tenant's account
    let own_account = app.seed_account(intruder, "Kendi Kasası", dec!(0)).await;
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/accounts/transfer?user_id={intruder}"),
            Some(json!({
                "from_account_id": account.id,
                "to_account_id": own_account.id,
                "amount": "500"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/accounts/{}?user_id={owner}", account.id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(decimal_field(&body["data"]["balance"]), dec!(1000));
}
