//! Admin surface behavior through the full router: the x-admin-secret
//! capability gate and the operator endpoints behind it.

mod common;

use axum::body;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use common::TestApp;
use serde_json::{json, Value};

const SECRET_HEADER: &str = "x-admin-secret";

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[tokio::test]
async fn test_unconfigured_secret_turns_every_admin_request_into_500() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("owner@defter.app").await;

    let response = app.request(Method::GET, "/api/v1/admin/plans", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Sending a guess does not downgrade the failure to a 401
    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/admin/plans",
            None,
            &[(SECRET_HEADER, "any-guess")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Internal Server Error");

    // Business routes do not pass through the gate
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products?user_id={user_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_configured_secret_gates_the_admin_subtree() {
    let app = TestApp::with_config(|cfg| {
        cfg.admin_secret = Some("kapali-carsi".to_string());
    })
    .await;

    let response = app.request(Method::GET, "/api/v1/admin/plans", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/admin/plans",
            None,
            &[(SECRET_HEADER, "wrong-secret")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Unauthorized");

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/admin/plans",
            None,
            &[(SECRET_HEADER, "kapali-carsi")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_manages_plans_and_tenant_assignment() {
    let app = TestApp::with_config(|cfg| {
        cfg.admin_secret = Some("kapali-carsi".to_string());
    })
    .await;
    let auth = [(SECRET_HEADER, "kapali-carsi")];
    let user_id = app.seed_tenant("owner@defter.app").await;

    // Create a plan
    let response = app
        .request_with_headers(
            Method::POST,
            "/api/v1/admin/plans",
            Some(json!({
                "code": "pro",
                "name": "Pro",
                "monthly_price": "499.00",
                "max_products": 10000,
                "max_customers": 5000
            })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let plan_id = body["data"]["id"].as_str().expect("plan id").to_string();

    // Duplicate plan codes are refused
    let response = app
        .request_with_headers(
            Method::POST,
            "/api/v1/admin/plans",
            Some(json!({
                "code": "pro",
                "name": "Pro again",
                "monthly_price": "399.00",
                "max_products": 100,
                "max_customers": 100
            })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Put the tenant on the plan
    let response = app
        .request_with_headers(
            Method::PUT,
            &format!("/api/v1/admin/users/{user_id}/plan"),
            Some(json!({ "plan_id": plan_id })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["plan_id"], plan_id.as_str());

    // Suspend and reactivate the tenant
    let response = app
        .request_with_headers(
            Method::PUT,
            &format!("/api/v1/admin/users/{user_id}/activation"),
            Some(json!({ "is_active": false })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["is_active"], false);

    let response = app
        .request_with_headers(
            Method::PUT,
            &format!("/api/v1/admin/users/{user_id}/activation"),
            Some(json!({ "is_active": true })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Deactivated plans cannot be assigned
    let response = app
        .request_with_headers(
            Method::PUT,
            &format!("/api/v1/admin/plans/{plan_id}"),
            Some(json!({ "is_active": false })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let other_tenant = app.seed_tenant("ikinci@defter.app").await;
    let response = app
        .request_with_headers(
            Method::PUT,
            &format!("/api/v1/admin/users/{other_tenant}/plan"),
            Some(json!({ "plan_id": plan_id })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Clearing the assignment takes the tenant off the plan
    let response = app
        .request_with_headers(
            Method::PUT,
            &format!("/api/v1/admin/users/{user_id}/plan"),
            Some(json!({ "plan_id": null })),
            &auth,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["data"]["plan_id"].is_null());
}

#[tokio::test]
async fn test_admin_user_listing_filters_by_role() {
    let app = TestApp::with_config(|cfg| {
        cfg.admin_secret = Some("kapali-carsi".to_string());
    })
    .await;
    let auth = [(SECRET_HEADER, "kapali-carsi")];
    app.seed_tenant("birinci@defter.app").await;
    app.seed_tenant("ikinci@defter.app").await;

    let response = app
        .request_with_headers(Method::GET, "/api/v1/admin/users?role=user", None, &auth)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 2);

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/admin/users?role=super_admin",
            None,
            &auth,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_items"], 0);
}
