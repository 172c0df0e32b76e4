use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    routing::get,
    Router,
};
use chrono::Utc;
use defter_api::{
    config::AppConfig,
    db,
    entities::{account, customer, product, user},
    handlers::AppServices,
    services::{accounts::NewAccount, customers::NewCustomer, products::NewProduct},
    AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by a throwaway
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _tmp: TempDir,
}

impl TestApp {
    /// Construct a test application with fresh database state and default
    /// configuration (no admin secret).
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Construct a test application after tweaking the configuration, e.g.
    /// to set an admin secret.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let tmp = TempDir::new().expect("temp dir for test database");
        let db_file = tmp.path().join("defter_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_file.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            services,
        };

        let router = Router::new()
            .route("/health", get(defter_api::health_check))
            .nest("/api/v1", defter_api::api_v1_routes(&cfg))
            .with_state(state.clone());

        Self {
            router,
            state,
            _tmp: tmp,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    /// Send a JSON request with extra headers (e.g. x-admin-secret).
    #[allow(dead_code)]
    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Insert a tenant user row directly and return its id. Every business
    /// record in the tests hangs off one of these.
    #[allow(dead_code)]
    pub async fn seed_tenant(&self, email: &str) -> Uuid {
        let now = Utc::now().naive_utc();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set("test-hash".to_string()),
            full_name: Set("Test Tenant".to_string()),
            role: Set("user".to_string()),
            phone: Set(None),
            is_active: Set(true),
            plan_id: Set(None),
            plan_expires_at: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };
        let created = model
            .insert(&*self.state.db)
            .await
            .expect("seed tenant user");
        created.id
    }

    #[allow(dead_code)]
    pub async fn seed_product(
        &self,
        user_id: Uuid,
        name: &str,
        sale_price: Decimal,
        stock: Decimal,
    ) -> product::Model {
        self.state
            .services
            .products
            .create(NewProduct {
                user_id,
                name: name.to_string(),
                description: None,
                barcode: None,
                unit: "adet".to_string(),
                purchase_price: dec!(0),
                sale_price,
                vat_rate: dec!(20),
                stock_quantity: stock,
                critical_stock: None,
                warehouse_id: None,
            })
            .await
            .expect("seed product for tests")
    }

    #[allow(dead_code)]
    pub async fn seed_customer(&self, user_id: Uuid, name: &str) -> customer::Model {
        self.state
            .services
            .customers
            .create(NewCustomer {
                user_id,
                name: name.to_string(),
                email: None,
                phone: None,
                address: None,
                tax_number: None,
            })
            .await
            .expect("seed customer for tests")
    }

    #[allow(dead_code)]
    pub async fn seed_account(
        &self,
        user_id: Uuid,
        name: &str,
        opening_balance: Decimal,
    ) -> account::Model {
        self.state
            .services
            .accounts
            .create(NewAccount {
                user_id,
                name: name.to_string(),
                kind: account::AccountKind::Kasa,
                currency: "TRY".to_string(),
                opening_balance,
                iban: None,
            })
            .await
            .expect("seed account for tests")
    }
}
