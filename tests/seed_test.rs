//! Super admin seeding: idempotent across runs, exactly one super admin
//! account for the configured email, credentials required.

mod common;

use common::TestApp;
use defter_api::auth::verify_password;
use defter_api::entities::user::{self, Entity as User};
use defter_api::errors::ServiceError;
use defter_api::services::seed::{seed_super_admin, seed_super_admin_from_config};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

async fn count_super_admins(app: &TestApp) -> u64 {
    User::find()
        .filter(user::Column::Role.eq(user::ROLE_SUPER_ADMIN))
        .count(&*app.state.db)
        .await
        .expect("count super admins")
}

#[tokio::test]
async fn test_seeding_twice_keeps_exactly_one_super_admin() {
    let app = TestApp::new().await;

    let first = seed_super_admin(&app.state.db, "patron@defter.app", "ilk-parola")
        .await
        .expect("first seed");
    assert_eq!(first.role, user::ROLE_SUPER_ADMIN);
    assert!(first.is_active);
    assert_eq!(count_super_admins(&app).await, 1);

    let second = seed_super_admin(&app.state.db, "patron@defter.app", "yeni-parola")
        .await
        .expect("second seed");
    assert_eq!(second.id, first.id);
    assert_eq!(count_super_admins(&app).await, 1);

    // The password hash is refreshed on every run
    assert_ne!(second.password_hash, first.password_hash);
    assert!(verify_password("yeni-parola", &second.password_hash).expect("verify"));
    assert!(!verify_password("ilk-parola", &second.password_hash).expect("verify"));
}

#[tokio::test]
async fn test_changing_the_configured_email_replaces_the_super_admin() {
    let app = TestApp::new().await;

    let old = seed_super_admin(&app.state.db, "eski@defter.app", "parola-bir")
        .await
        .expect("seed old email");

    let new = seed_super_admin(&app.state.db, "yeni@defter.app", "parola-iki")
        .await
        .expect("seed new email");
    assert_ne!(new.id, old.id);
    assert_eq!(new.email, "yeni@defter.app");
    assert_eq!(count_super_admins(&app).await, 1);

    let stale = User::find_by_id(old.id)
        .one(&*app.state.db)
        .await
        .expect("look up old account");
    assert!(stale.is_none());
}

#[tokio::test]
async fn test_seeding_promotes_an_existing_account() {
    let app = TestApp::new().await;
    let user_id = app.seed_tenant("sahip@defter.app").await;

    let promoted = seed_super_admin(&app.state.db, "sahip@defter.app", "terfi-parolasi")
        .await
        .expect("seed over existing account");
    assert_eq!(promoted.id, user_id);
    assert_eq!(promoted.role, user::ROLE_SUPER_ADMIN);
}

#[tokio::test]
async fn test_seed_from_config_requires_credentials() {
    let app = TestApp::with_config(|cfg| {
        cfg.super_admin_email = Some("patron@defter.app".to_string());
        // password deliberately left unset
    })
    .await;

    let err = seed_super_admin_from_config(&app.state.db, &app.state.config)
        .await
        .expect_err("seeding without a password must fail");
    assert!(matches!(err, ServiceError::Configuration(_)));
}

#[tokio::test]
async fn test_seed_from_config_creates_the_account() {
    let app = TestApp::with_config(|cfg| {
        cfg.super_admin_email = Some("patron@defter.app".to_string());
        cfg.super_admin_password = Some("cok-gizli-parola".to_string());
    })
    .await;

    let seeded = seed_super_admin_from_config(&app.state.db, &app.state.config)
        .await
        .expect("seed from config");
    assert_eq!(seeded.email, "patron@defter.app");
    assert_eq!(seeded.role, user::ROLE_SUPER_ADMIN);
}
