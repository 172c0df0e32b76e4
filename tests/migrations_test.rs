//! Integration tests for the migration batch.
//!
//! Covers the full up/down cycle and the two deliberately one-way data
//! migrations (manager-role removal and the invoice-issued backfill).

use defter_api::db::{self, DbConfig};
use migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, DatabaseConnection, Statement};
use tempfile::TempDir;
use uuid::Uuid;

async fn fresh_db(tmp: &TempDir) -> DatabaseConnection {
    let db_file = tmp.path().join("migrate_test.db");
    let cfg = DbConfig {
        url: format!("sqlite://{}?mode=rwc", db_file.display()),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    db::establish_connection_with_config(&cfg)
        .await
        .expect("test database")
}

async fn table_exists(db: &DatabaseConnection, name: &str) -> bool {
    let stmt = Statement::from_string(
        DbBackend::Sqlite,
        format!(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = '{}'",
            name
        ),
    );
    db.query_one(stmt)
        .await
        .expect("query sqlite_master")
        .is_some()
}

async fn execute(db: &DatabaseConnection, sql: String) {
    db.execute(Statement::from_string(DbBackend::Sqlite, sql))
        .await
        .expect("execute raw sql");
}

#[tokio::test]
async fn test_all_migrations_apply_and_roll_back() {
    let tmp = TempDir::new().expect("temp dir");
    let db = fresh_db(&tmp).await;

    Migrator::up(&db, None).await.expect("apply all migrations");

    for table in [
        "users",
        "plans",
        "user_sessions",
        "password_reset_tokens",
        "customers",
        "products",
        "warehouses",
        "sales",
        "sale_items",
        "payments",
        "expenses",
        "accounts",
        "sales_returns",
        "quotes",
    ] {
        assert!(table_exists(&db, table).await, "missing table {}", table);
    }

    Migrator::down(&db, None)
        .await
        .expect("roll back all migrations");

    for table in ["users", "products", "sales", "quotes"] {
        assert!(
            !table_exists(&db, table).await,
            "table {} survived full rollback",
            table
        );
    }
}

#[tokio::test]
async fn test_reapplying_migrations_is_idempotent() {
    let tmp = TempDir::new().expect("temp dir");
    let db = fresh_db(&tmp).await;

    Migrator::up(&db, None).await.expect("first apply");
    // A second run sees nothing pending and must not fail.
    Migrator::up(&db, None).await.expect("second apply");

    assert!(table_exists(&db, "sales").await);
}

#[tokio::test]
async fn test_manager_role_is_folded_into_admin() {
    let tmp = TempDir::new().expect("temp dir");
    let db = fresh_db(&tmp).await;

    // Stop right before the data migrations so a legacy manager row can exist.
    Migrator::up(&db, Some(17)).await.expect("apply first 17");

    let user_id = Uuid::new_v4();
    execute(
        &db,
        format!(
            "INSERT INTO users (id, email, password_hash, full_name, role, is_active, created_at) \
             VALUES ('{}', 'manager@example.com', 'x', 'Legacy Manager', 'manager', 1, '2024-01-01 00:00:00')",
            user_id
        ),
    )
    .await;

    Migrator::up(&db, None).await.expect("apply the rest");

    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT role FROM users WHERE email = 'manager@example.com'".to_string(),
        ))
        .await
        .expect("query user")
        .expect("user row");
    let role: String = row.try_get("", "role").expect("role column");
    assert_eq!(role, "admin");

    // Rolling the batch back and forward again must not resurrect the role.
    Migrator::down(&db, Some(3)).await.expect("partial rollback");
    Migrator::up(&db, None).await.expect("reapply");
    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT role FROM users WHERE email = 'manager@example.com'".to_string(),
        ))
        .await
        .expect("query user")
        .expect("user row");
    let role: String = row.try_get("", "role").expect("role column");
    assert_eq!(role, "admin", "role rewrite is one-way");
}

#[tokio::test]
async fn test_invoice_issued_backfill_marks_numbered_sales() {
    let tmp = TempDir::new().expect("temp dir");
    let db = fresh_db(&tmp).await;

    Migrator::up(&db, Some(17)).await.expect("apply first 17");

    let user_id = Uuid::new_v4();
    execute(
        &db,
        format!(
            "INSERT INTO users (id, email, password_hash, full_name, role, is_active, created_at) \
             VALUES ('{}', 'owner@example.com', 'x', 'Owner', 'admin', 1, '2024-01-01 00:00:00')",
            user_id
        ),
    )
    .await;

    let numbered = Uuid::new_v4();
    let unnumbered = Uuid::new_v4();
    for (id, number_sql) in [(numbered, "'INV-OLD1'"), (unnumbered, "NULL")] {
        execute(
            &db,
            format!(
                "INSERT INTO sales (id, user_id, sale_number, sale_date, subtotal, vat_total, \
                 discount, grand_total, status, created_at, invoice_number, invoice_issued) \
                 VALUES ('{}', '{}', 'S-1', '2024-01-02 00:00:00', 0, 0, 0, 0, 'completed', \
                 '2024-01-02 00:00:00', {}, 0)",
                id, user_id, number_sql
            ),
        )
        .await;
    }

    Migrator::up(&db, None).await.expect("apply the rest");

    for (id, expected) in [(numbered, true), (unnumbered, false)] {
        let row = db
            .query_one(Statement::from_string(
                DbBackend::Sqlite,
                format!("SELECT invoice_issued FROM sales WHERE id = '{}'", id),
            ))
            .await
            .expect("query sale")
            .expect("sale row");
        let issued: bool = row.try_get("", "invoice_issued").expect("invoice_issued");
        assert_eq!(issued, expected);
    }
}
