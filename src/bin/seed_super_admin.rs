//! Bootstraps the super admin account from configuration.
//!
//! Run with: cargo run --bin seed-super-admin
//!
//! Reads APP__SUPER_ADMIN_EMAIL and APP__SUPER_ADMIN_PASSWORD (or their
//! config-file equivalents), then upserts a single super admin row.
//! Idempotent: rerunning with the same credentials leaves one account.

use anyhow::{Context, Result};
use tracing::info;

use defter_api as api;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db = api::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    if cfg.auto_migrate {
        api::db::run_migrations(&db)
            .await
            .context("failed to run migrations before seeding")?;
    }

    let admin = api::services::seed::seed_super_admin_from_config(&db, &cfg)
        .await
        .context("failed to seed super admin")?;

    info!(user_id = %admin.id, email = %admin.email, "Super admin ready");

    Ok(())
}
