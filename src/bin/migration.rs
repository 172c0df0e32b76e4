use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use defter_api as api;
use migrations::Migrator;

#[derive(Parser)]
#[command(name = "migration", about = "Schema migration runner for the Defter database", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations (all of them unless --steps is given)
    Up {
        #[arg(long, help = "Apply at most this many pending migrations")]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(long, default_value_t = 1, help = "Roll back this many migrations")]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Drop every table and reapply all migrations from scratch
    Fresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db = api::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::Up { steps } => {
            info!("Applying migrations (steps: {:?})", steps);
            Migrator::up(&db, steps).await?;
            info!("Migrations applied");
        }
        Commands::Down { steps } => {
            info!("Rolling back {} migration(s)", steps);
            Migrator::down(&db, Some(steps)).await?;
            info!("Rollback finished");
        }
        Commands::Status => {
            Migrator::status(&db).await?;
        }
        Commands::Fresh => {
            info!("Dropping all tables and reapplying migrations");
            Migrator::fresh(&db).await?;
            info!("Database refreshed");
        }
    }

    Ok(())
}
