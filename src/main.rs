use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use shopkeeper::{config, console, db, seed};

/// Console-based inventory and order management for a small shop.
#[derive(Debug, Parser)]
#[command(name = "shopkeeper", version, about)]
struct Cli {
    /// Override the configured database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Skip seeding demo data even if the database is empty.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }
    if cli.no_seed {
        cfg.seed_demo_data = false;
    }

    config::init_tracing(cfg.log_level(), cfg.log_json);
    info!(database_url = %cfg.database_url, "Starting shopkeeper");

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;

    if cfg.auto_migrate {
        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    if cfg.seed_demo_data {
        seed::seed_demo_data(&pool)
            .await
            .context("failed to seed demo data")?;
    }

    console::run(Arc::new(pool)).await?;
    Ok(())
}
