//! SheetKeep - composition root binary.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheetkeep_player::config::{load_dotenv_from_repo_root, SheetConfig};
use sheetkeep_player::infrastructure::storage::{build_record_store, open_local_storage};
use sheetkeep_player::infrastructure::SystemClock;
use sheetkeep_player::runner::{self, cli::Cli, RunnerDeps};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout carries the rendered sheets
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetkeep_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = SheetConfig::from_env()?;
    tracing::debug!(
        backend = config.backend.name(),
        table = %config.table,
        "Configuration loaded"
    );

    let local = open_local_storage(&config);
    let records = build_record_store(&config, Arc::clone(&local));

    let deps = RunnerDeps {
        config,
        local,
        records,
        clock: Arc::new(SystemClock::new()),
    };

    runner::run(deps, cli.command).await?;
    Ok(())
}
