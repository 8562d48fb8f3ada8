//! Expenseweb main entry point

use clap::Parser;
use expenseweb_api::{start_server, AppState};
use expenseweb_config::Config;
use expenseweb_core::{MemoryExpenseStore, MemoryUserStore, SeedData};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "expenseweb")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight personal expense tracking web service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load_or_default(args.config.clone())?;

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();
    log::info!("Config loaded from {}", args.config.display());

    let rt = Runtime::new()?;
    rt.block_on(async move {
        let expenses = Arc::new(MemoryExpenseStore::new());
        let users = Arc::new(MemoryUserStore::new());

        if let Some(seed_path) = &config.data.seed_file {
            if seed_path.exists() {
                let seed = SeedData::from_file(seed_path)?;
                seed.apply(expenses.as_ref(), users.as_ref()).await?;
            } else {
                log::warn!("Seed file not found: {}", seed_path.display());
            }
        }

        let state = AppState::new(expenses, users, config);
        start_server(state).await?;
        anyhow::Ok(())
    })
}
