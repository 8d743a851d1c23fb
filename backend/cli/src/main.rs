mod check_cmd;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};

use stocksync_desktop::RetaguardaDriver;
use stocksync_store::{FirestoreStore, ServiceAccountKey, TokenProvider};
use stocksync_sync::SyncRunner;

use config::Config;

#[derive(Parser)]
#[command(name = "stocksync")]
#[command(about = "Sync POS on-screen stock counts back to the inventory collection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync pass over the whole collection
    Run,
    /// Validate credentials, templates, and the application path
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_sync(config).await,
        Commands::Check => {
            check_cmd::run(&config);
            Ok(())
        }
    }
}

async fn run_sync(config: Config) -> Result<()> {
    let key = ServiceAccountKey::from_file(&config.service_account_path)?;
    let client = reqwest::Client::new();
    let mut tokens = TokenProvider::new(client.clone(), key);
    if let Some(project_id) = config.project_id.clone() {
        tokens = tokens.with_project_id(project_id);
    }
    let store = FirestoreStore::new(client, tokens, &config.collection);
    let driver = RetaguardaDriver::new(config.driver_config())?;

    let report = SyncRunner::new(store, driver).run().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}
