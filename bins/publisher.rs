//! Publisher CLI: push local exports to the asset server, or mirror published
//! packages by following its change feed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use publisher::client::ApiClient;
use publisher::sync::SyncAgent;

#[derive(Parser)]
#[command(name = "publisher")]
#[command(about = "Publish and sync assets against the web asset server", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the asset server
    #[arg(long, env = "WEB_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// API key sent as X-API-Key (publishing needs editor privilege)
    #[arg(long, env = "WEB_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect, validate and upload exports from a local directory
    Publish {
        /// Exports directory laid out as <root>/<family>/<asset_name>/
        #[arg(long, default_value = "exports")]
        root: PathBuf,
    },

    /// Mirror published packages by polling the change feed
    Sync {
        /// Local mirror directory
        #[arg(long, default_value = "mirror")]
        root: PathBuf,

        /// Poll interval in seconds
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },

    /// Print server liveness info
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();

    let cli = Cli::parse();
    let client = ApiClient::new(cli.server.clone(), cli.api_key.clone());

    match cli.command {
        Commands::Publish { root } => {
            let report = publisher::publish::run(&client, &root).await?;
            info!(
                published = report.published.len(),
                skipped = report.skipped.len(),
                "publish run finished"
            );
            for item in &report.published {
                println!("published {} v{} ({} files)", item.asset_id, item.version, item.uploaded.len());
            }
            for item in &report.skipped {
                println!("skipped {}:", item.asset_id);
                for v in &item.violations {
                    println!("  [{}] {}", v.rule, v.message);
                }
            }
        }
        Commands::Sync { root, interval } => {
            let agent = SyncAgent::new(client, root, Duration::from_secs(interval));
            agent.run().await?;
        }
        Commands::Stats => {
            let stats = client.stats().await?;
            println!("server ok={} version={} time={}", stats.ok, stats.version, stats.time);
        }
    }
    Ok(())
}
