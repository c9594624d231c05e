use cinelog::options::{ExtractOptions, RunOptions};
use cinelog::{Config, Syncer};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cinelog", about = "Syncs a Letterboxd diary feed into a Notion database")]
struct Args {
    /// Walk the feed and log what would be created without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Only process the first N feed items
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load configuration: {}.", err);
            std::process::exit(1);
        }
    };

    let options = RunOptions {
        extract_options: Some(ExtractOptions { limit: args.limit }),
        dry_run: Some(args.dry_run),
    };

    let syncer = Syncer::new(config);
    match syncer.run(Some(options)).await {
        Ok(summary) => info!(
            "Synced {} new of {} entries ({} already recorded).",
            summary.created, summary.total, summary.skipped
        ),
        Err(err) => {
            error!("Sync failed: {}.", err);
            std::process::exit(1);
        }
    }
}
