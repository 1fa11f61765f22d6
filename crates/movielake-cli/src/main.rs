use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod content;
mod popularity;
mod stage;

#[derive(Debug, Parser)]
#[command(name = "movielake")]
#[command(about = "Movie catalog star-schema pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild the content dimension, per-field dimensions, and bridge
    /// tables from the staged content ids (overwrite semantics).
    Content {
        /// Print what would be fetched and written without doing it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Append today's popularity fact rows (append semantics).
    Popularity {
        /// Print what would be fetched and written without doing it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Replace the staging table with content ids read from a file,
    /// one id per line.
    Stage {
        #[arg(long)]
        ids_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = movielake_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();

    let pool_config = movielake_db::PoolConfig {
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
        acquire_timeout_secs: config.db_acquire_timeout_secs,
    };
    let pool = movielake_db::connect_pool(&config.database_url, pool_config).await?;
    movielake_db::ping(&pool).await?;

    match cli.command {
        Commands::Content { dry_run } => content::run_content(&pool, &config, dry_run).await,
        Commands::Popularity { dry_run } => {
            popularity::run_popularity(&pool, &config, dry_run).await
        }
        Commands::Stage { ids_file } => stage::run_stage(&pool, &ids_file).await,
    }
}
