mod export;
mod query;
mod scrape;

use clap::{Parser, Subcommand};
use hotelrev_core::AppConfig;
use hotelrev_db::PoolConfig;
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

use crate::scrape::ScrapeCommands;

#[derive(Debug, Parser)]
#[command(name = "hotelrev-cli")]
#[command(about = "Hotel review scraper and local review store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape reviews from the review site and store them
    Scrape {
        #[command(subcommand)]
        command: ScrapeCommands,
    },
    /// List stored hotels
    Hotels {
        /// Case-insensitive substring filter on location
        #[arg(long)]
        location: Option<String>,
    },
    /// Show stored reviews and summary statistics for a hotel
    Reviews {
        /// Hotel id as shown by `hotels`
        hotel_id: i64,
    },
    /// Write a hotel, its reviews and their summary to a JSON file
    Export {
        hotel_id: i64,
        /// Destination file
        #[arg(long, short)]
        output: std::path::PathBuf,
    },
    /// Show or clear the search history
    History {
        /// Maximum number of entries to show
        #[arg(long, default_value = "10")]
        limit: u32,
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },
    /// Delete a hotel and all of its reviews
    DeleteHotel { hotel_id: i64 },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryCommands {
    /// Delete every history entry
    Clear,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

/// Config and pool shared by every command for the lifetime of the process.
pub(crate) struct AppContext {
    pub(crate) config: AppConfig,
    pub(crate) pool: SqlitePool,
}

impl AppContext {
    async fn open(config: AppConfig) -> anyhow::Result<Self> {
        let pool_config = PoolConfig::from_app_config(&config);
        let pool = hotelrev_db::connect_pool(&config.database_url, pool_config).await?;
        Ok(Self { config, pool })
    }

    async fn close(self) {
        self.pool.close().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = hotelrev_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let Some(command) = cli.command else {
        println!("hotelrev-cli ready; run with --help to list commands");
        return Ok(());
    };

    let ctx = AppContext::open(config).await?;
    let result = run(&ctx, command).await;
    ctx.close().await;
    result
}

async fn run(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Db { command } => run_db(&ctx.pool, command).await,
        other => {
            let applied = hotelrev_db::run_migrations(&ctx.pool).await?;
            if applied > 0 {
                tracing::info!(applied, "applied pending migrations");
            }
            dispatch(ctx, other).await
        }
    }
}

async fn dispatch(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Scrape { command } => match command {
            ScrapeCommands::Hotel {
                url,
                max_pages,
                fetch,
            } => scrape::run_scrape_hotel(ctx, &url, max_pages, &fetch).await,
            ScrapeCommands::Region {
                url,
                max_hotels,
                max_pages_per_hotel,
                fetch,
            } => {
                scrape::run_scrape_region(ctx, &url, max_hotels, max_pages_per_hotel, &fetch).await
            }
        },
        Commands::Hotels { location } => query::run_hotels(&ctx.pool, location.as_deref()).await,
        Commands::Reviews { hotel_id } => query::run_reviews(&ctx.pool, hotel_id).await,
        Commands::Export { hotel_id, output } => {
            export::run_export(&ctx.pool, hotel_id, &output).await
        }
        Commands::History { limit, command } => match command {
            Some(HistoryCommands::Clear) => query::run_history_clear(&ctx.pool).await,
            None => query::run_history(&ctx.pool, limit).await,
        },
        Commands::DeleteHotel { hotel_id } => query::run_delete_hotel(&ctx.pool, hotel_id).await,
        Commands::Db { command } => run_db(&ctx.pool, command).await,
    }
}

async fn run_db(pool: &SqlitePool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Migrate => {
            let applied = hotelrev_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Ping => {
            hotelrev_db::ping(pool).await?;
            println!("database reachable");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
