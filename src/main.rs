use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use music_catalog_server::catalog_store::SqliteCatalogStore;
use music_catalog_server::config::{AppConfig, CliConfig, FileConfig};
use music_catalog_server::favorites::FavoritesIndex;
use music_catalog_server::search::{CatalogSearchEngine, PagingStrategy};
use music_catalog_server::server::{run_server, RequestsLoggingLevel, ServerConfig, ServerState};
use music_catalog_server::user::{AccountManager, SqliteUserStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding catalog.db and user.db. Created files use the
    /// latest schema.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Optional TOML config file. Its values override the CLI ones.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of track responses in the cache in seconds.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// How unsubscribed searches turn pages into catalog scans.
    #[clap(long)]
    pub paging_strategy: Option<PagingStrategy>,

    /// Read connections kept open on the catalog database.
    #[clap(long, default_value_t = 4)]
    pub read_pool_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        db_dir: cli_args.db_dir.clone(),
        port: cli_args.port,
        logging_level: cli_args.logging_level.clone(),
        content_cache_age_sec: cli_args.content_cache_age_sec,
        frontend_dir_path: cli_args.frontend_dir_path.clone(),
        paging_strategy: cli_args.paging_strategy,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening catalog database at {:?}...", config.catalog_db_path());
    let catalog_store = Arc::new(SqliteCatalogStore::new(
        config.catalog_db_path(),
        cli_args.read_pool_size,
    )?);

    info!("Opening user database at {:?}...", config.user_db_path());
    let user_store = Arc::new(SqliteUserStore::new(config.user_db_path())?);

    let favorites = Arc::new(FavoritesIndex::new(user_store.clone()));
    let account_manager = Arc::new(AccountManager::new(user_store));
    let search_engine = Arc::new(CatalogSearchEngine::new(
        catalog_store,
        favorites.clone(),
        config.search.clone(),
    ));
    info!(
        "Search paging: {:?}, {} per page (max {})",
        config.search.paging_strategy, config.search.default_per_page, config.search.max_per_page
    );

    let state = ServerState::new(
        ServerConfig::from(&config),
        search_engine,
        account_manager,
        favorites,
    );
    run_server(state).await
}
