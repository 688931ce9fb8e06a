mod file_config;

pub use file_config::{FileConfig, SearchConfig};

use crate::search::{PagingStrategy, SearchSettings};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments taking part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub paging_strategy: Option<PagingStrategy>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub search: SearchSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;
        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());
        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let search_file = file.search.unwrap_or_default();
        let defaults = SearchSettings::default();
        let search = SearchSettings {
            default_per_page: search_file
                .default_per_page
                .unwrap_or(defaults.default_per_page),
            max_per_page: search_file.max_per_page.unwrap_or(defaults.max_per_page),
            max_scan_calls: search_file
                .max_scan_calls
                .unwrap_or(defaults.max_scan_calls),
            paging_strategy: search_file
                .paging_strategy
                .or(cli.paging_strategy)
                .unwrap_or(defaults.paging_strategy),
        };
        if search.default_per_page == 0 || search.max_per_page == 0 {
            bail!("search page sizes must be at least 1");
        }
        if search.max_scan_calls == 0 {
            bail!("search.max_scan_calls must be at least 1");
        }

        Ok(Self {
            db_dir,
            port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            search,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }
}

/// Uses clap's ValueEnum parsing, case insensitive.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
