use axum::extract::FromRef;

use crate::favorites::FavoritesIndex;
use crate::search::CatalogSearchEngine;
use crate::user::AccountManager;
use std::sync::Arc;
use std::time::Instant;

use super::{RequestsLoggingLevel, ServerConfig};

pub type GuardedSearchEngine = Arc<CatalogSearchEngine>;
pub type GuardedAccountManager = Arc<AccountManager>;
pub type GuardedFavoritesIndex = Arc<FavoritesIndex>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub search_engine: GuardedSearchEngine,
    pub account_manager: GuardedAccountManager,
    pub favorites: GuardedFavoritesIndex,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        search_engine: GuardedSearchEngine,
        account_manager: GuardedAccountManager,
        favorites: GuardedFavoritesIndex,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            search_engine,
            account_manager,
            favorites,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedSearchEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.search_engine.clone()
    }
}

impl FromRef<ServerState> for GuardedAccountManager {
    fn from_ref(input: &ServerState) -> Self {
        input.account_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedFavoritesIndex {
    fn from_ref(input: &ServerState) -> Self {
        input.favorites.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for RequestsLoggingLevel {
    fn from_ref(input: &ServerState) -> Self {
        input.config.requests_logging_level.clone()
    }
}
