//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own catalog and user database.

use super::constants::*;
use super::fixtures::create_test_db_dir;
use music_catalog_server::catalog_store::SqliteCatalogStore;
use music_catalog_server::favorites::FavoritesIndex;
use music_catalog_server::search::{CatalogSearchEngine, SearchSettings};
use music_catalog_server::server::{
    server::make_app, RequestsLoggingLevel, ServerConfig, ServerState,
};
use music_catalog_server::user::{AccountManager, SqliteUserStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated databases
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    // Keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_settings(SearchSettings::default()).await
    }

    /// Spawns a server on a random port with the given search settings.
    ///
    /// # Panics
    ///
    /// Panics if the databases cannot be created, the port cannot be bound
    /// or the server does not become ready within the timeout.
    pub async fn spawn_with_settings(settings: SearchSettings) -> Self {
        let (temp_db_dir, catalog_db_path, user_db_path) =
            create_test_db_dir().expect("Failed to create test databases");

        let catalog_store = Arc::new(
            SqliteCatalogStore::new(&catalog_db_path, 2).expect("Failed to open catalog store"),
        );
        let user_store =
            Arc::new(SqliteUserStore::new(&user_db_path).expect("Failed to open user store"));

        let favorites = Arc::new(FavoritesIndex::new(user_store.clone()));
        let account_manager = Arc::new(AccountManager::new(user_store));
        let search_engine = Arc::new(CatalogSearchEngine::new(
            catalog_store,
            favorites.clone(),
            settings,
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: 0,
            frontend_dir_path: None,
        };
        let state = ServerState::new(config.clone(), search_engine, account_manager, favorites);
        let app = make_app(config, state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    /// Polls the home endpoint until it answers.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
