//! Music Catalog Server Library
//!
//! This library exposes the internal modules for the server binary and the
//! end-to-end tests.

pub mod catalog_store;
pub mod config;
pub mod error;
pub mod favorites;
pub mod search;
pub mod server;
pub mod sqlite_persistence;
pub mod user;

pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use error::{CatalogError, CatalogResult, StoreError};
pub use search::{CatalogSearchEngine, SearchSettings};
pub use server::{run_server, RequestsLoggingLevel};
pub use user::SqliteUserStore;
