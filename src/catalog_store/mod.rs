#[cfg(test)]
mod memory_store;
mod models;
mod schema;
mod store;
mod trait_def;

#[cfg(test)]
pub(crate) use memory_store::InMemoryCatalogStore;
pub use models::{ContinuationToken, ScanPage, Track, TrackYear};
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
