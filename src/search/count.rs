use crate::catalog_store::CatalogStore;
use crate::error::CatalogResult;
use crate::search::TrackPredicate;
use std::sync::Arc;

/// Exact totals for a predicate, independent of any paging walk.
///
/// Callers pass the very predicate they page with; a count for one
/// predicate must never be paired with a page of another.
pub struct CountReconciler {
    store: Arc<dyn CatalogStore>,
}

impl CountReconciler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        CountReconciler { store }
    }

    pub fn count(&self, predicate: &TrackPredicate) -> CatalogResult<usize> {
        Ok(self.store.count_tracks(predicate)?)
    }
}
