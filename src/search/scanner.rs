//! Page materialization over a store that only offers continuation tokens.
//!
//! Pages are resolved by walking the collection from its start, one bounded
//! scan at a time. The walk is not transactional: the catalog may change
//! between two scans of the same walk, so a page is a best-effort snapshot.

use crate::catalog_store::{CatalogStore, ContinuationToken, Track};
use crate::error::{CatalogError, CatalogResult};
use crate::search::TrackPredicate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// How logical pages map onto store scans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PagingStrategy {
    /// Page `P` is whatever the predicate matched inside the `P`-th raw scan
    /// window of `per_page` records. Pages can be short or empty even when
    /// later pages are not.
    #[default]
    ScanWindow,
    /// Matched records are accumulated across as many scans as needed, so
    /// every page but the last holds exactly `per_page` records.
    FillPage,
}

pub struct TokenPaginatedScanner {
    store: Arc<dyn CatalogStore>,
    strategy: PagingStrategy,
    max_scan_calls: usize,
}

impl TokenPaginatedScanner {
    /// `max_scan_calls` bounds the number of store scans a single page
    /// resolution may issue.
    pub fn new(
        store: Arc<dyn CatalogStore>,
        strategy: PagingStrategy,
        max_scan_calls: usize,
    ) -> Self {
        TokenPaginatedScanner {
            store,
            strategy,
            max_scan_calls,
        }
    }

    pub fn strategy(&self) -> PagingStrategy {
        self.strategy
    }

    /// Materializes the 1-indexed `page` of tracks accepted by `predicate`.
    ///
    /// A page past the end of the collection is empty, not an error. Any
    /// failed scan aborts the whole walk.
    pub fn page(
        &self,
        predicate: &TrackPredicate,
        page: usize,
        page_size: usize,
    ) -> CatalogResult<Vec<Track>> {
        if page < 1 {
            return Err(CatalogError::InvalidArgument(
                "page numbers start at 1".to_string(),
            ));
        }
        if page_size < 1 {
            return Err(CatalogError::InvalidArgument(
                "page size must be at least 1".to_string(),
            ));
        }
        match self.strategy {
            PagingStrategy::ScanWindow => self.scan_window_page(predicate, page, page_size),
            PagingStrategy::FillPage => self.fill_page(predicate, page, page_size),
        }
    }

    fn scan_window_page(
        &self,
        predicate: &TrackPredicate,
        page: usize,
        page_size: usize,
    ) -> CatalogResult<Vec<Track>> {
        let mut token: Option<ContinuationToken> = None;
        let mut scans = 0;
        loop {
            // The budget only counts while the collection still has windows left
            if scans == self.max_scan_calls {
                return Err(CatalogError::InvalidArgument(format!(
                    "page {} needs more than {} scans",
                    page, self.max_scan_calls
                )));
            }
            let window = self
                .store
                .scan_tracks(predicate, page_size, token.as_ref())?;
            scans += 1;
            if scans == page {
                debug!(
                    "Page {} resolved: {} of {} scanned records matched",
                    page,
                    window.items.len(),
                    window.scanned_count
                );
                return Ok(window.items);
            }
            match window.continuation {
                Some(next) => token = Some(next),
                None => {
                    debug!("Collection exhausted after {} windows, before page {}", scans, page);
                    return Ok(Vec::new());
                }
            }
        }
    }

    fn fill_page(
        &self,
        predicate: &TrackPredicate,
        page: usize,
        page_size: usize,
    ) -> CatalogResult<Vec<Track>> {
        let mut to_skip = (page - 1).saturating_mul(page_size);
        let mut collected = Vec::with_capacity(page_size);
        let mut token: Option<ContinuationToken> = None;

        for _ in 0..self.max_scan_calls {
            let window = self
                .store
                .scan_tracks(predicate, page_size, token.as_ref())?;
            for track in window.items {
                if to_skip > 0 {
                    to_skip -= 1;
                } else {
                    collected.push(track);
                    if collected.len() == page_size {
                        return Ok(collected);
                    }
                }
            }
            match window.continuation {
                Some(next) => token = Some(next),
                None => return Ok(collected),
            }
        }
        Err(CatalogError::InvalidArgument(format!(
            "page {} needs more than {} scans",
            page, self.max_scan_calls
        )))
    }
}
