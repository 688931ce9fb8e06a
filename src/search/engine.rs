//! Catalog search: filtered, paginated views of the catalog, optionally
//! scoped to an account's favorites.

use super::count::CountReconciler;
use super::predicate::{TrackFilter, TrackPredicate};
use super::scanner::{PagingStrategy, TokenPaginatedScanner};
use crate::catalog_store::{CatalogStore, Track};
use crate::error::{CatalogError, CatalogResult};
use crate::favorites::FavoritesIndex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSettings {
    pub default_per_page: usize,
    pub max_per_page: usize,
    pub max_scan_calls: usize,
    pub paging_strategy: PagingStrategy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            default_per_page: 10,
            max_per_page: 100,
            max_scan_calls: 1000,
            paging_strategy: PagingStrategy::ScanWindow,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoritesMode {
    /// The whole catalog. Favorited tracks are not excluded.
    #[default]
    Unsubscribed,
    /// Only tracks in the account's favorites.
    MyFavorites,
}

#[derive(Clone, Debug, Default)]
pub struct SearchRequest {
    pub filter: TrackFilter,
    pub mode: FavoritesMode,
    /// Required by [`FavoritesMode::MyFavorites`].
    pub account_id: Option<String>,
    /// 1-indexed.
    pub page: usize,
    /// Falls back to the configured default when `None`.
    pub per_page: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    /// Exact number of tracks matching the request, across all pages.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

pub struct CatalogSearchEngine {
    store: Arc<dyn CatalogStore>,
    favorites: Arc<FavoritesIndex>,
    scanner: TokenPaginatedScanner,
    counter: CountReconciler,
    settings: SearchSettings,
}

impl CatalogSearchEngine {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        favorites: Arc<FavoritesIndex>,
        settings: SearchSettings,
    ) -> Self {
        CatalogSearchEngine {
            scanner: TokenPaginatedScanner::new(
                store.clone(),
                settings.paging_strategy,
                settings.max_scan_calls,
            ),
            counter: CountReconciler::new(store.clone()),
            store,
            favorites,
            settings,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    fn resolve_paging(&self, page: usize, per_page: Option<usize>) -> CatalogResult<usize> {
        if page < 1 {
            return Err(CatalogError::InvalidArgument(
                "page numbers start at 1".to_string(),
            ));
        }
        match per_page.unwrap_or(self.settings.default_per_page) {
            0 => Err(CatalogError::InvalidArgument(
                "per_page must be at least 1".to_string(),
            )),
            n => Ok(n.min(self.settings.max_per_page)),
        }
    }

    pub fn search(&self, request: &SearchRequest) -> CatalogResult<TrackPage> {
        let per_page = self.resolve_paging(request.page, request.per_page)?;
        let predicate = TrackPredicate::from_filter(&request.filter);
        debug!(
            "Search {:?} page {} per_page {}: {:?}",
            request.mode,
            request.page,
            per_page,
            predicate.clauses()
        );

        let (tracks, total) = match request.mode {
            FavoritesMode::Unsubscribed => {
                let tracks = self.scanner.page(&predicate, request.page, per_page)?;
                let total = self.counter.count(&predicate)?;
                (tracks, total)
            }
            FavoritesMode::MyFavorites => {
                let account_id = request.account_id.as_deref().ok_or_else(|| {
                    CatalogError::InvalidArgument(
                        "searching favorites requires an account".to_string(),
                    )
                })?;
                self.search_favorites(account_id, predicate, request.page, per_page)?
            }
        };

        Ok(TrackPage {
            tracks,
            total,
            page: request.page,
            per_page,
        })
    }

    /// Favorite sets are small next to the catalog: the whole matching set
    /// is fetched at once and paged in memory.
    fn search_favorites(
        &self,
        account_id: &str,
        predicate: TrackPredicate,
        page: usize,
        per_page: usize,
    ) -> CatalogResult<(Vec<Track>, usize)> {
        let favorite_ids = self.favorites.track_ids_for(account_id)?;
        if favorite_ids.is_empty() {
            return Ok((Vec::new(), 0));
        }
        let matched = self
            .store
            .fetch_tracks(&predicate.and_id_in(favorite_ids))?;
        let total = matched.len();
        let tracks = matched
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
        Ok((tracks, total))
    }

    /// Page of an account's favorites, unfiltered.
    ///
    /// `total` counts favorite edges; a favorite whose track has left the
    /// catalog is counted but not returned.
    pub fn favorites_listing(
        &self,
        account_id: &str,
        page: usize,
        per_page: Option<usize>,
    ) -> CatalogResult<TrackPage> {
        let per_page = self.resolve_paging(page, per_page)?;
        let favorite_ids = self.favorites.track_ids_for(account_id)?;
        let total = favorite_ids.len();

        let mut tracks = Vec::with_capacity(per_page);
        for id in favorite_ids
            .iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
        {
            match self.store.get_track(id)? {
                Some(track) => tracks.push(track),
                None => debug!("Favorite {} of {} is not in the catalog", id, account_id),
            }
        }

        Ok(TrackPage {
            tracks,
            total,
            page,
            per_page,
        })
    }

    pub fn list_all(&self) -> CatalogResult<Vec<Track>> {
        Ok(self.store.fetch_tracks(&TrackPredicate::accept_all())?)
    }

    pub fn get_track(&self, id: &str) -> CatalogResult<Track> {
        self.store
            .get_track(id)?
            .ok_or_else(|| CatalogError::NotFound(format!("track {}", id)))
    }
}
