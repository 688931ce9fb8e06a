//! Catalog browsing and the unsubscribed search view.

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::http_cache;
use super::state::{GuardedSearchEngine, ServerState};
use crate::catalog_store::Track;
use crate::error::CatalogResult;
use crate::search::{FavoritesMode, SearchRequest, TrackFilter, TrackPage};

/// Search criteria and paging shared by the catalog and favorites searches.
///
/// The `search_music_*` aliases keep older frontends working.
#[derive(Deserialize, Debug, Default)]
pub(super) struct TrackQuery {
    #[serde(alias = "search_music_title")]
    pub title: Option<String>,
    #[serde(alias = "search_music_artist")]
    pub artist: Option<String>,
    #[serde(alias = "search_music_year")]
    pub year: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl TrackQuery {
    pub fn filter(&self) -> TrackFilter {
        TrackFilter {
            title_contains: self.title.clone(),
            artist_contains: self.artist.clone(),
            year_equals: self.year.clone(),
        }
    }

    pub fn search_request(&self, mode: FavoritesMode, account_id: Option<String>) -> SearchRequest {
        SearchRequest {
            filter: self.filter(),
            mode,
            account_id,
            page: self.page.unwrap_or(1),
            per_page: self.per_page,
        }
    }
}

#[derive(Serialize)]
struct AllTracksResponse {
    tracks: Vec<Track>,
    total: usize,
}

async fn get_all_tracks(
    State(engine): State<GuardedSearchEngine>,
) -> CatalogResult<Json<AllTracksResponse>> {
    let tracks = engine.list_all()?;
    Ok(Json(AllTracksResponse {
        total: tracks.len(),
        tracks,
    }))
}

async fn search_unsubscribed(
    State(engine): State<GuardedSearchEngine>,
    Query(query): Query<TrackQuery>,
) -> CatalogResult<Json<TrackPage>> {
    let request = query.search_request(FavoritesMode::Unsubscribed, None);
    Ok(Json(engine.search(&request)?))
}

async fn get_track(
    State(engine): State<GuardedSearchEngine>,
    Path(id): Path<String>,
) -> CatalogResult<Json<Track>> {
    Ok(Json(engine.get_track(&id)?))
}

pub fn make_catalog_routes(state: ServerState) -> Router {
    let cached_routes: Router = Router::new()
        .route("/{id}", get(get_track))
        .layer(middleware::from_fn_with_state(
            state.config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/all", get(get_all_tracks))
        .route("/unsubscribed", get(search_unsubscribed))
        .with_state(state)
        .merge(cached_routes)
}
