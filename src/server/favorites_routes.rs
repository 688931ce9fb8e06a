//! Per-account favorites: listing, search and edits.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::catalog_routes::TrackQuery;
use super::state::ServerState;
use crate::error::CatalogResult;
use crate::favorites::AddFavoriteOutcome;
use crate::search::{FavoritesMode, TrackPage};

// Not flattened from TrackQuery: serde(flatten) breaks numeric fields in
// query strings.
#[derive(Deserialize, Debug)]
struct FavoritesSearchQuery {
    user_email: String,
    #[serde(alias = "search_music_title")]
    title: Option<String>,
    #[serde(alias = "search_music_artist")]
    artist: Option<String>,
    #[serde(alias = "search_music_year")]
    year: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl FavoritesSearchQuery {
    fn into_parts(self) -> (String, TrackQuery) {
        let tracks = TrackQuery {
            title: self.title,
            artist: self.artist,
            year: self.year,
            page: self.page,
            per_page: self.per_page,
        };
        (self.user_email, tracks)
    }
}

#[derive(Deserialize, Debug)]
struct FavoritesListingQuery {
    user_email: String,
    page: Option<usize>,
    per_page: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct AccountQuery {
    user_email: String,
}

#[derive(Serialize)]
struct FavoriteStatus {
    track_id: String,
    favorited: bool,
}

#[derive(Deserialize, Debug)]
struct FavoriteEdgeBody {
    user_email: String,
    track_id: String,
}

#[derive(Serialize)]
struct FavoriteEditResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<AddFavoriteOutcome>,
}

async fn search_favorites(
    State(state): State<ServerState>,
    Query(query): Query<FavoritesSearchQuery>,
) -> CatalogResult<Json<TrackPage>> {
    let (user_email, tracks) = query.into_parts();
    let account_id = state.account_manager.resolve_account_id(&user_email)?;
    let request = tracks.search_request(FavoritesMode::MyFavorites, Some(account_id));
    Ok(Json(state.search_engine.search(&request)?))
}

async fn list_favorites(
    State(state): State<ServerState>,
    Query(query): Query<FavoritesListingQuery>,
) -> CatalogResult<Json<TrackPage>> {
    let account_id = state.account_manager.resolve_account_id(&query.user_email)?;
    let page = state.search_engine.favorites_listing(
        &account_id,
        query.page.unwrap_or(1),
        query.per_page,
    )?;
    Ok(Json(page))
}

async fn favorite_status(
    State(state): State<ServerState>,
    Path(track_id): Path<String>,
    Query(query): Query<AccountQuery>,
) -> CatalogResult<Json<FavoriteStatus>> {
    let account_id = state.account_manager.resolve_account_id(&query.user_email)?;
    let favorited = state.favorites.contains(&account_id, &track_id)?;
    Ok(Json(FavoriteStatus {
        track_id,
        favorited,
    }))
}

async fn add_favorite(
    State(state): State<ServerState>,
    Json(body): Json<FavoriteEdgeBody>,
) -> CatalogResult<Json<FavoriteEditResponse>> {
    let account_id = state.account_manager.resolve_account_id(&body.user_email)?;
    state.search_engine.get_track(&body.track_id)?;

    let outcome = state.favorites.add(&account_id, &body.track_id)?;
    let message = match outcome {
        AddFavoriteOutcome::Added => "Added to favorites",
        AddFavoriteOutcome::AlreadyFavorited => "Already in favorites",
    };
    Ok(Json(FavoriteEditResponse {
        message: message.to_string(),
        outcome: Some(outcome),
    }))
}

async fn remove_favorite(
    State(state): State<ServerState>,
    Query(edge): Query<FavoriteEdgeBody>,
) -> CatalogResult<Json<FavoriteEditResponse>> {
    let account_id = state.account_manager.resolve_account_id(&edge.user_email)?;
    state.favorites.remove(&account_id, &edge.track_id)?;
    Ok(Json(FavoriteEditResponse {
        message: "Removed from favorites".to_string(),
        outcome: None,
    }))
}

pub fn make_favorites_routes(state: ServerState) -> Router {
    Router::new()
        .route(
            "/",
            get(list_favorites).post(add_favorite).delete(remove_favorite),
        )
        .route("/search", get(search_favorites))
        .route("/{track_id}", get(favorite_status))
        .with_state(state)
}
