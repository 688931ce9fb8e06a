//! Test fixture creation for the catalog and user databases

use super::constants::*;
use anyhow::Result;
use music_catalog_server::catalog_store::{CatalogStore, SqliteCatalogStore, Track, TrackYear};
use std::path::PathBuf;
use tempfile::TempDir;

pub fn catalog_tracks() -> Vec<Track> {
    CATALOG_TRACKS
        .iter()
        .map(|(id, title, artist, year)| Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            year: TrackYear::Number(*year),
            media_url: format!("https://media.example.com/{}.mp3", id),
            image_url: format!("https://media.example.com/{}.jpg", id),
        })
        .collect()
}

/// Creates a temporary db dir whose catalog.db holds [`CATALOG_TRACKS`].
/// user.db is left for the server to create.
/// Returns (temp_dir, catalog_db_path, user_db_path)
pub fn create_test_db_dir() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");
    let user_db_path = dir.path().join("user.db");

    let store = SqliteCatalogStore::new(&catalog_db_path, 1)?;
    store.put_tracks(&catalog_tracks())?;

    Ok((dir, catalog_db_path, user_db_path))
}
