//! SQLite schema of the catalog database.
//!
//! Tracks are keyed by their opaque text id. There is no index
//! besides the primary key: every filtered read is a scan.

use crate::sqlite_column;
use crate::sqlite_persistence::{SqlType, Table, VersionedSchema};

pub const TRACK_TABLE_V_0: Table = Table {
    name: "track",
    columns: &[
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Text, non_null = true), // canonical text, see TrackYear
        sqlite_column!("media_url", &SqlType::Text, non_null = true),
        sqlite_column!("image_url", &SqlType::Text, non_null = true),
    ],
    primary_key: &["id"],
    indices: &[],
    unique_constraints: &[],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[TRACK_TABLE_V_0],
    migration: None,
}];
