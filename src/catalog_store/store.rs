//! SQLite-backed catalog store.
//!
//! Reads go through a small pool of read-only connections picked round-robin,
//! writes through a single read-write connection. The database runs in WAL
//! mode so scans never block ingestion.

use super::models::{ContinuationToken, ScanPage, Track, TrackYear};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::error::StoreError;
use crate::search::{Clause, TrackPredicate};
use crate::sqlite_persistence::{lock_conn, open_versioned_db};
use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, types::Value, Connection, OpenFlags, Row};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const TRACK_COLUMNS: &str = "id, title, artist, year, media_url, image_url";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

impl SqliteCatalogStore {
    /// Opens (or creates) the catalog database at `db_path` with
    /// `read_pool_size` read connections, at least one.
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();
        let write_conn = open_versioned_db(db_path, CATALOG_VERSIONED_SCHEMAS)?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let track_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM track", [], |r| r.get(0))
            .context("Failed to count tracks")?;
        info!("Opened catalog {}: {} tracks", db_path.display(), track_count);

        let read_pool_size = read_pool_size.max(1);
        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .context("Failed to open catalog read connection")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn insert_track(conn: &Connection, track: &Track) -> Result<(), StoreError> {
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO track ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                TRACK_COLUMNS
            ),
            params![
                track.id,
                track.title,
                track.artist,
                track.year.as_text(),
                track.media_url,
                track.image_url
            ],
        )?;
        Ok(())
    }
}

fn track_from_row(row: &Row) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        year: TrackYear::from_stored(row.get(3)?),
        media_url: row.get(4)?,
        image_url: row.get(5)?,
    })
}

/// Renders `predicate` as an SQL boolean expression over the track table,
/// with one anonymous parameter per returned value, in order.
fn render_predicate(predicate: &TrackPredicate) -> (String, Vec<Value>) {
    if predicate.is_accept_all() {
        return ("1".to_string(), Vec::new());
    }
    let mut parts = Vec::with_capacity(predicate.clauses().len());
    let mut values = Vec::new();
    for clause in predicate.clauses() {
        match clause {
            // instr() is a case-sensitive substring search, like str::contains
            Clause::Contains { field, needle } => {
                parts.push(format!("instr({}, ?) > 0", field.column()));
                values.push(Value::Text(needle.clone()));
            }
            Clause::Equals { field, value } => {
                parts.push(format!("{} = ?", field.column()));
                values.push(Value::Text(value.clone()));
            }
            Clause::IdIn(ids) if ids.is_empty() => parts.push("0".to_string()),
            // One JSON array parameter, whatever the set size
            Clause::IdIn(ids) => {
                parts.push("id IN (SELECT value FROM json_each(?))".to_string());
                let ids = serde_json::Value::Array(
                    ids.iter().cloned().map(serde_json::Value::String).collect(),
                );
                values.push(Value::Text(ids.to_string()));
            }
        }
    }
    let sql = parts
        .iter()
        .map(|p| format!("({})", p))
        .collect::<Vec<_>>()
        .join(" AND ");
    (sql, values)
}

impl CatalogStore for SqliteCatalogStore {
    fn scan_tracks(
        &self,
        predicate: &TrackPredicate,
        limit: usize,
        start_after: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        let limit = limit.max(1);
        let start_key = start_after.map(|t| t.last_key()).transpose()?;

        // The whole raw window is read in one statement, each row tagged with
        // the predicate outcome, so the window bounds and the matches come
        // from the same snapshot.
        let (predicate_sql, mut values) = render_predicate(predicate);
        let window_sql = match start_key {
            Some(key) => {
                values.push(Value::Text(key));
                "WHERE id > ? "
            }
            None => "",
        };
        values.push(Value::Integer(limit as i64));
        let sql = format!(
            "SELECT {}, ({}) AS matched FROM track {}ORDER BY id LIMIT ?",
            TRACK_COLUMNS, predicate_sql, window_sql
        );

        let conn = self.get_read_conn();
        let conn = lock_conn(&conn)?;
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                let matched: Option<i64> = row.get(6)?;
                Ok((track_from_row(row)?, matched.unwrap_or(0) != 0))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let scanned_count = rows.len();
        let continuation = match rows.last() {
            Some((last, _)) if scanned_count == limit => {
                Some(ContinuationToken::after_key(&last.id))
            }
            _ => None,
        };
        let items: Vec<Track> = rows
            .into_iter()
            .filter_map(|(track, matched)| matched.then_some(track))
            .collect();
        debug!(
            "Scanned {} tracks, {} matched, more: {}",
            scanned_count,
            items.len(),
            continuation.is_some()
        );

        Ok(ScanPage {
            items,
            scanned_count,
            continuation,
        })
    }

    fn count_tracks(&self, predicate: &TrackPredicate) -> Result<usize, StoreError> {
        let (predicate_sql, values) = render_predicate(predicate);
        let conn = self.get_read_conn();
        let conn = lock_conn(&conn)?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM track WHERE {}", predicate_sql),
            params_from_iter(values.iter()),
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    fn fetch_tracks(&self, predicate: &TrackPredicate) -> Result<Vec<Track>, StoreError> {
        let (predicate_sql, values) = render_predicate(predicate);
        let conn = self.get_read_conn();
        let conn = lock_conn(&conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM track WHERE {} ORDER BY id",
            TRACK_COLUMNS, predicate_sql
        ))?;
        let tracks = stmt
            .query_map(params_from_iter(values.iter()), track_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    fn get_track(&self, id: &str) -> Result<Option<Track>, StoreError> {
        let conn = self.get_read_conn();
        let conn = lock_conn(&conn)?;
        match conn.query_row(
            &format!("SELECT {} FROM track WHERE id = ?1", TRACK_COLUMNS),
            params![id],
            track_from_row,
        ) {
            Ok(track) => Ok(Some(track)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put_track(&self, track: &Track) -> Result<(), StoreError> {
        let conn = lock_conn(&self.write_conn)?;
        Self::insert_track(&conn, track)
    }

    fn put_tracks(&self, tracks: &[Track]) -> Result<(), StoreError> {
        let mut conn = lock_conn(&self.write_conn)?;
        let tx = conn.transaction()?;
        for track in tracks {
            Self::insert_track(&tx, track)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_tracks_count(&self) -> Result<usize, StoreError> {
        let conn = self.get_read_conn();
        let conn = lock_conn(&conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM track", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}
