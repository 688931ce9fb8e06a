//! CatalogStore trait definition.

use super::models::{ContinuationToken, ScanPage, Track};
use crate::error::StoreError;
use crate::search::TrackPredicate;

/// Storage collaborator holding the track catalog.
///
/// The store offers no offset-based access: callers page through a filtered
/// view with [`CatalogStore::scan_tracks`] and the continuation token it
/// returns. Implementations must be safe to share across request handlers.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Scans
    // =========================================================================

    /// Evaluates at most `limit` raw records in key order, strictly after the
    /// key encoded in `start_after` (from the beginning if `None`).
    ///
    /// Only records accepted by `predicate` are returned, so `items` may hold
    /// fewer than `limit` records, or none, even when more data follows. A
    /// continuation token is returned iff the window was full.
    fn scan_tracks(
        &self,
        predicate: &TrackPredicate,
        limit: usize,
        start_after: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError>;

    /// Count-only scan: number of records accepted by `predicate`.
    fn count_tracks(&self, predicate: &TrackPredicate) -> Result<usize, StoreError>;

    /// Full filtered fetch of every record accepted by `predicate`, in key order.
    fn fetch_tracks(&self, predicate: &TrackPredicate) -> Result<Vec<Track>, StoreError>;

    // =========================================================================
    // Keyed access
    // =========================================================================

    /// Returns Ok(None) if no track has the given id.
    fn get_track(&self, id: &str) -> Result<Option<Track>, StoreError>;

    /// Inserts a track, replacing any record with the same id.
    fn put_track(&self, track: &Track) -> Result<(), StoreError>;

    /// Inserts several tracks at once. Either all of them are written or none.
    fn put_tracks(&self, tracks: &[Track]) -> Result<(), StoreError>;

    fn get_tracks_count(&self) -> Result<usize, StoreError>;
}
