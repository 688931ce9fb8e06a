//! In-memory catalog store for unit tests.
//!
//! Mirrors the scan contract of the SQLite store over a sorted map, counts
//! the calls it receives and can be switched into a failing mode.

use super::models::{ContinuationToken, ScanPage, Track};
use super::trait_def::CatalogStore;
use crate::error::StoreError;
use crate::search::TrackPredicate;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryCatalogStore {
    tracks: Mutex<BTreeMap<String, Track>>,
    scan_calls: AtomicUsize,
    /// Number of scans that succeed before every further call fails.
    fail_after_scans: Mutex<Option<usize>>,
    unavailable: AtomicBool,
}

impl InMemoryCatalogStore {
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        let store = InMemoryCatalogStore::default();
        store.put_tracks(&tracks).unwrap();
        store
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn fail_after_scans(&self, successful_scans: usize) {
        *self.fail_after_scans.lock().unwrap() = Some(successful_scans);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::ServiceUnavailable("store is down".to_string()));
        }
        Ok(())
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn scan_tracks(
        &self,
        predicate: &TrackPredicate,
        limit: usize,
        start_after: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        let call = self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(successful) = *self.fail_after_scans.lock().unwrap() {
            if call >= successful {
                return Err(StoreError::ServiceUnavailable("scan failed".to_string()));
            }
        }
        self.check_available()?;

        let limit = limit.max(1);
        let start = match start_after {
            Some(token) => Bound::Excluded(token.last_key()?),
            None => Bound::Unbounded,
        };
        let tracks = self.tracks.lock().unwrap();
        let window: Vec<&Track> = tracks
            .range((start, Bound::Unbounded))
            .map(|(_, t)| t)
            .take(limit)
            .collect();
        let continuation = match window.last() {
            Some(last) if window.len() == limit => Some(ContinuationToken::after_key(&last.id)),
            _ => None,
        };
        Ok(ScanPage {
            items: window
                .iter()
                .filter(|t| predicate.matches(t))
                .map(|t| (*t).clone())
                .collect(),
            scanned_count: window.len(),
            continuation,
        })
    }

    fn count_tracks(&self, predicate: &TrackPredicate) -> Result<usize, StoreError> {
        self.check_available()?;
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .values()
            .filter(|t| predicate.matches(t))
            .count())
    }

    fn fetch_tracks(&self, predicate: &TrackPredicate) -> Result<Vec<Track>, StoreError> {
        self.check_available()?;
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .values()
            .filter(|t| predicate.matches(t))
            .cloned()
            .collect())
    }

    fn get_track(&self, id: &str) -> Result<Option<Track>, StoreError> {
        self.check_available()?;
        Ok(self.tracks.lock().unwrap().get(id).cloned())
    }

    fn put_track(&self, track: &Track) -> Result<(), StoreError> {
        self.check_available()?;
        self.tracks
            .lock()
            .unwrap()
            .insert(track.id.clone(), track.clone());
        Ok(())
    }

    fn put_tracks(&self, tracks: &[Track]) -> Result<(), StoreError> {
        for track in tracks {
            self.put_track(track)?;
        }
        Ok(())
    }

    fn get_tracks_count(&self) -> Result<usize, StoreError> {
        self.check_available()?;
        Ok(self.tracks.lock().unwrap().len())
    }
}
