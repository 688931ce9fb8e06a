use super::store::FavoritesStore;
use crate::error::{CatalogError, CatalogResult, StoreError};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddFavoriteOutcome {
    Added,
    AlreadyFavorited,
}

/// Per-account sets of favorite track ids.
///
/// Existence of the account and of the track is checked by the caller
/// before any write.
pub struct FavoritesIndex {
    store: Arc<dyn FavoritesStore>,
}

impl FavoritesIndex {
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        FavoritesIndex { store }
    }

    pub fn track_ids_for(&self, account_id: &str) -> CatalogResult<BTreeSet<String>> {
        Ok(self
            .store
            .get_favorite_track_ids(account_id)?
            .into_iter()
            .collect())
    }

    pub fn contains(&self, account_id: &str, track_id: &str) -> CatalogResult<bool> {
        Ok(self.store.has_favorite(account_id, track_id)?)
    }

    /// Adding an existing edge is not an error: it reports
    /// [`AddFavoriteOutcome::AlreadyFavorited`] and writes nothing.
    pub fn add(&self, account_id: &str, track_id: &str) -> CatalogResult<AddFavoriteOutcome> {
        if self.store.has_favorite(account_id, track_id)? {
            return Ok(AddFavoriteOutcome::AlreadyFavorited);
        }
        match self.store.insert_favorite(account_id, track_id) {
            Ok(()) => {
                debug!("Account {} favorited {}", account_id, track_id);
                Ok(AddFavoriteOutcome::Added)
            }
            // Lost a race with a concurrent add of the same edge
            Err(StoreError::DuplicateKey(_)) => Ok(AddFavoriteOutcome::AlreadyFavorited),
            Err(e) => Err(e.into()),
        }
    }

    pub fn remove(&self, account_id: &str, track_id: &str) -> CatalogResult<()> {
        if self.store.delete_favorite(account_id, track_id)? {
            debug!("Account {} unfavorited {}", account_id, track_id);
            Ok(())
        } else {
            Err(CatalogError::NotFound(format!(
                "track {} is not a favorite",
                track_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::SqliteUserStore;
    use tempfile::TempDir;

    fn create_tmp_index() -> (FavoritesIndex, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteUserStore::new(temp_dir.path().join("user.db")).unwrap();
        (FavoritesIndex::new(Arc::new(store)), temp_dir)
    }

    #[test]
    fn add_is_idempotent() {
        let (index, _dir) = create_tmp_index();
        assert_eq!(index.add("u1", "t1").unwrap(), AddFavoriteOutcome::Added);
        assert_eq!(
            index.add("u1", "t1").unwrap(),
            AddFavoriteOutcome::AlreadyFavorited
        );

        let ids = index.track_ids_for("u1").unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("t1"));
    }

    #[test]
    fn remove_missing_edge_is_not_found() {
        let (index, _dir) = create_tmp_index();
        index.add("u1", "t1").unwrap();

        assert!(matches!(
            index.remove("u1", "t2"),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            index.remove("u2", "t1"),
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(index.track_ids_for("u1").unwrap().len(), 1);

        index.remove("u1", "t1").unwrap();
        assert!(index.track_ids_for("u1").unwrap().is_empty());
        assert!(matches!(
            index.remove("u1", "t1"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn sets_are_per_account() {
        let (index, _dir) = create_tmp_index();
        index.add("u1", "t1").unwrap();
        index.add("u1", "t2").unwrap();
        index.add("u2", "t2").unwrap();

        assert_eq!(
            index.track_ids_for("u1").unwrap(),
            ["t1", "t2"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
        );
        assert_eq!(
            index.track_ids_for("u2").unwrap(),
            ["t2"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
        );
        assert!(index.track_ids_for("u3").unwrap().is_empty());
        assert!(index.contains("u2", "t2").unwrap());
        assert!(!index.contains("u2", "t1").unwrap());
    }

    struct RacingStore;

    impl FavoritesStore for RacingStore {
        fn get_favorite_track_ids(&self, _account_id: &str) -> Result<Vec<String>, StoreError> {
            Ok(vec![])
        }

        fn has_favorite(&self, _account_id: &str, _track_id: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        fn insert_favorite(&self, account_id: &str, track_id: &str) -> Result<(), StoreError> {
            Err(StoreError::DuplicateKey(format!("{}/{}", account_id, track_id)))
        }

        fn delete_favorite(&self, _account_id: &str, _track_id: &str) -> Result<bool, StoreError> {
            Err(StoreError::ServiceUnavailable("down".to_string()))
        }
    }

    #[test]
    fn duplicate_key_on_insert_is_already_favorited() {
        let index = FavoritesIndex::new(Arc::new(RacingStore));
        assert_eq!(
            index.add("u1", "t1").unwrap(),
            AddFavoriteOutcome::AlreadyFavorited
        );
        assert!(matches!(
            index.remove("u1", "t1"),
            Err(CatalogError::StorageUnavailable(_))
        ));
    }
}
