use crate::error::StoreError;

/// Storage of the account -> track favorite relation.
///
/// Edges are keyed by the `(account_id, track_id)` pair. Inserting and
/// deleting an edge are each atomic; nothing else is.
pub trait FavoritesStore: Send + Sync {
    /// Range query over every edge sharing the `account_id` prefix.
    fn get_favorite_track_ids(&self, account_id: &str) -> Result<Vec<String>, StoreError>;

    fn has_favorite(&self, account_id: &str, track_id: &str) -> Result<bool, StoreError>;

    /// Fails with `StoreError::DuplicateKey` if the edge already exists.
    fn insert_favorite(&self, account_id: &str, track_id: &str) -> Result<(), StoreError>;

    /// Returns Ok(false) if there was no such edge.
    fn delete_favorite(&self, account_id: &str, track_id: &str) -> Result<bool, StoreError>;
}
