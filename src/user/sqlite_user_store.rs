use super::auth::PasswordCredentials;
use super::user_models::Account;
use super::user_store::AccountStore;
use crate::error::StoreError;
use crate::favorites::FavoritesStore;
use crate::sqlite_column;
use crate::sqlite_persistence::{
    lock_conn, open_versioned_db, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// V 0
const ACCOUNT_TABLE_V_0: Table = Table {
    name: "account",
    columns: &[
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, non_null = true),
        sqlite_column!("display_name", &SqlType::Text, non_null = true),
        sqlite_column!("password_hash", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    primary_key: &["id"],
    indices: &[],
    unique_constraints: &[&["email"]],
};

// No foreign keys: the existence of both ends is checked by the caller.
const FAVORITE_TABLE_V_0: Table = Table {
    name: "favorite",
    columns: &[
        sqlite_column!("account_id", &SqlType::Text, non_null = true),
        sqlite_column!("track_id", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    primary_key: &["account_id", "track_id"],
    indices: &[],
    unique_constraints: &[],
};

pub const USER_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ACCOUNT_TABLE_V_0, FAVORITE_TABLE_V_0],
    migration: None,
}];

const ACCOUNT_COLUMNS: &str = "id, email, display_name, created";

#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, USER_VERSIONED_SCHEMAS)?;
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn account_from_row(row: &Row) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        created: row.get(3)?,
    })
}

impl AccountStore for SqliteUserStore {
    fn create_account(
        &self,
        account: &Account,
        credentials: &PasswordCredentials,
    ) -> Result<(), StoreError> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, password_hash) VALUES (?1, ?2, ?3, ?4, ?5)",
                ACCOUNT_TABLE_V_0.name, ACCOUNT_COLUMNS
            ),
            params![
                account.id,
                account.email,
                account.display_name,
                account.created,
                credentials.as_stored()
            ],
        )?;
        Ok(())
    }

    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let conn = lock_conn(&self.conn)?;
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE email = ?1",
                    ACCOUNT_COLUMNS, ACCOUNT_TABLE_V_0.name
                ),
                params![email],
                account_from_row,
            )
            .optional()?)
    }

    fn get_account(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        let conn = lock_conn(&self.conn)?;
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE id = ?1",
                    ACCOUNT_COLUMNS, ACCOUNT_TABLE_V_0.name
                ),
                params![account_id],
                account_from_row,
            )
            .optional()?)
    }

    fn get_account_credentials(
        &self,
        account_id: &str,
    ) -> Result<Option<PasswordCredentials>, StoreError> {
        let conn = lock_conn(&self.conn)?;
        Ok(conn
            .query_row(
                &format!(
                    "SELECT password_hash FROM {} WHERE id = ?1",
                    ACCOUNT_TABLE_V_0.name
                ),
                params![account_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .map(PasswordCredentials::from_stored))
    }

    fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY email",
            ACCOUNT_COLUMNS, ACCOUNT_TABLE_V_0.name
        ))?;
        let accounts = stmt
            .query_map([], account_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    fn update_account(
        &self,
        account_id: &str,
        display_name: Option<&str>,
        credentials: Option<&PasswordCredentials>,
    ) -> Result<(), StoreError> {
        let mut conn = lock_conn(&self.conn)?;
        let tx = conn.transaction()?;
        let exists = tx
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1", ACCOUNT_TABLE_V_0.name),
                params![account_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::ResourceNotFound(format!("account {}", account_id)));
        }
        if let Some(display_name) = display_name {
            tx.execute(
                &format!(
                    "UPDATE {} SET display_name = ?1 WHERE id = ?2",
                    ACCOUNT_TABLE_V_0.name
                ),
                params![display_name, account_id],
            )?;
        }
        if let Some(credentials) = credentials {
            tx.execute(
                &format!(
                    "UPDATE {} SET password_hash = ?1 WHERE id = ?2",
                    ACCOUNT_TABLE_V_0.name
                ),
                params![credentials.as_stored(), account_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_account(&self, account_id: &str) -> Result<bool, StoreError> {
        let mut conn = lock_conn(&self.conn)?;
        let tx = conn.transaction()?;
        tx.execute(
            &format!(
                "DELETE FROM {} WHERE account_id = ?1",
                FAVORITE_TABLE_V_0.name
            ),
            params![account_id],
        )?;
        let deleted = tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", ACCOUNT_TABLE_V_0.name),
            params![account_id],
        )?;
        tx.commit()?;
        Ok(deleted > 0)
    }
}

impl FavoritesStore for SqliteUserStore {
    fn get_favorite_track_ids(&self, account_id: &str) -> Result<Vec<String>, StoreError> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT track_id FROM {} WHERE account_id = ?1",
            FAVORITE_TABLE_V_0.name
        ))?;
        let ids = stmt
            .query_map(params![account_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    fn has_favorite(&self, account_id: &str, track_id: &str) -> Result<bool, StoreError> {
        let conn = lock_conn(&self.conn)?;
        Ok(conn
            .query_row(
                &format!(
                    "SELECT 1 FROM {} WHERE account_id = ?1 AND track_id = ?2",
                    FAVORITE_TABLE_V_0.name
                ),
                params![account_id, track_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }

    fn insert_favorite(&self, account_id: &str, track_id: &str) -> Result<(), StoreError> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO {} (account_id, track_id) VALUES (?1, ?2)",
                FAVORITE_TABLE_V_0.name
            ),
            params![account_id, track_id],
        )?;
        Ok(())
    }

    fn delete_favorite(&self, account_id: &str, track_id: &str) -> Result<bool, StoreError> {
        let conn = lock_conn(&self.conn)?;
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE account_id = ?1 AND track_id = ?2",
                FAVORITE_TABLE_V_0.name
            ),
            params![account_id, track_id],
        )?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteUserStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteUserStore::new(temp_dir.path().join("user.db")).unwrap();
        (store, temp_dir)
    }

    fn account(id: &str, email: &str) -> Account {
        Account {
            id: id.to_string(),
            email: email.to_string(),
            display_name: format!("name of {}", id),
            created: 1_700_000_000,
        }
    }

    fn credentials() -> PasswordCredentials {
        PasswordCredentials::from_stored("$argon2id$v=19$stub".to_string())
    }

    #[test]
    fn creates_and_reads_accounts() {
        let (store, _dir) = create_tmp_store();
        store
            .create_account(&account("u1", "one@example.com"), &credentials())
            .unwrap();

        assert_eq!(
            store.get_account("u1").unwrap(),
            Some(account("u1", "one@example.com"))
        );
        assert_eq!(
            store
                .get_account_by_email("one@example.com")
                .unwrap()
                .map(|a| a.id),
            Some("u1".to_string())
        );
        assert!(store.get_account_by_email("two@example.com").unwrap().is_none());
        assert_eq!(store.get_account_credentials("u1").unwrap(), Some(credentials()));
        assert!(store.get_account_credentials("u2").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_duplicate_key() {
        let (store, _dir) = create_tmp_store();
        store
            .create_account(&account("u1", "one@example.com"), &credentials())
            .unwrap();
        let result = store.create_account(&account("u2", "one@example.com"), &credentials());
        assert!(matches!(result, Err(StoreError::DuplicateKey(_))));
        assert_eq!(store.list_accounts().unwrap().len(), 1);
    }

    #[test]
    fn updates_accounts() {
        let (store, _dir) = create_tmp_store();
        store
            .create_account(&account("u1", "one@example.com"), &credentials())
            .unwrap();

        store.update_account("u1", Some("New Name"), None).unwrap();
        assert_eq!(store.get_account("u1").unwrap().unwrap().display_name, "New Name");
        assert_eq!(store.get_account_credentials("u1").unwrap(), Some(credentials()));

        let new_credentials = PasswordCredentials::from_stored("$argon2id$v=19$other".to_string());
        store
            .update_account("u1", Some("Newer Name"), Some(&new_credentials))
            .unwrap();
        assert_eq!(
            store.get_account("u1").unwrap().unwrap().display_name,
            "Newer Name"
        );
        assert_eq!(
            store.get_account_credentials("u1").unwrap(),
            Some(new_credentials)
        );

        assert!(matches!(
            store.update_account("nope", Some("x"), None),
            Err(StoreError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn favorite_edges_are_unique_per_pair() {
        let (store, _dir) = create_tmp_store();
        store.insert_favorite("u1", "t1").unwrap();
        store.insert_favorite("u1", "t2").unwrap();
        store.insert_favorite("u2", "t1").unwrap();
        assert!(matches!(
            store.insert_favorite("u1", "t1"),
            Err(StoreError::DuplicateKey(_))
        ));

        let mut ids = store.get_favorite_track_ids("u1").unwrap();
        ids.sort();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert!(store.has_favorite("u2", "t1").unwrap());
        assert!(!store.has_favorite("u2", "t2").unwrap());

        assert!(store.delete_favorite("u1", "t1").unwrap());
        assert!(!store.delete_favorite("u1", "t1").unwrap());
    }

    #[test]
    fn deleting_an_account_drops_its_favorites() {
        let (store, _dir) = create_tmp_store();
        store
            .create_account(&account("u1", "one@example.com"), &credentials())
            .unwrap();
        store.insert_favorite("u1", "t1").unwrap();
        store.insert_favorite("u2", "t1").unwrap();

        assert!(store.delete_account("u1").unwrap());
        assert!(store.get_account("u1").unwrap().is_none());
        assert!(store.get_favorite_track_ids("u1").unwrap().is_empty());
        assert_eq!(store.get_favorite_track_ids("u2").unwrap(), vec!["t1"]);
        assert!(!store.delete_account("u1").unwrap());
    }

    #[test]
    fn reopens_existing_database() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user.db");
        {
            let store = SqliteUserStore::new(&path).unwrap();
            store.insert_favorite("u1", "t1").unwrap();
        }
        let store = SqliteUserStore::new(&path).unwrap();
        assert_eq!(store.get_favorite_track_ids("u1").unwrap(), vec!["t1"]);
    }
}
