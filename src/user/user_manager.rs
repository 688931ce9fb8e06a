use super::auth::PasswordCredentials;
use super::user_models::{Account, AccountUpdate};
use super::user_store::AccountStore;
use crate::error::{CatalogError, CatalogResult, StoreError};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Registration, login and profile management, keyed by email.
pub struct AccountManager {
    store: Arc<dyn AccountStore>,
}

fn hashing_failed(err: anyhow::Error) -> CatalogError {
    CatalogError::StorageUnavailable(format!("credential hashing failed: {}", err))
}

fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn require_non_empty(value: &str, what: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidArgument(format!(
            "{} cannot be empty",
            what
        )));
    }
    Ok(())
}

impl AccountManager {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        AccountManager { store }
    }

    pub fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> CatalogResult<Account> {
        require_non_empty(email, "email")?;
        require_non_empty(display_name, "display name")?;
        require_non_empty(password, "password")?;

        if self.store.get_account_by_email(email)?.is_some() {
            return Err(CatalogError::Conflict(format!(
                "email {} is already registered",
                email
            )));
        }

        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            created: now_unix_secs(),
        };
        let credentials = PasswordCredentials::create(password).map_err(hashing_failed)?;
        match self.store.create_account(&account, &credentials) {
            Ok(()) => {
                info!("Registered account {} ({})", account.id, account.email);
                Ok(account)
            }
            Err(StoreError::DuplicateKey(_)) => Err(CatalogError::Conflict(format!(
                "email {} is already registered",
                email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub fn login(&self, email: &str, password: &str) -> CatalogResult<Account> {
        let account = self.get_account(email)?;
        let credentials = self
            .store
            .get_account_credentials(&account.id)?
            .ok_or_else(|| CatalogError::NotFound(format!("account {}", email)))?;
        if credentials.verify(password).map_err(hashing_failed)? {
            Ok(account)
        } else {
            warn!("Failed login for {}", email);
            Err(CatalogError::InvalidCredentials)
        }
    }

    /// Email to account id, through the store's secondary index.
    pub fn resolve_account_id(&self, email: &str) -> CatalogResult<String> {
        Ok(self.get_account(email)?.id)
    }

    pub fn get_account(&self, email: &str) -> CatalogResult<Account> {
        self.store
            .get_account_by_email(email)?
            .ok_or_else(|| CatalogError::NotFound(format!("account {}", email)))
    }

    pub fn list_accounts(&self) -> CatalogResult<Vec<Account>> {
        Ok(self.store.list_accounts()?)
    }

    /// Validates and hashes everything first, then writes all changes at once.
    pub fn update_account(&self, email: &str, update: AccountUpdate) -> CatalogResult<Account> {
        let account = self.get_account(email)?;
        if let Some(display_name) = update.display_name.as_deref() {
            require_non_empty(display_name, "display name")?;
        }
        let credentials = match update.password.as_deref() {
            Some(password) => {
                require_non_empty(password, "password")?;
                Some(PasswordCredentials::create(password).map_err(hashing_failed)?)
            }
            None => None,
        };
        self.store.update_account(
            &account.id,
            update.display_name.as_deref(),
            credentials.as_ref(),
        )?;
        self.store
            .get_account(&account.id)?
            .ok_or_else(|| CatalogError::NotFound(format!("account {}", email)))
    }

    /// Deletes the account and every favorite it owns.
    pub fn delete_account(&self, email: &str) -> CatalogResult<()> {
        let account = self.get_account(email)?;
        if !self.store.delete_account(&account.id)? {
            return Err(CatalogError::NotFound(format!("account {}", email)));
        }
        info!("Deleted account {} ({})", account.id, account.email);
        Ok(())
    }
}
