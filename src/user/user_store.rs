use super::auth::PasswordCredentials;
use super::user_models::Account;
use crate::error::StoreError;

pub trait AccountStore: Send + Sync {
    /// Creates a new account with its credentials.
    /// Fails with `StoreError::DuplicateKey` if the id or the email is taken.
    fn create_account(
        &self,
        account: &Account,
        credentials: &PasswordCredentials,
    ) -> Result<(), StoreError>;

    /// Secondary index lookup.
    /// Returns Ok(None) if no account has the given email.
    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Returns Ok(None) if the account does not exist.
    fn get_account(&self, account_id: &str) -> Result<Option<Account>, StoreError>;

    /// Returns Ok(None) if the account does not exist.
    fn get_account_credentials(
        &self,
        account_id: &str,
    ) -> Result<Option<PasswordCredentials>, StoreError>;

    fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Applies the given changes in one transaction. `None` leaves a field
    /// unchanged.
    /// Fails with `StoreError::ResourceNotFound` if the account does not exist.
    fn update_account(
        &self,
        account_id: &str,
        display_name: Option<&str>,
        credentials: Option<&PasswordCredentials>,
    ) -> Result<(), StoreError>;

    /// Deletes the account together with its favorite edges.
    /// Returns Ok(false) if the account did not exist.
    fn delete_account(&self, account_id: &str) -> Result<bool, StoreError>;
}
