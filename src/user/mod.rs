pub mod auth;
mod sqlite_user_store;
mod user_manager;
mod user_models;
mod user_store;

pub use auth::PasswordCredentials;
pub use sqlite_user_store::{SqliteUserStore, USER_VERSIONED_SCHEMAS};
pub use user_manager::AccountManager;
pub use user_models::{Account, AccountUpdate};
pub use user_store::AccountStore;
