use serde::Serialize;

/// A registered account, as exposed outside the user module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// Unix timestamp, seconds.
    pub created: i64,
}

/// Partial update of an account. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct AccountUpdate {
    pub display_name: Option<String>,
    pub password: Option<String>,
}
