//! Password credentials, stored as argon2 PHC strings.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Stored secret of an account. Never leaves the user module.
///
/// The PHC string carries algorithm, parameters and salt next to the hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordCredentials {
    phc_hash: String,
}

impl PasswordCredentials {
    pub fn create(password: &str) -> Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let phc_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string();
        Ok(PasswordCredentials { phc_hash })
    }

    pub fn from_stored(phc_hash: String) -> Self {
        PasswordCredentials { phc_hash }
    }

    pub fn as_stored(&self) -> &str {
        &self.phc_hash
    }

    /// Errors only when the stored hash is not a valid PHC string.
    pub fn verify(&self, password: &str) -> Result<bool> {
        let password_hash = PasswordHash::new(&self.phc_hash).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &password_hash)
            .is_ok())
    }
}
