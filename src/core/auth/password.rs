//! Password hashing
//!
//! bcrypt is CPU bound, so hashing and verification run on the blocking pool
//! instead of stalling the request executor.

use std::sync::Arc;

/// Cost factor for bcrypt hashing
pub const BCRYPT_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Salted one-way password hasher
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Verified against when the account is unknown, so a miss costs the
    /// same as a wrong password
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub fn new() -> Result<Self, PasswordError> {
        Self::with_cost(BCRYPT_COST)
    }

    pub fn with_cost(cost: u32) -> Result<Self, PasswordError> {
        let dummy_hash = bcrypt::hash("campusconnect-dummy-password", cost)?;
        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(valid)
    }

    /// Burn one verification for an account that does not exist
    pub async fn verify_dummy(&self, password: &str) -> Result<(), PasswordError> {
        let dummy = self.dummy_hash.clone();
        self.verify(password, &dummy).await.map(|_| ())
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}
