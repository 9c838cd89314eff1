//! Test doubles shared by unit and flow tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::auth::password::PasswordHasher;
use crate::core::auth::service::AuthService;
use crate::core::db::models::{NewAccount, UserAccount};
use crate::core::db::repositories::{CredentialStore, UserRepositoryError};

/// In-memory credential store with the same uniqueness rules as the table
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    accounts: Arc<Mutex<Vec<UserAccount>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> Vec<UserAccount> {
        self.accounts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, UserRepositoryError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<UserAccount, UserRepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.iter().any(|a| a.email == account.email) {
            return Err(UserRepositoryError::EmailAlreadyExists);
        }
        let roll = account.student.as_ref().map(|s| s.roll.as_str());
        if roll.is_some()
            && accounts
                .iter()
                .any(|a| a.student.as_ref().map(|s| s.roll.as_str()) == roll)
        {
            return Err(UserRepositoryError::RollAlreadyExists);
        }

        let now = Utc::now();
        let stored = UserAccount {
            id: Uuid::new_v4(),
            role: account.role,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            phone: account.phone,
            student: account.student,
            created_at: now,
            updated_at: now,
        };
        accounts.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, account: &UserAccount) -> Result<UserAccount, UserRepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        let stored = accounts
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or(UserRepositoryError::NotFound)?;

        stored.name = account.name.clone();
        stored.phone = account.phone.clone();
        if let (Some(current), Some(changed)) = (stored.student.as_mut(), account.student.as_ref()) {
            current.section = changed.section;
            current.courses = changed.courses.clone();
        }
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }
}

/// Cheap bcrypt cost so tests stay fast
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_cost(4).unwrap()
}

pub fn test_service(store: &MemoryCredentialStore) -> AuthService {
    AuthService::new(Arc::new(store.clone()), test_hasher())
}
