//! Persistence for CampusConnect accounts
//!
//! The rest of the crate talks to the `CredentialStore` trait; the Postgres
//! `UserRepository` is the production implementation.

pub mod models;
pub mod pool;
pub mod repositories;

pub use models::{AccountResponse, Branch, NewAccount, StudentProfile, UserAccount};
pub use pool::{DbConfig, DbError, connect};
pub use repositories::{CredentialStore, UserRepository, UserRepositoryError};

pub use sqlx::PgPool;
