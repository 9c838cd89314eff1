//! Database repositories for CampusConnect

pub mod user;

pub use user::{CredentialStore, UserRepository, UserRepositoryError};
