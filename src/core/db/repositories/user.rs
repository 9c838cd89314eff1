//! Credential store
//!
//! `CredentialStore` is the persistence seam the auth orchestrator works
//! against. Uniqueness of email and roll number is enforced by the database
//! at insert time, so two racing registrations cannot both succeed.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::core::db::models::{NewAccount, StudentProfile, UserAccount, UserRow};

const USER_COLUMNS: &str = "id, role, name, email, password_hash, is_oauth, phone, roll, \
     section, branch, ug, courses, created_at, updated_at";

/// User repository error types
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Roll number already exists")]
    RollAlreadyExists,

    #[error("Section {0} does not fit the section column")]
    SectionOutOfRange(u32),

    #[error("Stored record is invalid: {0}")]
    CorruptRecord(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Persistence of user accounts keyed by email
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Persist a new account. Fails with `EmailAlreadyExists` or
    /// `RollAlreadyExists` when another account already holds the key.
    async fn insert(&self, account: NewAccount) -> Result<UserAccount, UserRepositoryError>;

    /// Save mutable fields (name, phone, section, courses).
    /// Email, role, roll and password are never changed here.
    async fn update(&self, account: &UserAccount) -> Result<UserAccount, UserRepositoryError>;
}

/// Postgres-backed credential store
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_account(row: UserRow) -> Result<UserAccount, UserRepositoryError> {
        UserAccount::try_from(row).map_err(|e| {
            tracing::error!("{}", e);
            UserRepositoryError::CorruptRecord(e.to_string())
        })
    }
}

/// Section as stored in the `INTEGER` column
fn section_column(profile: &StudentProfile) -> Result<i32, UserRepositoryError> {
    i32::try_from(profile.section).map_err(|_| UserRepositoryError::SectionOutOfRange(profile.section))
}

/// Map an insert failure onto the key that was already taken
fn map_insert_error(err: sqlx::Error) -> UserRepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some("users_email_key") => return UserRepositoryError::EmailAlreadyExists,
            Some("users_roll_key") => return UserRepositoryError::RollAlreadyExists,
            _ => {}
        }
    }
    UserRepositoryError::DatabaseError(err)
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::into_account).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, UserRepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::into_account).transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<UserAccount, UserRepositoryError> {
        let student = account.student.as_ref();
        let courses = student.map(|s| s.courses.clone()).unwrap_or_default();
        let section = student.map(section_column).transpose()?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users
                (role, name, email, password_hash, is_oauth, phone, roll, section, branch, ug, courses)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(account.role)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.password_hash.is_none())
        .bind(&account.phone)
        .bind(student.map(|s| s.roll.as_str()))
        .bind(section)
        .bind(student.map(|s| s.branch.as_str()))
        .bind(student.map(|s| s.ug.as_str()))
        .bind(Json(courses))
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Self::into_account(row)
    }

    async fn update(&self, account: &UserAccount) -> Result<UserAccount, UserRepositoryError> {
        let student = account.student.as_ref();
        let section = student.map(section_column).transpose()?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = $2,
                phone = $3,
                section = COALESCE($4, section),
                courses = COALESCE($5, courses),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.phone)
        .bind(section)
        .bind(student.map(|s| Json(s.courses.clone())))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(UserRepositoryError::NotFound)?;

        Self::into_account(row)
    }
}
