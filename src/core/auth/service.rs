//! Authentication service
//!
//! Validates input, coordinates the credential store and the password
//! hasher, and decides the next session identity and where to send the
//! browser. One rule set serves every role; `SignupRules` carries the
//! differences.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::core::Role;
use crate::core::auth::jwt::JwtError;
use crate::core::auth::oauth::ProviderProfile;
use crate::core::auth::password::{PasswordError, PasswordHasher};
use crate::core::auth::session::{PendingRegistration, SessionError, SessionIdentity};
use crate::core::db::models::{NewAccount, StudentProfile, UserAccount};
use crate::core::db::repositories::{CredentialStore, UserRepositoryError};
use crate::core::validation::{
    MAX_FIELD_LENGTH, SignupInput, SignupRules, ValidationError, join_messages, validate_contact,
    validate_email, validate_registration, validate_signup,
};

/// Where a student finishes signing up
pub const REGISTER_PATH: &str = "/register";

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This account signs in with Google or GitHub. Please use that option to log in.")]
    FederatedAccount,

    #[error("Please sign up before completing registration")]
    RegistrationNotStarted,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("This action is not available for your account")]
    Forbidden,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    fn validation(error: ValidationError) -> Self {
        AuthError::Validation(vec![error])
    }
}

impl From<UserRepositoryError> for AuthError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::EmailAlreadyExists => {
                AuthError::validation(ValidationError::EmailAlreadyExists)
            }
            UserRepositoryError::RollAlreadyExists => {
                AuthError::validation(ValidationError::RollTaken)
            }
            UserRepositoryError::SectionOutOfRange(_) => {
                AuthError::validation(ValidationError::InvalidSection)
            }
            UserRepositoryError::NotFound => AuthError::NotFound,
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::Internal(format!("session store: {}", err))
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            JwtError::InvalidToken | JwtError::DecodingError(_) => AuthError::InvalidToken,
            JwtError::EncodingError(_) => AuthError::Internal(err.to_string()),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Signup form. `phone` is only read for staff roles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: Option<String>,
}

impl SignupRequest {
    fn input(&self) -> SignupInput<'_> {
        SignupInput {
            name: self.name.trim(),
            email: self.email.trim(),
            password: &self.password,
            confirm_password: &self.confirm_password,
            phone: self.phone.as_deref().map(str::trim),
        }
    }
}

/// Registration form completing a student signup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub roll: String,
    pub section: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Contact details a student may change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub section: String,
    pub phone: String,
}

/// Next session identity and where to send the browser
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub identity: SessionIdentity,
    pub redirect: &'static str,
}

impl AuthOutcome {
    fn authenticated(account: UserAccount) -> Self {
        let redirect = account.role.dashboard_path();
        Self {
            identity: SessionIdentity::Authenticated(account),
            redirect,
        }
    }

    fn pending(pending: PendingRegistration) -> Self {
        Self {
            identity: SessionIdentity::PendingRegistration(pending),
            redirect: REGISTER_PATH,
        }
    }
}

// ============================================================================
// Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), AuthError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::validation(ValidationError::EmailAlreadyExists));
        }
        Ok(())
    }

    /// Student signup. Nothing is persisted until registration completes.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthOutcome, AuthError> {
        let input = request.input();
        validate_signup(&input, SignupRules::for_role(Role::Student))
            .map_err(AuthError::Validation)?;
        self.ensure_email_free(input.email).await?;

        let password_hash = self.hasher.hash(input.password).await?;

        Ok(AuthOutcome::pending(PendingRegistration {
            name: input.name.to_string(),
            email: input.email.to_string(),
            password_hash: Some(password_hash),
        }))
    }

    /// Complete a pending registration. This is the only path that creates
    /// student accounts; the store rejects a second account with the same
    /// email or roll number.
    pub async fn register(
        &self,
        current: &SessionIdentity,
        request: &RegisterRequest,
        current_year: i32,
    ) -> Result<AuthOutcome, AuthError> {
        let pending = current.pending().ok_or(AuthError::RegistrationNotStarted)?;

        let registration =
            validate_registration(&request.roll, &request.section, &request.phone, current_year)
                .map_err(AuthError::Validation)?;

        let roll = &registration.roll;
        let account = self
            .store
            .insert(NewAccount {
                role: Role::Student,
                name: pending.name.clone(),
                email: pending.email.clone(),
                password_hash: pending.password_hash.clone(),
                phone: Some(registration.phone.clone()),
                student: Some(StudentProfile {
                    roll: roll.raw.clone(),
                    section: registration.section,
                    branch: roll.branch(),
                    ug: roll.ug(current_year),
                    courses: Vec::new(),
                }),
            })
            .await?;

        tracing::info!("Student registered: {} ({})", account.email, roll.raw);

        Ok(AuthOutcome::authenticated(account))
    }

    /// Password login for one role. Unknown emails, accounts of another
    /// role and wrong passwords all fail the same way.
    pub async fn login(&self, role: Role, request: &LoginRequest) -> Result<AuthOutcome, AuthError> {
        let email = request.email.trim();

        let account = match self.store.find_by_email(email).await? {
            Some(account) if account.role == role => account,
            _ => {
                self.hasher.verify_dummy(&request.password).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let Some(password_hash) = account.password_hash.as_deref() else {
            return Err(AuthError::FederatedAccount);
        };

        if !self.hasher.verify(&request.password, password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AuthOutcome::authenticated(account))
    }

    /// Admin and professor signup: the student rules plus a phone number,
    /// persisted and authenticated in one step.
    pub async fn staff_signup(
        &self,
        role: Role,
        request: &SignupRequest,
    ) -> Result<AuthOutcome, AuthError> {
        if !role.is_staff() {
            return Err(AuthError::NotFound);
        }

        let input = request.input();
        validate_signup(&input, SignupRules::for_role(role)).map_err(AuthError::Validation)?;
        self.ensure_email_free(input.email).await?;

        let password_hash = self.hasher.hash(input.password).await?;
        let account = self
            .store
            .insert(NewAccount {
                role,
                name: input.name.to_string(),
                email: input.email.to_string(),
                password_hash: Some(password_hash),
                phone: input.phone.map(str::to_string),
                student: None,
            })
            .await?;

        tracing::info!("{} account created: {}", role.label(), account.email);

        Ok(AuthOutcome::authenticated(account))
    }

    /// Map a provider profile onto an existing account or a new pending
    /// registration without a password.
    pub async fn reconcile_oauth(&self, profile: ProviderProfile) -> Result<AuthOutcome, AuthError> {
        validate_email(&profile.email).map_err(AuthError::validation)?;

        match self.store.find_by_email(&profile.email).await? {
            Some(account) => Ok(AuthOutcome::authenticated(account)),
            None => Ok(AuthOutcome::pending(PendingRegistration {
                name: profile.name.chars().take(MAX_FIELD_LENGTH).collect(),
                email: profile.email,
                password_hash: None,
            })),
        }
    }

    /// Change section and phone of the signed-in student
    pub async fn update_contact(
        &self,
        current: &SessionIdentity,
        request: &ProfileRequest,
    ) -> Result<AuthOutcome, AuthError> {
        let account = current.account().ok_or(AuthError::NotAuthenticated)?;
        if account.role != Role::Student {
            return Err(AuthError::Forbidden);
        }

        let (section, phone) =
            validate_contact(&request.section, &request.phone).map_err(AuthError::Validation)?;

        let mut changed = account.clone();
        changed.phone = Some(phone);
        if let Some(profile) = changed.student.as_mut() {
            profile.section = section;
        }

        let saved = self.store.update(&changed).await?;
        Ok(AuthOutcome::authenticated(saved))
    }

    /// Re-read the session's account so pages see current data
    pub async fn refresh(&self, current: &SessionIdentity) -> Result<Option<UserAccount>, AuthError> {
        match current.account() {
            Some(account) => Ok(self.store.find_by_id(account.id).await?),
            None => Ok(None),
        }
    }

    pub async fn account_by_id(&self, id: Uuid) -> Result<UserAccount, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::models::Branch;
    use crate::core::testing::{MemoryCredentialStore, test_service};

    const YEAR: i32 = 2026;

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Asha Rao".to_string(),
            email: email.to_string(),
            password: "Secret1!".to_string(),
            confirm_password: "Secret1!".to_string(),
            phone: None,
        }
    }

    fn register_request(roll: &str) -> RegisterRequest {
        RegisterRequest {
            roll: roll.to_string(),
            section: "3".to_string(),
            phone: "9876543210".to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn registered_student(service: &AuthService, email: &str, roll: &str) -> UserAccount {
        let pending = service.signup(&signup_request(email)).await.unwrap();
        let outcome = service
            .register(&pending.identity, &register_request(roll), YEAR)
            .await
            .unwrap();
        outcome.identity.account().unwrap().clone()
    }

    // ========================================================================
    // Signup
    // ========================================================================

    #[tokio::test]
    async fn test_signup_leads_to_registration() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);

        let outcome = service.signup(&signup_request("asha@example.com")).await.unwrap();

        assert_eq!(outcome.redirect, "/register");
        let pending = outcome.identity.pending().unwrap();
        assert_eq!(pending.email, "asha@example.com");
        assert!(pending.password_hash.as_deref().unwrap().starts_with("$2"));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_signup_lists_every_password_rule() {
        let service = test_service(&MemoryCredentialStore::new());
        let mut request = signup_request("asha@example.com");
        request.password = "abc".to_string();
        request.confirm_password = "abc".to_string();

        let err = service.signup(&request).await.unwrap_err();
        let message = err.to_string();

        assert!(matches!(err, AuthError::Validation(ref e) if e.len() == 4));
        assert!(message.contains("at least 6 characters"));
        assert!(message.contains("uppercase"));
        assert!(message.contains("number"));
        assert!(message.contains("special character"));
    }

    #[tokio::test]
    async fn test_signup_rejects_existing_email() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);
        registered_student(&service, "asha@example.com", "S202310045").await;

        let err = service
            .signup(&signup_request("asha@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already exists");
    }

    // ========================================================================
    // Registration
    // ========================================================================

    #[tokio::test]
    async fn test_register_derives_branch_and_ug() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);

        let account = registered_student(&service, "asha@example.com", "S202310045").await;
        let profile = account.student.as_ref().unwrap();

        assert_eq!(profile.branch, Branch::Cse);
        assert_eq!(profile.ug, (YEAR - 2023).to_string());
        assert_eq!(profile.section, 3);
        assert!(profile.courses.is_empty());
        assert_eq!(account.phone.as_deref(), Some("9876543210"));
        assert!(!account.is_oauth());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_old_admission_year() {
        let service = test_service(&MemoryCredentialStore::new());
        let pending = service
            .signup(&signup_request("asha@example.com"))
            .await
            .unwrap();

        let err = service
            .register(&pending.identity, &register_request("S199910045"), YEAR)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("after 2000 and before 2026"));
    }

    #[tokio::test]
    async fn test_register_requires_pending_signup() {
        let service = test_service(&MemoryCredentialStore::new());

        let err = service
            .register(
                &SessionIdentity::Anonymous,
                &register_request("S202310045"),
                YEAR,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RegistrationNotStarted));
    }

    #[tokio::test]
    async fn test_only_one_registration_per_email_succeeds() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);

        let first = service.signup(&signup_request("asha@example.com")).await.unwrap();
        let second = service.signup(&signup_request("asha@example.com")).await.unwrap();

        service
            .register(&first.identity, &register_request("S202310045"), YEAR)
            .await
            .unwrap();
        let err = service
            .register(&second.identity, &register_request("S202310046"), YEAR)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already exists");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_roll_number_is_unique() {
        let service = test_service(&MemoryCredentialStore::new());
        registered_student(&service, "first@example.com", "S202310045").await;

        let pending = service
            .signup(&signup_request("second@example.com"))
            .await
            .unwrap();
        let err = service
            .register(&pending.identity, &register_request("S202310045"), YEAR)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Roll number is already registered"));
    }

    // ========================================================================
    // Login
    // ========================================================================

    #[tokio::test]
    async fn test_login_success() {
        let service = test_service(&MemoryCredentialStore::new());
        let account = registered_student(&service, "asha@example.com", "S202310045").await;

        let outcome = service
            .login(Role::Student, &login_request("asha@example.com", "Secret1!"))
            .await
            .unwrap();

        assert_eq!(outcome.redirect, "/dashboard");
        assert_eq!(outcome.identity.account().unwrap().id, account.id);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let service = test_service(&MemoryCredentialStore::new());
        registered_student(&service, "asha@example.com", "S202310045").await;

        let unknown = service
            .login(Role::Student, &login_request("nobody@example.com", "Secret1!"))
            .await
            .unwrap_err();
        let wrong = service
            .login(Role::Student, &login_request("asha@example.com", "Wrong1!x"))
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), "Invalid email or password");
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_login_wrong_role_is_invalid() {
        let service = test_service(&MemoryCredentialStore::new());
        registered_student(&service, "asha@example.com", "S202310045").await;

        let err = service
            .login(Role::Admin, &login_request("asha@example.com", "Secret1!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_oauth_account_cannot_use_password() {
        let service = test_service(&MemoryCredentialStore::new());
        let outcome = service
            .reconcile_oauth(ProviderProfile {
                name: "Asha".to_string(),
                email: "asha@gmail.com".to_string(),
            })
            .await
            .unwrap();
        service
            .register(&outcome.identity, &register_request("S202310045"), YEAR)
            .await
            .unwrap();

        let err = service
            .login(Role::Student, &login_request("asha@gmail.com", "Secret1!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::FederatedAccount));
        assert!(err.to_string().contains("Google or GitHub"));
    }

    // ========================================================================
    // OAuth reconciliation
    // ========================================================================

    #[tokio::test]
    async fn test_oauth_new_email_starts_registration() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);

        let outcome = service
            .reconcile_oauth(ProviderProfile {
                name: "Asha".to_string(),
                email: "asha@gmail.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.redirect, "/register");
        assert_eq!(outcome.identity.pending().unwrap().password_hash, None);

        let done = service
            .register(&outcome.identity, &register_request("S202310045"), YEAR)
            .await
            .unwrap();
        assert!(done.identity.account().unwrap().is_oauth());
    }

    #[tokio::test]
    async fn test_oauth_long_provider_name_is_shortened() {
        let service = test_service(&MemoryCredentialStore::new());
        let outcome = service
            .reconcile_oauth(ProviderProfile {
                name: "a".repeat(300),
                email: "asha@gmail.com".to_string(),
            })
            .await
            .unwrap();

        let pending = outcome.identity.pending().unwrap();
        assert_eq!(pending.name.chars().count(), MAX_FIELD_LENGTH);
    }

    #[tokio::test]
    async fn test_oauth_rejects_oversized_email() {
        let service = test_service(&MemoryCredentialStore::new());
        let err = service
            .reconcile_oauth(ProviderProfile {
                name: "Asha".to_string(),
                email: format!("{}@gmail.com", "a".repeat(250)),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_huge_section() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);
        let pending = service
            .signup(&signup_request("asha@example.com"))
            .await
            .unwrap();

        let mut request = register_request("S202310045");
        request.section = "3000000000".to_string();
        let err = service
            .register(&pending.identity, &request, YEAR)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Section must be a positive integer");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_signup_rejects_overlong_name() {
        let service = test_service(&MemoryCredentialStore::new());
        let mut request = signup_request("asha@example.com");
        request.name = "a".repeat(300);

        let err = service.signup(&request).await.unwrap_err();
        assert!(err.to_string().contains("at most 255 characters"));
    }

    #[tokio::test]
    async fn test_oauth_existing_email_is_authenticated() {
        let service = test_service(&MemoryCredentialStore::new());
        let account = registered_student(&service, "asha@example.com", "S202310045").await;

        let outcome = service
            .reconcile_oauth(ProviderProfile {
                name: "Someone Else".to_string(),
                email: "asha@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.redirect, "/dashboard");
        assert_eq!(outcome.identity.account().unwrap().id, account.id);
    }

    // ========================================================================
    // Staff
    // ========================================================================

    #[tokio::test]
    async fn test_admin_signup_and_login() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);
        let mut request = signup_request("admin@example.com");
        request.phone = Some("9876543210".to_string());

        let outcome = service.staff_signup(Role::Admin, &request).await.unwrap();
        assert_eq!(outcome.redirect, "/admin/dashboard");
        assert!(outcome.identity.account().unwrap().student.is_none());
        assert_eq!(store.len(), 1);

        let outcome = service
            .login(Role::Admin, &login_request("admin@example.com", "Secret1!"))
            .await
            .unwrap();
        assert_eq!(outcome.redirect, "/admin/dashboard");
    }

    #[tokio::test]
    async fn test_admin_login_checks_password() {
        let service = test_service(&MemoryCredentialStore::new());
        let mut request = signup_request("admin@example.com");
        request.phone = Some("9876543210".to_string());
        service.staff_signup(Role::Admin, &request).await.unwrap();

        let err = service
            .login(Role::Admin, &login_request("admin@example.com", "Nope12!x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_staff_signup_uses_full_rules() {
        let service = test_service(&MemoryCredentialStore::new());
        let mut request = signup_request("prof@example.com");
        request.password = "weak".to_string();
        request.confirm_password = "weak".to_string();
        request.phone = Some("9876543210".to_string());

        let err = service
            .staff_signup(Role::Professor, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        request.password = "Secret1!".to_string();
        request.confirm_password = "Secret1!".to_string();
        request.phone = Some("12345".to_string());
        let err = service
            .staff_signup(Role::Professor, &request)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Phone number must be exactly 10 digits");
    }

    #[tokio::test]
    async fn test_professor_lands_on_own_dashboard() {
        let service = test_service(&MemoryCredentialStore::new());
        let mut request = signup_request("prof@example.com");
        request.phone = Some("9876543210".to_string());

        let outcome = service
            .staff_signup(Role::Professor, &request)
            .await
            .unwrap();
        assert_eq!(outcome.redirect, "/professor/dashboard");
    }

    // ========================================================================
    // Profile
    // ========================================================================

    #[tokio::test]
    async fn test_update_contact() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);
        let account = registered_student(&service, "asha@example.com", "S202310045").await;
        let identity = SessionIdentity::Authenticated(account);

        let outcome = service
            .update_contact(
                &identity,
                &ProfileRequest {
                    section: "5".to_string(),
                    phone: "1234567890".to_string(),
                },
            )
            .await
            .unwrap();

        let saved = outcome.identity.account().unwrap();
        assert_eq!(saved.phone.as_deref(), Some("1234567890"));
        assert_eq!(saved.student.as_ref().unwrap().section, 5);
        assert_eq!(saved.student.as_ref().unwrap().roll, "S202310045");
        assert_eq!(store.snapshot()[0].student.as_ref().unwrap().section, 5);
    }

    #[tokio::test]
    async fn test_update_contact_requires_login() {
        let service = test_service(&MemoryCredentialStore::new());
        let err = service
            .update_contact(&SessionIdentity::Anonymous, &ProfileRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_refresh_reads_store() {
        let store = MemoryCredentialStore::new();
        let service = test_service(&store);
        let account = registered_student(&service, "asha@example.com", "S202310045").await;

        let refreshed = service
            .refresh(&SessionIdentity::Authenticated(account.clone()))
            .await
            .unwrap();
        assert_eq!(refreshed.unwrap().id, account.id);
        assert!(
            service
                .refresh(&SessionIdentity::Anonymous)
                .await
                .unwrap()
                .is_none()
        );
    }
}
