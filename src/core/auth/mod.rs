//! Authentication for CampusConnect
//!
//! - Local signup, registration and login for every role
//! - Google and GitHub sign-in
//! - Session identity stored in a signed cookie session
//! - Short-lived API tokens for clients outside the browser

pub mod api;
pub mod jwt;
pub mod oauth;
pub mod password;
pub mod service;
pub mod session;

pub use api::{AuthApiState, auth_api_router};
pub use jwt::{ApiToken, Claims, JwtConfig, JwtError, JwtService};
pub use oauth::{IdentityProvider, OAuthError, OAuthProvider, OAuthProviders, ProviderProfile};
pub use password::{PasswordError, PasswordHasher};
pub use service::{
    AuthError, AuthOutcome, AuthService, LoginRequest, ProfileRequest, RegisterRequest,
    SignupRequest,
};
pub use session::{
    PendingRegistration, SessionIdentity, SessionLocks, SessionSettings, with_sessions,
};
