//! Auth API endpoints
//!
//! Form posts from the server-rendered pages land here. Success is always a
//! `302 Found` to the next page; validation and credential failures are
//! `400` with a JSON `{message, code}` body.
//!
//! - POST /auth/signup, /auth/register, /auth/login, /auth/logout, /auth/profile
//! - POST /auth/admin/signup, /auth/admin/login
//! - POST /auth/professor/signup, /auth/professor/login
//! - GET /auth/google, /auth/github and their /callback routes
//! - POST /auth/token, GET /auth/me for bearer-token clients

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Datelike;
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;

use crate::core::Role;
use crate::core::auth::jwt::{ApiToken, JwtService};
use crate::core::auth::oauth::{
    AUTHORIZATION_KEY, CallbackParams, IdentityProvider, OAuthError, OAuthProvider,
    OAuthProviders, PendingAuthorization, ProviderProfile,
};
use crate::core::auth::service::{
    AuthError, AuthOutcome, AuthService, LoginRequest, ProfileRequest, RegisterRequest,
    SignupRequest,
};
use crate::core::auth::session::{SessionLocks, clear_identity, load_identity, store_identity};
use crate::core::db::models::AccountResponse;

/// Shared state of the auth routes and the page server functions
#[derive(Clone)]
pub struct AuthApiState {
    pub auth_service: AuthService,
    pub oauth: OAuthProviders,
    pub jwt_service: JwtService,
    pub session_locks: SessionLocks,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub code: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Convert AuthError to API response
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AuthError::InvalidCredentials => (StatusCode::BAD_REQUEST, "INVALID_CREDENTIALS"),
            AuthError::FederatedAccount => (StatusCode::BAD_REQUEST, "FEDERATED_ACCOUNT"),
            AuthError::RegistrationNotStarted => {
                (StatusCode::BAD_REQUEST, "REGISTRATION_NOT_STARTED")
            }
            AuthError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AuthError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let message = match &self {
            AuthError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ApiError::new(message, code))).into_response()
    }
}

/// `302 Found` to `location`
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Create the auth API router
pub fn auth_api_router(state: Arc<AuthApiState>) -> Router {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/profile", post(profile_handler))
        .route("/auth/admin/signup", post(admin_signup_handler))
        .route("/auth/admin/login", post(admin_login_handler))
        .route("/auth/professor/signup", post(professor_signup_handler))
        .route("/auth/professor/login", post(professor_login_handler))
        .route("/auth/google", get(google_start_handler))
        .route("/auth/google/callback", get(google_callback_handler))
        .route("/auth/github", get(github_start_handler))
        .route("/auth/github/callback", get(github_callback_handler))
        .route("/auth/token", post(token_handler))
        .route("/auth/me", get(me_handler))
        .with_state(state)
}

/// Persist the next identity and send the browser on
async fn apply(session: &Session, outcome: AuthOutcome) -> Result<Response, AuthError> {
    store_identity(session, &outcome.identity).await?;
    Ok(found(outcome.redirect))
}

// ============================================================================
// Students
// ============================================================================

/// POST /auth/signup
async fn signup_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<SignupRequest>,
) -> Result<Response, AuthError> {
    let _guard = state.session_locks.acquire(&session).await;
    tracing::info!("Signup attempt for email: {}", request.email);

    let outcome = state.auth_service.signup(&request).await?;
    apply(&session, outcome).await
}

/// POST /auth/register
async fn register_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<RegisterRequest>,
) -> Result<Response, AuthError> {
    let _guard = state.session_locks.acquire(&session).await;
    let current = load_identity(&session).await?;
    tracing::info!("Registration attempt for roll: {}", request.roll);

    let current_year = chrono::Utc::now().year();
    let outcome = state
        .auth_service
        .register(&current, &request, current_year)
        .await?;
    apply(&session, outcome).await
}

/// POST /auth/login
async fn login_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<LoginRequest>,
) -> Result<Response, AuthError> {
    login_as(Role::Student, &state, &session, &request).await
}

/// POST /auth/profile
async fn profile_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<ProfileRequest>,
) -> Result<Response, AuthError> {
    let _guard = state.session_locks.acquire(&session).await;
    let current = load_identity(&session).await?;

    let outcome = state.auth_service.update_contact(&current, &request).await?;
    apply(&session, outcome).await
}

/// POST /auth/logout
async fn logout_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
) -> Result<Response, AuthError> {
    let _guard = state.session_locks.acquire(&session).await;
    clear_identity(&session).await?;
    Ok(found("/"))
}

// ============================================================================
// Staff
// ============================================================================

async fn login_as(
    role: Role,
    state: &AuthApiState,
    session: &Session,
    request: &LoginRequest,
) -> Result<Response, AuthError> {
    let _guard = state.session_locks.acquire(session).await;
    tracing::info!("{} login attempt for email: {}", role.label(), request.email);

    let outcome = state.auth_service.login(role, request).await?;

    tracing::info!("{} logged in: {}", role.label(), request.email.trim());
    apply(session, outcome).await
}

async fn staff_signup_as(
    role: Role,
    state: &AuthApiState,
    session: &Session,
    request: &SignupRequest,
) -> Result<Response, AuthError> {
    let _guard = state.session_locks.acquire(session).await;
    tracing::info!("{} signup attempt for email: {}", role.label(), request.email);

    let outcome = state.auth_service.staff_signup(role, request).await?;
    apply(session, outcome).await
}

/// POST /auth/admin/signup
async fn admin_signup_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<SignupRequest>,
) -> Result<Response, AuthError> {
    staff_signup_as(Role::Admin, &state, &session, &request).await
}

/// POST /auth/admin/login
async fn admin_login_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<LoginRequest>,
) -> Result<Response, AuthError> {
    login_as(Role::Admin, &state, &session, &request).await
}

/// POST /auth/professor/signup
async fn professor_signup_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<SignupRequest>,
) -> Result<Response, AuthError> {
    staff_signup_as(Role::Professor, &state, &session, &request).await
}

/// POST /auth/professor/login
async fn professor_login_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Form(request): Form<LoginRequest>,
) -> Result<Response, AuthError> {
    login_as(Role::Professor, &state, &session, &request).await
}

// ============================================================================
// OAuth
// ============================================================================

async fn oauth_start(
    provider: OAuthProvider,
    state: &AuthApiState,
    session: &Session,
) -> Result<Response, AuthError> {
    let client = state.oauth.get(provider).ok_or(AuthError::NotFound)?;
    let _guard = state.session_locks.acquire(session).await;

    let (url, pending) = client.authorize();
    session.insert(AUTHORIZATION_KEY, &pending).await?;

    tracing::debug!("Redirecting to {} for sign-in", provider);
    Ok(found(&url))
}

async fn oauth_callback(
    provider: OAuthProvider,
    state: &AuthApiState,
    session: &Session,
    params: CallbackParams,
) -> Result<Response, AuthError> {
    let client = state.oauth.get(provider).ok_or(AuthError::NotFound)?;
    let _guard = state.session_locks.acquire(session).await;

    let pending: Option<PendingAuthorization> = session.remove(AUTHORIZATION_KEY).await?;
    let profile = match exchange(client.as_ref(), provider, pending, params).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("{} sign-in failed: {}", provider, e);
            return Ok(found("/"));
        }
    };

    tracing::info!("{} sign-in for email: {}", provider, profile.email);
    let outcome = state.auth_service.reconcile_oauth(profile).await?;
    apply(session, outcome).await
}

async fn exchange(
    client: &dyn IdentityProvider,
    provider: OAuthProvider,
    pending: Option<PendingAuthorization>,
    params: CallbackParams,
) -> Result<ProviderProfile, OAuthError> {
    let (code, csrf_state) = params.into_grant()?;
    let pending = pending.ok_or(OAuthError::NoPendingAuthorization(provider))?;
    pending.check(provider, &csrf_state)?;
    client.exchange(code, pending).await
}

/// GET /auth/google
async fn google_start_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
) -> Result<Response, AuthError> {
    oauth_start(OAuthProvider::Google, &state, &session).await
}

/// GET /auth/google/callback
async fn google_callback_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AuthError> {
    oauth_callback(OAuthProvider::Google, &state, &session, params).await
}

/// GET /auth/github
async fn github_start_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
) -> Result<Response, AuthError> {
    oauth_start(OAuthProvider::GitHub, &state, &session).await
}

/// GET /auth/github/callback
async fn github_callback_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AuthError> {
    oauth_callback(OAuthProvider::GitHub, &state, &session, params).await
}

// ============================================================================
// Bearer tokens
// ============================================================================

/// POST /auth/token
/// Issue an API token for the signed-in account
async fn token_handler(
    State(state): State<Arc<AuthApiState>>,
    session: Session,
) -> Result<Json<ApiToken>, AuthError> {
    let current = load_identity(&session).await?;
    let account = current.account().ok_or(AuthError::NotAuthenticated)?;

    let token = state.jwt_service.issue(account)?;
    tracing::debug!("Issued API token for {}", account.email);

    Ok(Json(token))
}

/// GET /auth/me
/// Account behind a bearer token
async fn me_handler(
    State(state): State<Arc<AuthApiState>>,
    headers: HeaderMap,
) -> Result<Json<AccountResponse>, AuthError> {
    let token = extract_bearer_token(&headers)?;
    let claims = state.jwt_service.validate(&token)?;

    let account = state.auth_service.account_by_id(claims.user_id()?).await?;
    Ok(Json(AccountResponse::from(&account)))
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token.to_string())
}
