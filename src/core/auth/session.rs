//! Per-browser session identity
//!
//! A session starts `Anonymous`, may hold a `PendingRegistration` between
//! student signup and registration, and ends up `Authenticated`. Only the
//! auth orchestrator moves a session between states.

use std::sync::Arc;

use axum::Router;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::session::Id;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};

use crate::core::db::models::UserAccount;

/// Session key holding the serialized `SessionIdentity`
pub const IDENTITY_KEY: &str = "identity";

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "campusconnect.sid";

pub type SessionError = tower_sessions::session::Error;

/// Signup data waiting for the registration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub name: String,
    pub email: String,
    /// Absent when the signup came from an OAuth provider
    pub password_hash: Option<String>,
}

/// Who the current browser session belongs to
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionIdentity {
    #[default]
    Anonymous,
    PendingRegistration(PendingRegistration),
    Authenticated(UserAccount),
}

impl SessionIdentity {
    pub fn account(&self) -> Option<&UserAccount> {
        match self {
            SessionIdentity::Authenticated(account) => Some(account),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingRegistration> {
        match self {
            SessionIdentity::PendingRegistration(pending) => Some(pending),
            _ => None,
        }
    }
}

/// Read the identity stored in the session, `Anonymous` when there is none
pub async fn load_identity(session: &Session) -> Result<SessionIdentity, SessionError> {
    Ok(session
        .get::<SessionIdentity>(IDENTITY_KEY)
        .await?
        .unwrap_or_default())
}

/// Replace the identity stored in the session.
///
/// Becoming `Authenticated` rotates the session id so a cookie captured
/// before login cannot ride the new identity.
pub async fn store_identity(session: &Session, identity: &SessionIdentity) -> Result<(), SessionError> {
    if matches!(identity, SessionIdentity::Authenticated(_)) {
        session.cycle_id().await?;
    }
    session.insert(IDENTITY_KEY, identity).await
}

/// Drop the session and its cookie
pub async fn clear_identity(session: &Session) -> Result<(), SessionError> {
    session.flush().await
}

// ============================================================================
// Per-session mutual exclusion
// ============================================================================

/// Serializes requests that share a session id, so two tabs submitting at
/// once cannot interleave their identity updates.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<DashMap<Id, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the session. A session without an id has
    /// no cookie yet and nothing else can hold it.
    pub async fn acquire(&self, session: &Session) -> SessionGuard {
        let Some(id) = session.id() else {
            return SessionGuard {
                guard: None,
                release: None,
            };
        };

        let lock = self.locks.entry(id).or_default().clone();
        let guard = lock.lock_owned().await;

        SessionGuard {
            guard: Some(guard),
            release: Some((self.locks.clone(), id)),
        }
    }

    /// Number of sessions with a live lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held for the duration of a session-mutating request
pub struct SessionGuard {
    guard: Option<OwnedMutexGuard<()>>,
    release: Option<(Arc<DashMap<Id, Arc<Mutex<()>>>>, Id)>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        if let Some((locks, id)) = self.release.take() {
            locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
        }
    }
}

// ============================================================================
// Session layer
// ============================================================================

/// Cookie and expiry settings for the session layer
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub secret: String,
    pub ttl_minutes: i64,
    pub secure: bool,
}

impl SessionSettings {
    /// Signing key derived from the configured secret
    pub fn signing_key(&self) -> Key {
        Key::from(&Sha512::digest(self.secret.as_bytes()))
    }
}

/// Wrap the router in a signed-cookie session layer backed by `store`
pub fn with_sessions<S>(router: Router, store: S, settings: &SessionSettings) -> Router
where
    S: SessionStore + Clone,
{
    let layer = SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_secure(settings.secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            settings.ttl_minutes,
        )))
        .with_signed(settings.signing_key());

    router.layer(layer)
}
