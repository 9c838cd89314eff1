//! Server functions feeding the pages
//!
//! Each one reads the caller's session identity and re-reads the account so
//! the pages never render stale data. `None` means the session may not see
//! the page and the caller should redirect.

use leptos::prelude::*;

use crate::core::{DashboardView, Role, StaffProfileView};

/// Name and email waiting for the registration form
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PendingSignup {
    pub name: String,
    pub email: String,
    pub via_provider: bool,
}

#[cfg(feature = "ssr")]
mod server {
    use std::sync::Arc;

    use axum::Extension;
    use leptos::prelude::ServerFnError;
    use tower_sessions::Session;

    use crate::core::auth::session::{SessionIdentity, load_identity};
    use crate::core::auth::{AuthApiState, AuthService};
    use crate::core::db::UserAccount;

    pub async fn identity() -> Result<(SessionIdentity, AuthService), ServerFnError> {
        let session: Session = leptos_axum::extract().await?;
        let Extension(state): Extension<Arc<AuthApiState>> = leptos_axum::extract().await?;

        let identity = load_identity(&session)
            .await
            .map_err(|e| ServerFnError::new(format!("session store: {}", e)))?;
        Ok((identity, state.auth_service.clone()))
    }

    pub async fn current_account() -> Result<Option<UserAccount>, ServerFnError> {
        let (identity, service) = identity().await?;
        service.refresh(&identity).await.map_err(|e| {
            tracing::error!("Failed to load account: {}", e);
            ServerFnError::new("Internal server error")
        })
    }
}

#[server]
pub async fn load_student_dashboard() -> Result<Option<DashboardView>, ServerFnError> {
    let account = server::current_account().await?;
    Ok(account.as_ref().and_then(DashboardView::for_account))
}

#[server]
pub async fn load_pending_signup() -> Result<Option<PendingSignup>, ServerFnError> {
    let (identity, _) = server::identity().await?;
    Ok(identity.pending().map(|pending| PendingSignup {
        name: pending.name.clone(),
        email: pending.email.clone(),
        via_provider: pending.password_hash.is_none(),
    }))
}

#[server]
pub async fn load_staff_profile(role: Role) -> Result<Option<StaffProfileView>, ServerFnError> {
    let account = server::current_account().await?;
    Ok(account
        .filter(|account| account.role == role)
        .map(|account| StaffProfileView {
            name: account.name,
            email: account.email,
            phone: account.phone,
            role: account.role,
        }))
}
