//! Google userinfo lookup

use serde::Deserialize;

use super::{OAuthError, ProviderProfile};

const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Deserialize)]
struct GoogleUser {
    email: Option<String>,
    #[serde(default)]
    verified_email: Option<bool>,
    name: Option<String>,
}

pub(super) async fn fetch_profile(
    http: &reqwest::Client,
    access_token: &str,
) -> Result<ProviderProfile, OAuthError> {
    let user: GoogleUser = http
        .get(USERINFO_URL)
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    into_profile(user)
}

/// Only a verified address is accepted. Name falls back to the email when
/// the account has no display name.
fn into_profile(user: GoogleUser) -> Result<ProviderProfile, OAuthError> {
    let email = user
        .email
        .filter(|e| !e.is_empty() && user.verified_email == Some(true))
        .ok_or(OAuthError::MissingEmail)?;
    let name = user
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.clone());

    Ok(ProviderProfile { name, email })
}
