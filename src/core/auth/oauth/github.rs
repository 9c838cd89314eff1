//! GitHub profile lookup
//!
//! `/user` only carries an email when the user made one public. Otherwise
//! the address comes from `/user/emails`, taking the primary verified entry.

use serde::Deserialize;

use super::{OAuthError, ProviderProfile};

const USER_URL: &str = "https://api.github.com/user";
const EMAILS_URL: &str = "https://api.github.com/user/emails";

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

pub(super) async fn fetch_profile(
    http: &reqwest::Client,
    access_token: &str,
) -> Result<ProviderProfile, OAuthError> {
    let user: GitHubUser = http
        .get(USER_URL)
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let email = match user.email.as_deref().filter(|e| !e.is_empty()) {
        Some(email) => email.to_string(),
        None => {
            let emails: Vec<GitHubEmail> = http
                .get(EMAILS_URL)
                .bearer_auth(access_token)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            primary_email(emails).ok_or(OAuthError::MissingEmail)?
        }
    };

    Ok(into_profile(user, email))
}

fn primary_email(emails: Vec<GitHubEmail>) -> Option<String> {
    emails
        .into_iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email)
}

/// Name falls back to the login handle
fn into_profile(user: GitHubUser, email: String) -> ProviderProfile {
    let name = user
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(user.login);

    ProviderProfile { name, email }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails(json: &str) -> Vec<GitHubEmail> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_primary_verified_email_selected() {
        let list = emails(
            r#"[
                {"email": "old@example.com", "primary": false, "verified": true},
                {"email": "main@example.com", "primary": true, "verified": true}
            ]"#,
        );
        assert_eq!(primary_email(list).as_deref(), Some("main@example.com"));
    }

    #[test]
    fn test_unverified_primary_ignored() {
        let list = emails(r#"[{"email": "main@example.com", "primary": true, "verified": false}]"#);
        assert_eq!(primary_email(list), None);
        assert_eq!(primary_email(vec![]), None);
    }

    #[test]
    fn test_name_falls_back_to_login() {
        let user: GitHubUser =
            serde_json::from_str(r#"{"id": 7, "login": "asha-r", "name": null, "email": null}"#)
                .unwrap();
        let profile = into_profile(user, "main@example.com".to_string());

        assert_eq!(profile.name, "asha-r");
        assert_eq!(profile.email, "main@example.com");
    }

    #[test]
    fn test_display_name_preferred() {
        let user: GitHubUser =
            serde_json::from_str(r#"{"login": "asha-r", "name": "Asha Rao", "email": "a@b.co"}"#)
                .unwrap();
        assert_eq!(into_profile(user, "a@b.co".to_string()).name, "Asha Rao");
    }
}
