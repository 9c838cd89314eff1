//! OAuth federation
//!
//! Google and GitHub sit behind one contract: `authorize` produces the
//! provider URL plus the CSRF state and PKCE verifier to keep in the session,
//! and `exchange` turns the callback code into a `ProviderProfile`.

pub mod github;
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};

/// Session key holding the `PendingAuthorization` between redirect and callback
pub const AUTHORIZATION_KEY: &str = "oauth_authorization";

/// User agent sent to provider APIs
pub const USER_AGENT: &str = "CampusConnect";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    GitHub,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::GitHub => "github",
        }
    }

    fn auth_url(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            OAuthProvider::GitHub => "https://github.com/login/oauth/authorize",
        }
    }

    fn token_url(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://oauth2.googleapis.com/token",
            OAuthProvider::GitHub => "https://github.com/login/oauth/access_token",
        }
    }

    fn scopes(&self) -> &'static [&'static str] {
        match self {
            OAuthProvider::Google => &["openid", "email", "profile"],
            OAuthProvider::GitHub => &["read:user", "user:email"],
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What every provider yields on success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Invalid OAuth configuration: {0}")]
    Configuration(String),

    #[error("Provider returned an error: {0}")]
    Denied(String),

    #[error("Callback is missing the '{0}' parameter")]
    MissingParameter(&'static str),

    #[error("No authorization is in progress for {0}")]
    NoPendingAuthorization(OAuthProvider),

    #[error("OAuth state does not match")]
    StateMismatch,

    #[error("Token exchange failed: {0}")]
    Exchange(String),

    #[error("Fetching the profile failed: {0}")]
    Profile(String),

    #[error("Provider did not return a usable email address")]
    MissingEmail,
}

impl From<reqwest::Error> for OAuthError {
    fn from(err: reqwest::Error) -> Self {
        OAuthError::Profile(err.to_string())
    }
}

/// CSRF state and PKCE verifier kept in the session during the redirect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub provider: OAuthProvider,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

impl PendingAuthorization {
    /// The callback must come back for the same provider with the same state
    pub fn check(&self, provider: OAuthProvider, state: &str) -> Result<(), OAuthError> {
        if self.provider != provider {
            return Err(OAuthError::NoPendingAuthorization(provider));
        }
        if self.csrf_state != state {
            return Err(OAuthError::StateMismatch);
        }
        Ok(())
    }
}

/// Query string of a provider callback
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Split the callback into `(code, state)` or the reason it failed
    pub fn into_grant(self) -> Result<(String, String), OAuthError> {
        if let Some(error) = self.error {
            return Err(OAuthError::Denied(error));
        }
        let code = self.code.ok_or(OAuthError::MissingParameter("code"))?;
        let state = self.state.ok_or(OAuthError::MissingParameter("state"))?;
        Ok((code, state))
    }
}

/// One federated identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> OAuthProvider;

    /// Provider URL to send the browser to, and the state to remember
    fn authorize(&self) -> (String, PendingAuthorization);

    /// Trade the callback code for the user's profile
    async fn exchange(
        &self,
        code: String,
        pending: PendingAuthorization,
    ) -> Result<ProviderProfile, OAuthError>;
}

/// Client credentials for one provider
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Authorization-code flow with PKCE against a real provider
pub struct OAuthClient {
    provider: OAuthProvider,
    client: ConfiguredClient,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(provider: OAuthProvider, credentials: &ProviderCredentials) -> Result<Self, OAuthError> {
        let config_err = |e: oauth2::url::ParseError| OAuthError::Configuration(e.to_string());

        let client = BasicClient::new(ClientId::new(credentials.client_id.clone()))
            .set_client_secret(ClientSecret::new(credentials.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(provider.auth_url().to_string()).map_err(config_err)?)
            .set_token_uri(TokenUrl::new(provider.token_url().to_string()).map_err(config_err)?)
            .set_redirect_uri(RedirectUrl::new(credentials.callback_url.clone()).map_err(config_err)?);

        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| OAuthError::Configuration(e.to_string()))?;

        Ok(Self {
            provider,
            client,
            http,
        })
    }
}

#[async_trait]
impl IdentityProvider for OAuthClient {
    fn provider(&self) -> OAuthProvider {
        self.provider
    }

    fn authorize(&self) -> (String, PendingAuthorization) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(
                self.provider
                    .scopes()
                    .iter()
                    .map(|s| Scope::new(s.to_string())),
            )
            .set_pkce_challenge(pkce_challenge)
            .url();

        let pending = PendingAuthorization {
            provider: self.provider,
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };

        (auth_url.to_string(), pending)
    }

    async fn exchange(
        &self,
        code: String,
        pending: PendingAuthorization,
    ) -> Result<ProviderProfile, OAuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier))
            .request_async(&self.http)
            .await
            .map_err(|e| OAuthError::Exchange(e.to_string()))?;

        let access_token = token.access_token().secret();

        match self.provider {
            OAuthProvider::Google => google::fetch_profile(&self.http, access_token).await,
            OAuthProvider::GitHub => github::fetch_profile(&self.http, access_token).await,
        }
    }
}

/// The providers this deployment has credentials for
#[derive(Clone, Default)]
pub struct OAuthProviders {
    pub google: Option<Arc<dyn IdentityProvider>>,
    pub github: Option<Arc<dyn IdentityProvider>>,
}

impl OAuthProviders {
    /// Build clients for every provider with credentials
    pub fn from_credentials(
        google: Option<&ProviderCredentials>,
        github: Option<&ProviderCredentials>,
    ) -> Result<Self, OAuthError> {
        let build = |provider, creds: Option<&ProviderCredentials>| {
            creds
                .map(|c| {
                    OAuthClient::new(provider, c).map(|client| Arc::new(client) as Arc<dyn IdentityProvider>)
                })
                .transpose()
        };

        Ok(Self {
            google: build(OAuthProvider::Google, google)?,
            github: build(OAuthProvider::GitHub, github)?,
        })
    }

    pub fn get(&self, provider: OAuthProvider) -> Option<&Arc<dyn IdentityProvider>> {
        match provider {
            OAuthProvider::Google => self.google.as_ref(),
            OAuthProvider::GitHub => self.github.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            callback_url: "http://localhost:3000/auth/github/callback".to_string(),
        }
    }

    #[test]
    fn test_authorize_url_carries_pkce_and_state() {
        let client = OAuthClient::new(OAuthProvider::GitHub, &credentials()).unwrap();
        let (url, pending) = client.authorize();

        assert!(url.starts_with("https://github.com/login/oauth/authorize"));
        assert!(url.contains("code_challenge="));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains(&format!("state={}", pending.csrf_state)));
        assert!(url.contains("client_id=client-id"));
        assert_eq!(pending.provider, OAuthProvider::GitHub);
        assert!(!pending.pkce_verifier.is_empty());
    }

    #[test]
    fn test_each_authorization_is_fresh() {
        let client = OAuthClient::new(OAuthProvider::Google, &credentials()).unwrap();
        let (_, first) = client.authorize();
        let (_, second) = client.authorize();

        assert_ne!(first.csrf_state, second.csrf_state);
        assert_ne!(first.pkce_verifier, second.pkce_verifier);
    }

    #[test]
    fn test_bad_callback_url_is_configuration_error() {
        let creds = ProviderCredentials {
            callback_url: "not a url".to_string(),
            ..credentials()
        };
        assert!(matches!(
            OAuthClient::new(OAuthProvider::Google, &creds),
            Err(OAuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_pending_authorization_check() {
        let pending = PendingAuthorization {
            provider: OAuthProvider::Google,
            csrf_state: "abc".to_string(),
            pkce_verifier: "verifier".to_string(),
        };

        assert!(pending.check(OAuthProvider::Google, "abc").is_ok());
        assert!(matches!(
            pending.check(OAuthProvider::Google, "xyz"),
            Err(OAuthError::StateMismatch)
        ));
        assert!(matches!(
            pending.check(OAuthProvider::GitHub, "abc"),
            Err(OAuthError::NoPendingAuthorization(OAuthProvider::GitHub))
        ));
    }

    #[test]
    fn test_callback_params() {
        let params = CallbackParams {
            code: Some("code".to_string()),
            state: Some("state".to_string()),
            error: None,
        };
        assert_eq!(
            params.into_grant().unwrap(),
            ("code".to_string(), "state".to_string())
        );

        let denied = CallbackParams {
            error: Some("access_denied".to_string()),
            ..Default::default()
        };
        assert!(matches!(denied.into_grant(), Err(OAuthError::Denied(_))));

        let missing = CallbackParams {
            code: Some("code".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            missing.into_grant(),
            Err(OAuthError::MissingParameter("state"))
        ));
    }

    #[test]
    fn test_unconfigured_providers() {
        let providers = OAuthProviders::from_credentials(None, Some(&credentials())).unwrap();
        assert!(providers.get(OAuthProvider::Google).is_none());
        assert_eq!(
            providers.get(OAuthProvider::GitHub).unwrap().provider(),
            OAuthProvider::GitHub
        );
    }
}
