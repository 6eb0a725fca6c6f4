//! Credential provider abstraction.
//!
//! The calendar client depends only on "a valid credential is obtainable",
//! never on how tokens are stored or refreshed. No token files.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use portfolio_core::errors::{AssistantError, AssistantResult};

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens are treated as expired this long before their actual expiry so an
/// in-flight request never crosses the line mid-call.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// A bearer credential for the calendar API.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    /// None for tokens that never expire (static configuration)
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() + Duration::seconds(EXPIRY_SKEW_SECONDS) >= at,
            None => false,
        }
    }
}

/// Source of valid calendar credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get_valid_credential(&self) -> AssistantResult<Credential>;
}

/// Fixed bearer token taken from configuration. Suitable for service
/// accounts and tests.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn get_valid_credential(&self) -> AssistantResult<Credential> {
        Ok(Credential {
            access_token: self.token.clone(),
            expires_at: None,
        })
    }
}

/// Exchanges an OAuth refresh token for access tokens at the Google token
/// endpoint, caching each access token until shortly before expiry.
pub struct RefreshingTokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    cached: Mutex<Option<Credential>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl RefreshingTokenProvider {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        timeout: std::time::Duration,
    ) -> AssistantResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Transient(e.to_string()))?;

        Ok(Self {
            http,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            cached: Mutex::new(None),
        })
    }

    /// Point at a different token endpoint (tests).
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    async fn refresh(&self) -> AssistantResult<Credential> {
        debug!("Refreshing calendar access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AssistantError::Transient(format!("token endpoint: {e}")))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Authorization(format!(
                "token refresh rejected: {status}: {body}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Transient(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Transient(format!("token response parse: {e}")))?;

        Ok(Credential {
            access_token: token.access_token,
            expires_at: Some(Utc::now() + Duration::seconds(token.expires_in)),
        })
    }
}

#[async_trait]
impl CredentialProvider for RefreshingTokenProvider {
    async fn get_valid_credential(&self) -> AssistantResult<Credential> {
        let mut cached = self.cached.lock().await;
        if let Some(credential) = cached.as_ref() {
            if !credential.is_expired() {
                return Ok(credential.clone());
            }
        }

        let fresh = self.refresh().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_static_provider_never_expires() {
        let provider = StaticTokenProvider::new("fixed_token");
        let credential = provider.get_valid_credential().await.unwrap();
        assert_eq!(credential.access_token, "fixed_token");
        assert!(!credential.is_expired());
    }

    #[tokio::test]
    async fn test_refreshing_provider_exchanges_and_caches() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh_token",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = RefreshingTokenProvider::new(
            "client",
            "secret",
            "refresh",
            std::time::Duration::from_secs(5),
        )
        .unwrap()
        .with_token_url(format!("{}/token", server.uri()));

        let first = provider.get_valid_credential().await.unwrap();
        assert_eq!(first.access_token, "fresh_token");

        // Second call must hit the cache, not the endpoint (expect(1) above).
        let second = provider.get_valid_credential().await.unwrap();
        assert_eq!(second.access_token, "fresh_token");
    }

    #[tokio::test]
    async fn test_refresh_rejection_is_authorization_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant"
            })))
            .mount(&server)
            .await;

        let provider = RefreshingTokenProvider::new(
            "client",
            "secret",
            "stale",
            std::time::Duration::from_secs(5),
        )
        .unwrap()
        .with_token_url(format!("{}/token", server.uri()));

        let err = provider.get_valid_credential().await.unwrap_err();
        assert!(matches!(
            err,
            portfolio_core::errors::AssistantError::Authorization(_)
        ));
    }
}
