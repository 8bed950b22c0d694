//! OAuth2 token endpoint client for UAA

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use thiserror::Error;

use super::refresher::TokenRefresher;
use crate::client::error_chain;
use crate::types::options::normalize_endpoint;
use crate::types::{Tokens, UaaConfig};

/// Errors that can occur while talking to UAA
#[derive(Debug, Error)]
pub enum UaaError {
    /// The token endpoint could not be reached
    #[error("Failed to connect: {0}")]
    Connection(String),

    /// The response was not a token document
    #[error("Failed to parse response ({0})")]
    Parse(String),

    /// UAA answered with an OAuth error instead of tokens
    #[error("UAA Error: {description} ({code})")]
    Protocol {
        /// OAuth error code, e.g. `invalid_token`
        code: String,
        /// Human readable description
        description: String,
    },

    /// The HTTP client could not be constructed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl UaaError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a protocol error from an OAuth error pair
    pub fn protocol(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Protocol {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Token endpoint response; success and error share one document shape
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for the UAA `/oauth/token` endpoint
#[derive(Clone)]
pub struct UaaClient {
    token_url: String,
    authorization: String,
    http: reqwest::Client,
}

impl UaaClient {
    /// Create a client for the public `cf` OAuth client
    ///
    /// # Errors
    ///
    /// Returns [`UaaError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, UaaError> {
        Self::from_config(&UaaConfig::new(endpoint))
    }

    /// Create a client from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`UaaError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn from_config(config: &UaaConfig) -> Result<Self, UaaError> {
        let http = config
            .http_client()
            .map_err(|e| UaaError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            token_url: format!("{}/oauth/token", normalize_endpoint(&config.endpoint)),
            authorization: basic_authorization(&config.client_id, &config.client_secret),
            http,
        })
    }

    /// Full URL of the token endpoint
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchange user credentials for a token pair (password grant)
    ///
    /// # Errors
    ///
    /// Returns an error if UAA is unreachable, answers with an OAuth error,
    /// or returns something other than a token document.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Tokens, UaaError> {
        let form = [
            ("grant_type", "password"),
            ("scope", ""),
            ("username", username),
            ("password", password),
        ];
        self.fetch_token(&form, None).await
    }

    /// Exchange a refresh token for a new token pair (refresh grant).
    ///
    /// When UAA does not rotate the refresh token, the one passed in is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if UAA is unreachable, answers with an OAuth error,
    /// or returns something other than a token document.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, UaaError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("scope", ""),
            ("refresh_token", refresh_token),
        ];
        self.fetch_token(&form, Some(refresh_token)).await
    }

    async fn fetch_token(
        &self,
        form: &[(&str, &str)],
        previous_refresh_token: Option<&str>,
    ) -> Result<Tokens, UaaError> {
        let grant_type = form.first().map_or("", |(_, value)| *value);
        tracing::debug!(url = %self.token_url, grant_type, "Requesting UAA token");

        let response = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, &self.authorization)
            .form(form)
            .send()
            .await
            .map_err(|e| UaaError::connection(error_chain(&e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| UaaError::connection(error_chain(&e)))?;
        tracing::debug!(status = status.as_u16(), grant_type, "Received UAA response");

        let token_response: TokenResponse =
            serde_json::from_str(&response_text).map_err(|e| UaaError::parse(e.to_string()))?;

        if let Some(code) = token_response.error.filter(|code| !code.is_empty()) {
            return Err(UaaError::protocol(
                code,
                token_response.error_description.unwrap_or_default(),
            ));
        }

        let access_token = token_response.access_token.ok_or_else(|| {
            UaaError::parse(format!("no access_token in {status} response"))
        })?;
        let refresh_token = token_response
            .refresh_token
            .or_else(|| previous_refresh_token.map(str::to_string))
            .unwrap_or_default();
        let token_type = token_response
            .token_type
            .unwrap_or_else(|| "bearer".to_string());

        Ok(Tokens::with_type(access_token, refresh_token, token_type))
    }
}

#[async_trait]
impl TokenRefresher for UaaClient {
    async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, UaaError> {
        UaaClient::refresh_token(self, refresh_token).await
    }
}

impl std::fmt::Debug for UaaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UaaClient")
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

/// `Basic` credentials for an OAuth client, e.g. `Basic Y2Y6` for `cf:`
fn basic_authorization(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{client_id}:{client_secret}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization_for_cli_client() {
        assert_eq!(basic_authorization("cf", ""), "Basic Y2Y6");
        assert_eq!(basic_authorization("app", "secret"), "Basic YXBwOnNlY3JldA==");
    }

    #[test]
    fn test_token_url() {
        let client = UaaClient::new("https://uaa.example.com/").unwrap();
        assert_eq!(client.token_url(), "https://uaa.example.com/oauth/token");
    }

    #[test]
    fn test_error_messages() {
        let err = UaaError::protocol("invalid_something", "something failed here");
        assert_eq!(
            err.to_string(),
            "UAA Error: something failed here (invalid_something)"
        );
        assert!(
            UaaError::parse("EOF")
                .to_string()
                .starts_with("Failed to parse response")
        );
    }
}
