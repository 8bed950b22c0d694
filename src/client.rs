//! `CfClient`: authenticated JSON requests with a fixed access token
//!
//! Every request goes to `endpoint + path` with
//! `Authorization: bearer <token>` and `Content-Type: application/json`.
//! Bodies are flat string maps encoded as a JSON object. Responses are
//! interpreted by [`crate::response::classify`]; nothing is retried here.
//!
//! A `CfClient` is bound to one access token for its whole life. When the
//! token changes, build a new client with [`CfClient::with_access_token`]
//! (or let [`RefresherClient`](crate::RefresherClient) do it).
//!
//! # Example
//!
//! ```no_run
//! use cfapi::CfClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Info {
//!     name: String,
//! }
//!
//! # async fn example() -> cfapi::Result<()> {
//! let client = CfClient::new("https://api.example.com", "my-access-token")?;
//! let info: Info = client.get("/v2/info").await?;
//! println!("{}", info.name);
//! # Ok(())
//! # }
//! ```

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::error::{CfError, Result};
use crate::response::{classify, parse_body};
use crate::types::{ClientConfig, HttpMethod, RequestBody, Tokens};
use crate::types::options::normalize_endpoint;

/// Resource API client bound to a single access token
#[derive(Clone)]
pub struct CfClient {
    endpoint: String,
    access_token: String,
    http: reqwest::Client,
}

impl CfClient {
    /// Create a client with default transport settings
    ///
    /// # Errors
    ///
    /// Returns [`CfError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig::new(endpoint), access_token)
    }

    /// Create a client from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`CfError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, access_token: impl Into<String>) -> Result<Self> {
        let http = config
            .http_client()
            .map_err(|e| CfError::invalid_config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: normalize_endpoint(&config.endpoint),
            access_token: access_token.into(),
            http,
        })
    }

    /// New client for the same endpoint bound to another access token.
    ///
    /// The connection pool is shared with `self`.
    #[must_use]
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            access_token: access_token.into(),
            http: self.http.clone(),
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Tokens this client sends. Only the access token is known here.
    #[must_use]
    pub fn current_tokens(&self) -> Tokens {
        Tokens::new(self.access_token.clone(), String::new())
    }

    /// `GET endpoint+path`, deserializing the response body
    ///
    /// # Errors
    ///
    /// Any [`CfError`] produced by the request or by parsing the body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.fetch(HttpMethod::Get, path, None).await?;
        parse_body(&body)
    }

    /// `PUT endpoint+path` with an optional JSON body
    ///
    /// # Errors
    ///
    /// Any [`CfError`] produced by the request or by parsing the body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<T> {
        let body = self.fetch(HttpMethod::Put, path, body).await?;
        parse_body(&body)
    }

    /// `POST endpoint+path` with an optional JSON body
    ///
    /// # Errors
    ///
    /// Any [`CfError`] produced by the request or by parsing the body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<T> {
        let body = self.fetch(HttpMethod::Post, path, body).await?;
        parse_body(&body)
    }

    /// `DELETE endpoint+path`, parameters travel as a JSON body.
    /// The response body is ignored.
    ///
    /// # Errors
    ///
    /// Any [`CfError`] produced by the request.
    pub async fn delete(&self, path: &str, body: Option<&RequestBody>) -> Result<()> {
        self.execute(HttpMethod::Delete, path, body).await
    }

    /// Send a request and only check its status.
    /// A body passed with [`HttpMethod::Get`] is not sent.
    ///
    /// # Errors
    ///
    /// Any [`CfError`] produced by the request.
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<()> {
        self.fetch(method, path, body).await.map(|_| ())
    }

    /// Run one request and return the raw body of a successful response
    pub(crate) async fn fetch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<String> {
        let url = format!("{}{path}", self.endpoint);
        tracing::debug!(%method, %url, "Sending API request");

        let mut request = self
            .http
            .request(method.into(), &url)
            .header(AUTHORIZATION, format!("bearer {}", self.access_token))
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body.filter(|_| method != HttpMethod::Get) {
            let json = serde_json::to_string(body)
                .map_err(|e| CfError::invalid_request(format!("Invalid options format: {e}")))?;
            request = request.body(json);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                CfError::invalid_request(error_chain(&e))
            } else {
                CfError::connection(error_chain(&e))
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CfError::connection(error_chain(&e)))?;
        tracing::debug!(%method, %url, status, "Received API response");

        classify(status, &text)?;
        Ok(text)
    }
}

impl std::fmt::Debug for CfClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CfClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Render an error with its sources, e.g. `error sending request: ...: Connection refused`
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_normalized() {
        let client = CfClient::new("http://localhost:8080/", "token").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080");
    }

    #[test]
    fn test_with_access_token_keeps_endpoint() {
        let client = CfClient::new("http://localhost:8080", "old").unwrap();
        let rebuilt = client.with_access_token("new");
        assert_eq!(rebuilt.endpoint(), "http://localhost:8080");
        assert_eq!(rebuilt.current_tokens().access_token(), "new");
        assert_eq!(client.current_tokens().access_token(), "old");
    }

    #[test]
    fn test_current_tokens_has_no_refresh_token() {
        let client = CfClient::new("http://localhost:8080", "my-access-token").unwrap();
        let tokens = client.current_tokens();
        assert_eq!(tokens.access_token(), "my-access-token");
        assert!(tokens.refresh_token().is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = CfClient::new("http://localhost:8080", "super-secret").unwrap();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("localhost:8080"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = CfError::Parse("outer".to_string());
        assert_eq!(error_chain(&inner), "refused");
        assert_eq!(error_chain(&outer), "Failed to parse response: outer");
    }
}
