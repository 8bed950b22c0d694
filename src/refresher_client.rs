//! `RefresherClient`: a [`CfClient`] that renews its token on 401
//!
//! Each call is first sent with the current access token. If the API
//! answers 401, the client asks its [`TokenRefresher`] for a new pair using
//! the current refresh token, swaps in a new `CfClient` bound to the new
//! access token, notifies the refresh observer, and sends the call again.
//!
//! - At most one refresh per call. The retry's result is returned as is,
//!   even if it is another 401.
//! - A failed refresh is returned to the caller and the call is not retried.
//! - Any other error (4xx, 5xx, connection, parse) is returned untouched.
//!
//! # Concurrency
//!
//! The token pair and the client bound to it live behind one
//! [`tokio::sync::Mutex`]; every call holds it until it completes. Calls on
//! a shared `RefresherClient` are serialized, so two callers never refresh
//! concurrently. The refresh observer runs with the lock held and must not
//! call back into the same client.
//!
//! [`RefresherClient::current_tokens`] reads a separate snapshot and never
//! waits for an in-flight call.
//!
//! # Example
//!
//! ```no_run
//! use cfapi::RefresherClient;
//! use cfapi::uaa::UaaClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let uaa = UaaClient::new("https://uaa.example.com")?;
//! let tokens = uaa.authenticate("admin", "secret").await?;
//!
//! let client = RefresherClient::new("https://api.example.com", tokens, uaa)?
//!     .on_token_refresh(|tokens| println!("new token type: {}", tokens.token_type()));
//!
//! let apps: serde_json::Value = client.get("/v2/apps").await?;
//! # let _ = apps;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::client::CfClient;
use crate::error::{CfError, Result};
use crate::response::parse_body;
use crate::types::{ClientConfig, HttpMethod, RequestBody, Tokens};
use crate::uaa::{SharedTokenRefresher, TokenRefresher};

/// Callback invoked with the new tokens after every successful refresh
pub type TokenObserver = Arc<dyn Fn(&Tokens) + Send + Sync>;

/// Current token generation. Replaced as a whole, never field by field.
struct Session {
    tokens: Tokens,
    client: CfClient,
}

/// Resource API client with transparent token refresh
pub struct RefresherClient {
    session: Mutex<Session>,
    latest: RwLock<Tokens>,
    refresher: SharedTokenRefresher,
    on_token_refresh: Option<TokenObserver>,
}

impl RefresherClient {
    /// Create a client with default transport settings
    ///
    /// # Errors
    ///
    /// Returns [`CfError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        tokens: Tokens,
        refresher: impl TokenRefresher + 'static,
    ) -> Result<Self> {
        Self::from_config(&ClientConfig::new(endpoint), tokens, refresher)
    }

    /// Create a client from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`CfError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        tokens: Tokens,
        refresher: impl TokenRefresher + 'static,
    ) -> Result<Self> {
        let client = CfClient::from_config(config, tokens.access_token())?;
        Ok(Self::with_client(client, tokens, refresher))
    }

    /// Wrap an existing client. It is rebound to `tokens`' access token.
    pub fn with_client(
        client: CfClient,
        tokens: Tokens,
        refresher: impl TokenRefresher + 'static,
    ) -> Self {
        let client = client.with_access_token(tokens.access_token());
        Self {
            latest: RwLock::new(tokens.clone()),
            session: Mutex::new(Session { tokens, client }),
            refresher: Arc::new(refresher),
            on_token_refresh: None,
        }
    }

    /// Register the refresh observer, builder style
    #[must_use]
    pub fn on_token_refresh(mut self, observer: impl Fn(&Tokens) + Send + Sync + 'static) -> Self {
        self.set_on_token_refresh(observer);
        self
    }

    /// Register or replace the refresh observer
    pub fn set_on_token_refresh(&mut self, observer: impl Fn(&Tokens) + Send + Sync + 'static) {
        self.on_token_refresh = Some(Arc::new(observer));
    }

    /// Remove the refresh observer
    pub fn clear_on_token_refresh(&mut self) {
        self.on_token_refresh = None;
    }

    /// Token pair currently in use. Does not wait for in-flight calls.
    pub fn current_tokens(&self) -> Tokens {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `GET endpoint+path`, deserializing the response body
    ///
    /// # Errors
    ///
    /// See the module docs for which errors trigger a refresh.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.fetch(HttpMethod::Get, path, None).await?;
        parse_body(&body)
    }

    /// `PUT endpoint+path` with an optional JSON body
    ///
    /// # Errors
    ///
    /// See the module docs for which errors trigger a refresh.
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
    /// See the module docs for which errors trigger a refresh.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<T> {
        let body = self.fetch(HttpMethod::Post, path, body).await?;
        parse_body(&body)
    }

    /// `DELETE endpoint+path`, parameters travel as a JSON body
    ///
    /// # Errors
    ///
    /// See the module docs for which errors trigger a refresh.
    pub async fn delete(&self, path: &str, body: Option<&RequestBody>) -> Result<()> {
        self.execute(HttpMethod::Delete, path, body).await
    }

    /// Send a request and only check its status
    ///
    /// # Errors
    ///
    /// See the module docs for which errors trigger a refresh.
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<()> {
        self.fetch(method, path, body).await.map(|_| ())
    }

    async fn fetch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<String> {
        let mut session = self.session.lock().await;

        let first = session.client.fetch(method, path, body).await;
        match first {
            Err(e) if e.is_unauthorized() => {
                tracing::info!(%method, path, "Access token rejected, refreshing");
                self.refresh(&mut session).await?;
                session.client.fetch(method, path, body).await
            }
            result => result,
        }
    }

    async fn refresh(&self, session: &mut Session) -> Result<()> {
        let tokens = self
            .refresher
            .refresh_token(session.tokens.refresh_token())
            .await
            .map_err(|e| {
                tracing::warn!("Token refresh failed: {e}");
                CfError::from(e)
            })?;

        let client = session.client.with_access_token(tokens.access_token());
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = tokens.clone();
        *session = Session { tokens, client };
        tracing::info!("Token refresh succeeded");

        if let Some(observer) = &self.on_token_refresh {
            observer(&session.tokens);
        }

        Ok(())
    }
}

impl std::fmt::Debug for RefresherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefresherClient")
            .field("has_observer", &self.on_token_refresh.is_some())
            .finish_non_exhaustive()
    }
}
