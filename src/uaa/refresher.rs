//! The token refresh capability.
//!
//! [`RefresherClient`](crate::RefresherClient) only needs one thing from the
//! authorization server: "give me a new pair for this refresh token". That
//! is [`TokenRefresher`]. [`UaaClient`](super::UaaClient) implements it
//! against a real server; closures can be adapted with [`FnTokenRefresher`].
//!
//! # Example: implementing `TokenRefresher`
//!
//! ```no_run
//! use async_trait::async_trait;
//! use cfapi::Tokens;
//! use cfapi::uaa::{TokenRefresher, UaaError};
//!
//! struct StaticRefresher;
//!
//! #[async_trait]
//! impl TokenRefresher for StaticRefresher {
//!     async fn refresh_token(&self, _refresh_token: &str) -> Result<Tokens, UaaError> {
//!         Ok(Tokens::new("fresh-access", "fresh-refresh"))
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::client::UaaError;
use crate::types::Tokens;

/// Obtains a new token pair from a refresh token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchange `refresh_token` for a new [`Tokens`] value
    async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, UaaError>;
}

#[async_trait]
impl TokenRefresher for Box<dyn TokenRefresher> {
    async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, UaaError> {
        (**self).refresh_token(refresh_token).await
    }
}

#[async_trait]
impl<T: TokenRefresher + ?Sized> TokenRefresher for Arc<T> {
    async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, UaaError> {
        (**self).refresh_token(refresh_token).await
    }
}

/// Type alias for a shared token refresher.
pub type SharedTokenRefresher = Arc<dyn TokenRefresher>;

/// Future returned by closures wrapped in [`FnTokenRefresher`]
pub type RefreshFuture = Pin<Box<dyn Future<Output = Result<Tokens, UaaError>> + Send>>;

/// Wrapper to convert a closure into a `TokenRefresher`.
///
/// # Example
///
/// ```no_run
/// use cfapi::Tokens;
/// use cfapi::uaa::{FnTokenRefresher, TokenRefresher};
/// use std::sync::Arc;
///
/// let refresher = FnTokenRefresher::new(|refresh_token| {
///     Box::pin(async move {
///         println!("refreshing with {refresh_token}");
///         Ok(Tokens::new("new-access", "new-refresh"))
///     })
/// });
///
/// let shared: Arc<dyn TokenRefresher> = Arc::new(refresher);
/// ```
pub struct FnTokenRefresher<F>
where
    F: Fn(String) -> RefreshFuture + Send + Sync,
{
    func: F,
}

impl<F> FnTokenRefresher<F>
where
    F: Fn(String) -> RefreshFuture + Send + Sync,
{
    /// Create a new function-based token refresher.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> TokenRefresher for FnTokenRefresher<F>
where
    F: Fn(String) -> RefreshFuture + Send + Sync,
{
    async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, UaaError> {
        (self.func)(refresh_token.to_string()).await
    }
}
