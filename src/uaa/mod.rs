//! UAA (authorization server) support
//!
//! Obtains and refreshes OAuth2 token pairs from a UAA `/oauth/token`
//! endpoint, the way the Cloud Foundry CLI does.
//!
//! # Overview
//!
//! - [`UaaClient`] speaks the password and refresh-token grants.
//! - [`TokenRefresher`] is the narrow capability
//!   [`RefresherClient`](crate::RefresherClient) depends on. `UaaClient`
//!   implements it; tests and callers can plug in anything else.
//!
//! # Example
//!
//! ```no_run
//! use cfapi::uaa::UaaClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let uaa = UaaClient::new("https://uaa.example.com")?;
//! let tokens = uaa.authenticate("admin", "secret").await?;
//! let renewed = uaa.refresh_token(tokens.refresh_token()).await?;
//! # let _ = renewed;
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! - TLS certificates are verified unless
//!   [`UaaConfig::accept_invalid_certs`](crate::UaaConfig) is set

mod client;
mod refresher;

pub use client::{UaaClient, UaaError};
pub use refresher::{FnTokenRefresher, RefreshFuture, SharedTokenRefresher, TokenRefresher};
