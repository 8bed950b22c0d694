//! # cfapi
//!
//! Client for the Cloud Foundry API and its UAA authorization server.
//! Async/await on tokio, typed errors, transparent token refresh.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cfapi::{RefresherClient, RequestBody};
//! use cfapi::uaa::UaaClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let uaa = UaaClient::new("https://uaa.example.com")?;
//! let tokens = uaa.authenticate("admin", "secret").await?;
//!
//! let client = RefresherClient::new("https://api.example.com", tokens, uaa)?;
//!
//! let app: serde_json::Value = client.get("/v2/apps/123").await?;
//!
//! let mut body = RequestBody::new();
//! body.insert("name".to_string(), "my-app".to_string());
//! let _: serde_json::Value = client.put("/v2/apps/123", Some(&body)).await?;
//! # let _ = app;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`client`]: [`CfClient`], requests bound to one access token
//! - [`response`]: status-driven error classification
//! - [`refresher_client`]: [`RefresherClient`], refresh-and-retry-once on 401
//! - [`uaa`]: token endpoint client, refresh capability
//! - [`types`]: tokens, request bodies, configuration
//! - [`error`]: error types
//!
//! ## Logging
//!
//! This crate uses [`tracing`](https://crates.io/crates/tracing) for structured logging.
//! Token values are never logged. To see logs, attach a subscriber:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Error Handling
//!
//! Resource calls return [`Result<T, CfError>`](Result):
//!
//! ```no_run
//! # use cfapi::{CfClient, CfError};
//! # async fn example(client: CfClient) {
//! match client.get::<serde_json::Value>("/v2/apps/123").await {
//!     Ok(app) => println!("{app}"),
//!     Err(CfError::Unauthorized { .. }) => eprintln!("token rejected"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod refresher_client;
pub mod response;
pub mod types;
pub mod uaa;

pub use client::CfClient;
pub use error::{CfError, Result};
pub use refresher_client::{RefresherClient, TokenObserver};
pub use types::{ClientConfig, HttpMethod, RequestBody, Tokens, UaaConfig};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
