//! Type definitions shared by the API and UAA clients
//!
//! Token pairs, request building blocks and client configuration.

pub mod options;
pub mod request;
pub mod tokens;

pub use options::{
    ClientConfig, ClientConfigBuilder, DEFAULT_UAA_CLIENT_ID, UaaConfig, UaaConfigBuilder,
};
pub use request::{HttpMethod, RequestBody};
pub use tokens::Tokens;
