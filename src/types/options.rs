//! Client configuration types

use std::time::Duration;
use typed_builder::TypedBuilder;

/// Client identifier the Cloud Foundry CLI registers with UAA
pub const DEFAULT_UAA_CLIENT_ID: &str = "cf";

// ============================================================================
// Resource API
// ============================================================================

/// Configuration for [`CfClient`](crate::CfClient) and
/// [`RefresherClient`](crate::RefresherClient)
#[derive(Debug, Clone, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for ClientConfig"),
    builder_type(doc = "Builder for ClientConfig", vis = "pub"),
    build_method(doc = "Build the ClientConfig")
)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://api.example.com`
    #[builder(setter(into))]
    pub endpoint: String,

    /// Per-request timeout; `None` keeps the transport default
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,

    /// Skip TLS certificate verification
    #[builder(default)]
    pub accept_invalid_certs: bool,

    /// Custom `User-Agent` header
    #[builder(default, setter(strip_option, into))]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::builder().endpoint(endpoint).build()
    }

    pub(crate) fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        http_client(
            self.timeout,
            self.accept_invalid_certs,
            self.user_agent.as_deref(),
        )
    }
}

// ============================================================================
// Authorization server
// ============================================================================

/// Configuration for [`UaaClient`](crate::uaa::UaaClient)
#[derive(Debug, Clone, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for UaaConfig"),
    builder_type(doc = "Builder for UaaConfig", vis = "pub"),
    build_method(doc = "Build the UaaConfig")
)]
pub struct UaaConfig {
    /// Base URL of the authorization server; `/oauth/token` is appended
    #[builder(setter(into))]
    pub endpoint: String,

    /// OAuth client identifier sent with Basic auth
    #[builder(default = DEFAULT_UAA_CLIENT_ID.to_string(), setter(into))]
    pub client_id: String,

    /// OAuth client secret, empty for the public CLI client
    #[builder(default, setter(into))]
    pub client_secret: String,

    /// Per-request timeout; `None` keeps the transport default
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,

    /// Skip TLS certificate verification
    #[builder(default)]
    pub accept_invalid_certs: bool,
}

impl UaaConfig {
    /// Configuration with defaults for everything but the endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::builder().endpoint(endpoint).build()
    }

    pub(crate) fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        http_client(self.timeout, self.accept_invalid_certs, None)
    }
}

fn http_client(
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
    user_agent: Option<&str>,
) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(accept_invalid_certs);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent);
    }
    builder.build()
}

/// Strip trailing slashes so `endpoint + path` never doubles them
pub(crate) fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}
