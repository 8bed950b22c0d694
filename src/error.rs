//! Error types for the Cloud Foundry API client

use thiserror::Error;

use crate::uaa::UaaError;

/// Main error type for resource API calls
#[derive(Error, Debug)]
pub enum CfError {
    /// The API rejected the access token (HTTP 401)
    #[error("{message}")]
    Unauthorized {
        /// Server-provided description, or the canonical status text
        message: String,
    },

    /// Any other 4xx response
    #[error("{message}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Server-provided description, or the canonical status text
        message: String,
    },

    /// A 5xx response
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided description, or status text plus raw body
        message: String,
    },

    /// The transport could not complete the request
    #[error("Failed to connect: {0}")]
    Connection(String),

    /// The response body did not match the requested shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP client could not be constructed from the configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Obtaining a new token pair failed
    #[error(transparent)]
    Refresh(#[from] UaaError),
}

/// Result type alias for resource API calls
pub type Result<T> = std::result::Result<T, CfError>;

impl CfError {
    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: msg.into(),
        }
    }

    /// Create a client error
    pub fn client(status: u16, msg: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: msg.into(),
        }
    }

    /// Create a server error
    pub fn server(status: u16, msg: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: msg.into(),
        }
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// HTTP status carried by the error, if the server answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is the outcome that triggers a token refresh
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_shown_verbatim() {
        assert_eq!(CfError::server(500, "Ups").to_string(), "Ups");
        assert_eq!(CfError::client(404, "Not Found").to_string(), "Not Found");
        assert_eq!(
            CfError::unauthorized("Unauthorized").to_string(),
            "Unauthorized"
        );
    }

    #[test]
    fn test_connection_and_parse_prefixes() {
        let err = CfError::connection("connection refused");
        assert_eq!(err.to_string(), "Failed to connect: connection refused");

        let err = CfError::parse("expected value at line 1 column 1");
        assert!(err.to_string().starts_with("Failed to parse response"));
    }

    #[test]
    fn test_status_and_unauthorized() {
        assert_eq!(CfError::unauthorized("x").status(), Some(401));
        assert_eq!(CfError::client(403, "Forbidden").status(), Some(403));
        assert_eq!(CfError::connection("down").status(), None);

        assert!(CfError::unauthorized("x").is_unauthorized());
        assert!(!CfError::client(403, "Forbidden").is_unauthorized());
        assert!(!CfError::server(500, "Ups").is_unauthorized());
    }

    #[test]
    fn test_refresh_error_is_transparent() {
        let err = CfError::from(UaaError::protocol("invalid_token", "expired"));
        assert_eq!(err.to_string(), "UAA Error: expired (invalid_token)");
        assert!(!err.is_unauthorized());
    }
}
