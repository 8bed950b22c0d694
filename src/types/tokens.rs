//! OAuth token pair issued by the authorization server

use serde::{Deserialize, Serialize};

/// Access/refresh token pair.
///
/// Immutable once built: a refresh produces a new `Tokens` value instead of
/// updating this one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    access_token: String,
    refresh_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Tokens {
    /// Create a token pair with the default `bearer` type
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: default_token_type(),
        }
    }

    /// Create a token pair with an explicit token type
    pub fn with_type(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        token_type: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: token_type.into(),
        }
    }

    /// Short-lived token sent with every API request
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Long-lived token exchanged for a new pair
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Token type reported by the authorization server
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }
}

// Token values stay out of logs and panic messages.
impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}
