//! Status-driven interpretation of resource API responses
//!
//! Error bodies follow the Cloud Controller envelope
//! `{"description": "..."}`; any other fields are ignored.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{CfError, Result};

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    description: String,
}

/// Canonical reason phrase for a status code, e.g. `"Unauthorized"`
#[must_use]
pub fn status_text(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

fn description(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.description.trim().to_string())
}

/// Map a status code and body to an error, or `Ok(())` below 400.
///
/// # Errors
///
/// - 5xx: [`CfError::Server`] with the envelope description, or the status
///   text followed by the raw body when the envelope is missing.
/// - 401: [`CfError::Unauthorized`].
/// - other 4xx: [`CfError::Client`] with the envelope description, or the
///   status text.
pub fn classify(status: u16, body: &str) -> Result<()> {
    if status >= 500 {
        let message = description(body)
            .unwrap_or_else(|| format!("{}: {}", status_text(status), body));
        return Err(CfError::server(status, message));
    }

    if status >= 400 {
        let message = description(body).unwrap_or_else(|| status_text(status).to_string());
        if status == StatusCode::UNAUTHORIZED.as_u16() {
            return Err(CfError::unauthorized(message));
        }
        return Err(CfError::client(status, message));
    }

    Ok(())
}

/// Deserialize a successful response body into the caller's shape
///
/// # Errors
///
/// Returns [`CfError::Parse`] if the body does not fit `T`.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| CfError::parse(e.to_string()))
}
