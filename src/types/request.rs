//! Request building blocks for the resource API

use std::collections::BTreeMap;

/// Flat string map sent as a JSON object body.
///
/// Nested structures are not supported by the request layer.
pub type RequestBody = BTreeMap<String, String>;

/// HTTP methods used by the resource API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`, never carries a body
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`, may carry parameters as a body
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Post => Self::POST,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}
