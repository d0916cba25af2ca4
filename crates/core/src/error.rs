//! Error handling for CityWatch API requests

use serde_json::Value;
use thiserror::Error;

/// Failure of a single request against the CityWatch API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("{}", describe_status(.status, .message))]
    Api {
        status: u16,
        /// The `message` field of the response body, when there was one
        message: Option<String>,
        /// The parsed response body, when it was JSON
        body: Option<Value>,
    },

    /// The request never completed (connectivity, DNS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

fn describe_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Request failed with status {}", status),
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status of an application-level failure
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request failed before a response arrived
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// The message the server sent along with a failure status
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// A field of the JSON body that came with a failure status
    pub fn body_field(&self, key: &str) -> Option<&Value> {
        match self {
            ApiError::Api { body: Some(body), .. } => body.get(key),
            _ => None,
        }
    }

    /// Text to show the user: the server's message, or `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_prefers_server_message() {
        let err = ApiError::Api {
            status: 400,
            message: Some("Email already registered".to_string()),
            body: None,
        };
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.user_message("Signup failed."), "Email already registered");
    }

    #[test]
    fn test_display_falls_back_to_status() {
        let err = ApiError::Api {
            status: 502,
            message: None,
            body: None,
        };
        assert_eq!(err.to_string(), "Request failed with status 502");
        assert_eq!(err.user_message("Login failed."), "Login failed.");
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_network());
    }

    #[test]
    fn test_body_field() {
        let err = ApiError::Api {
            status: 403,
            message: None,
            body: Some(json!({ "needsVerification": true, "email": "a@b.co" })),
        };
        assert_eq!(err.body_field("needsVerification"), Some(&json!(true)));
        assert!(err.body_field("missing").is_none());
    }
}
