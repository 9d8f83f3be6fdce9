//! API error handling
//!
//! Typed errors for calls against the bookmark service, with a classifier
//! separating transport failures from server-side rejections.

use thiserror::Error;

/// Errors that can occur while talking to the bookmark service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, TLS error
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("Unexpected response from server: {details}")]
    Decode { details: String },

    /// Base URL or token missing from the configuration
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

const TOKEN_HINT: &str =
    "Check the API token with `linkhub config show` or set it with `linkhub config init`.";

impl ApiError {
    /// Create a status error, keeping only a short prefix of the body
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(200) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        ApiError::Status { status, body }
    }

    /// Check if this error came from the network rather than the server
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Check if the server reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ApiError::Status { status: 401, .. } | ApiError::Status { status: 403, .. } => {
                Some(TOKEN_HINT)
            }
            ApiError::NotConfigured(_) => {
                Some("Run `linkhub config init` to set the service URL and API token.")
            }
            _ if self.is_network() => Some("Check that the service URL is reachable."),
            _ => None,
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ApiError::status(400, r#"{"url": ["This field is required."]}"#);
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("This field is required."));
        assert!(!err.is_network());
    }

    #[test]
    fn test_status_body_truncated() {
        let body = "x".repeat(500);
        match ApiError::status(500, &body) {
            ApiError::Status { body, .. } => {
                assert_eq!(body.len(), 203);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ApiError::status(404, "").is_not_found());
        assert!(!ApiError::status(500, "").is_not_found());
    }

    #[test]
    fn test_recovery_suggestions() {
        assert!(ApiError::status(401, "").recovery_suggestion().is_some());
        assert!(ApiError::NotConfigured("url".into())
            .recovery_suggestion()
            .is_some());
        assert!(ApiError::status(500, "").recovery_suggestion().is_none());
    }
}
