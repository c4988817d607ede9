//! Cloud error types
use thiserror::Error;

/// Result type for cloud operations
pub type CloudResult<T> = Result<T, CloudError>;

/// Failures raised while talking to the remote table store.
///
/// A response that arrives intact but reports `success: false` is not an
/// error at this layer; it is returned as a normal [`RemoteResponse`].
///
/// [`RemoteResponse`]: crate::protocol::RemoteResponse
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CloudError {
    /// Create an API error carrying the remote's own message
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// The diagnostic the remote put in its error body, if it sent one
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            CloudError::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, CloudError::Network(_))
    }

    /// Check if credentials or endpoint settings are missing or wrong
    pub fn is_config_error(&self) -> bool {
        matches!(self, CloudError::Configuration(_))
    }
}

impl From<reqwest::Error> for CloudError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CloudError::api(403, "Invalid public key");
        assert_eq!(err.to_string(), "API error (403): Invalid public key");
        assert_eq!(err.remote_message(), Some("Invalid public key"));

        let err = CloudError::config("Missing project id");
        assert_eq!(err.to_string(), "Configuration error: Missing project id");
        assert!(err.remote_message().is_none());
    }

    #[test]
    fn test_error_predicates() {
        assert!(CloudError::network("timed out").is_network_error());
        assert!(!CloudError::network("timed out").is_config_error());
        assert!(CloudError::config("x").is_config_error());
        assert!(!CloudError::api(500, "boom").is_network_error());
    }
}
