// ABOUTME: Error types for resource facades
// ABOUTME: Separates store-reported failures from transport, decode, and input problems

use taskdeck_cloud::CloudError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Message used when the store reports failure without saying why
pub const UNSPECIFIED_REMOTE_FAILURE: &str = "Remote store reported failure";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The store answered with `success: false`
    #[error("{0}")]
    Remote(String),

    /// The call never produced a usable response
    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error("Failed to decode {entity} record: {source}")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A create or update succeeded but echoed no row
    #[error("Remote store returned no {0} record")]
    MissingResult(&'static str),
}

impl ServiceError {
    pub fn remote(message: Option<String>) -> Self {
        Self::Remote(message.unwrap_or_else(|| UNSPECIFIED_REMOTE_FAILURE.to_string()))
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// The message worth showing a user: the store's own diagnostic when it
    /// sent one, otherwise the full error.
    pub fn diagnostic(&self) -> String {
        match self {
            ServiceError::Remote(message) => message.clone(),
            ServiceError::Cloud(err) => err
                .remote_message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
            other => other.to_string(),
        }
    }

    /// `success: false` from the store
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, ServiceError::Remote(_))
    }

    /// Network, configuration, or unreadable-response failure
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, ServiceError::Cloud(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_prefers_nested_message() {
        let err = ServiceError::from(CloudError::api(400, "Name is required"));
        assert_eq!(err.diagnostic(), "Name is required");
        assert!(err.is_transport_failure());

        let err = ServiceError::from(CloudError::network("connection refused"));
        assert_eq!(err.diagnostic(), "Network error: connection refused");
    }

    #[test]
    fn test_remote_without_message() {
        let err = ServiceError::remote(None);
        assert_eq!(err.diagnostic(), UNSPECIFIED_REMOTE_FAILURE);
        assert!(err.is_remote_failure());
    }
}
