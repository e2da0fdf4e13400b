//! # Booking Error Types
//!
//! Typed error handling for the staybook booking engine.
//! All booking operations return `Result<T, BookingError>`.

use thiserror::Error;

/// Core error type for all booking operations
#[derive(Debug, Error)]
pub enum BookingError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (bad date ordering, missing identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pricing could not be resolved (no base rate, non-positive nights)
    #[error("Pricing error: {0}")]
    Pricing(String),

    /// Property not found
    #[error("Property not found: {property_id}")]
    PropertyNotFound { property_id: String },

    /// Booking not found
    #[error("Booking not found: {booking_id}")]
    BookingNotFound { booking_id: String },

    /// Requested date range conflicts with an existing booking
    #[error("Property {property_id} is not available for the requested dates")]
    Unavailable { property_id: String },

    /// Invalid state-machine transition
    #[error("Invalid transition from {from} via {action}")]
    InvalidTransition { from: String, action: String },

    /// Persistence failure on insert/update; prior state is untouched
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// Payment gateway API error
    #[error("Gateway error [{provider}]: {message}")]
    GatewayError { provider: String, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BookingError {
    /// Returns true if this error is retryable by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::NetworkError(_) | BookingError::GatewayError { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BookingError::Configuration(_) => 500,
            BookingError::Validation(_) => 400,
            BookingError::Pricing(_) => 422,
            BookingError::PropertyNotFound { .. } => 404,
            BookingError::BookingNotFound { .. } => 404,
            BookingError::Unavailable { .. } => 409,
            BookingError::InvalidTransition { .. } => 409,
            BookingError::OperationFailed(_) => 500,
            BookingError::GatewayError { .. } => 502,
            BookingError::NetworkError(_) => 503,
            BookingError::WebhookVerificationFailed(_) => 401,
            BookingError::WebhookParseError(_) => 400,
            BookingError::Internal(_) => 500,
            BookingError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for booking operations
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(BookingError::NetworkError("timeout".into()).is_retryable());
        assert!(BookingError::GatewayError {
            provider: "novapay".into(),
            message: "upstream 500".into()
        }
        .is_retryable());
        assert!(!BookingError::Validation("date_from >= date_to".into()).is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(BookingError::Validation("test".into()).status_code(), 400);
        assert_eq!(
            BookingError::PropertyNotFound {
                property_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(
            BookingError::Unavailable {
                property_id: "x".into()
            }
            .status_code(),
            409
        );
        assert_eq!(
            BookingError::WebhookVerificationFailed("bad sig".into()).status_code(),
            401
        );
    }
}
