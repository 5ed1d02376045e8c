//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("{0}")]
    Stripe(String),

    /// Checkout requested with no items
    #[error("Cart is empty.")]
    EmptyCart,

    /// At least one checkout item failed validation; the detail is for logs
    #[error("Invalid cart items.")]
    InvalidItems(String),

    /// Provider does not know the session
    #[error("Session not found.")]
    SessionNotFound(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Order storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PaymentError {
    /// Rejected before reaching the provider
    pub fn is_validation(&self) -> bool {
        matches!(self, PaymentError::EmptyCart | PaymentError::InvalidItems(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::Stripe(msg) if !msg.is_empty() => msg.clone(),
            PaymentError::Stripe(_) => "Could not create checkout session.".into(),
            PaymentError::Config(_) => "Stripe secret key not configured.".into(),
            PaymentError::WebhookSignature(msg) | PaymentError::WebhookParse(msg) => {
                format!("Webhook Error: {msg}")
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(PaymentError::EmptyCart.user_message(), "Cart is empty.");
        assert_eq!(
            PaymentError::InvalidItems("item 0: empty name".into()).user_message(),
            "Invalid cart items."
        );
        assert!(PaymentError::EmptyCart.is_validation());
        assert!(!PaymentError::Stripe("down".into()).is_validation());
    }

    #[test]
    fn test_provider_message_passes_through() {
        let err = PaymentError::Stripe("Your card was declined.".into());
        assert_eq!(err.user_message(), "Your card was declined.");
    }
}
