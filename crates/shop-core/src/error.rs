//! Error Types

use thiserror::Error;

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, ShopError>;

/// Storefront error types
#[derive(Error, Debug)]
pub enum ShopError {
    /// Browser or in-memory storage refused a read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Customer details missing from the checkout form
    #[error("Please enter name and email.")]
    MissingCustomerDetails,

    /// Saved cart parsed but holds amounts no shopper could reach
    #[error("Corrupt cart: {0}")]
    CorruptCart(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShopError {
    /// Message suitable for the checkout status line
    pub fn user_message(&self) -> String {
        match self {
            ShopError::Storage(_) => "Your cart could not be saved in this browser.".into(),
            ShopError::Json(_) | ShopError::CorruptCart(_) => {
                "Your saved cart could not be read.".into()
            }
            other => other.to_string(),
        }
    }
}
