//! Checkout Page Flow
//!
//! Client-side steps around the hosted payment page: validating the customer
//! form, reading the return status the provider redirects back with, and
//! turning a polled session status into the message shown to the shopper.
//! The poll only confirms; orders are recorded by the server's webhook.

use crate::api::{Customer, SessionStatus};
use crate::cart::{CartController, CartStorage};
use crate::error::{Result, ShopError};

pub const CANCELLED_MESSAGE: &str = "Payment was canceled. You can try again.";
pub const CREATING_SESSION_MESSAGE: &str = "Creating secure payment session...";
pub const NOT_PAID_MESSAGE: &str = "Payment is not marked as paid yet.";
pub const VERIFY_FAILED_MESSAGE: &str = "Could not verify payment session.";
pub const START_FAILED_MESSAGE: &str = "Could not start payment.";

/// Status the provider redirects back to the checkout page with
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnStatus {
    /// Plain visit, nothing to confirm
    None,

    /// Shopper backed out of the hosted page
    Cancelled,

    /// Provider reports completion; the session still has to be polled
    Success { session_id: String },
}

impl ReturnStatus {
    /// Read `?status=..&session_id=..` query values
    pub fn from_query(status: Option<&str>, session_id: Option<&str>) -> Self {
        match (status, session_id) {
            (Some("cancel"), _) => ReturnStatus::Cancelled,
            (Some("success"), Some(id)) if !id.trim().is_empty() => ReturnStatus::Success {
                session_id: id.trim().to_string(),
            },
            _ => ReturnStatus::None,
        }
    }

    /// Message to show before any network call
    pub fn initial_notice(&self) -> Option<PaymentNotice> {
        match self {
            ReturnStatus::Cancelled => Some(PaymentNotice::Error(CANCELLED_MESSAGE.into())),
            _ => None,
        }
    }
}

/// Status line under the payment form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentNotice {
    Info(String),
    Success(String),
    Error(String),
}

impl PaymentNotice {
    pub fn message(&self) -> &str {
        match self {
            PaymentNotice::Info(m) | PaymentNotice::Success(m) | PaymentNotice::Error(m) => m,
        }
    }

    /// CSS class for the status line
    pub fn class(&self) -> &'static str {
        match self {
            PaymentNotice::Info(_) => "",
            PaymentNotice::Success(_) => "success",
            PaymentNotice::Error(_) => "error",
        }
    }
}

/// Trim and require both customer fields
pub fn validate_customer(name: &str, email: &str) -> Result<Customer> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() || email.is_empty() {
        return Err(ShopError::MissingCustomerDetails);
    }

    Ok(Customer {
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// Apply a polled session status to the cart
///
/// A paid session empties the cart; anything else leaves it untouched so the
/// shopper can retry.
pub fn confirm_session<S: CartStorage>(
    cart: &mut CartController<S>,
    status: &SessionStatus,
) -> PaymentNotice {
    if status.is_paid() {
        cart.clear();
        tracing::info!(session_id = %status.id, "Payment confirmed");
        PaymentNotice::Success(format!("Payment successful. Reference: {}.", status.id))
    } else {
        PaymentNotice::Error(NOT_PAID_MESSAGE.into())
    }
}
