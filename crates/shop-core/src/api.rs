//! API Wire Types
//!
//! JSON bodies exchanged between the browser client and the server. Field
//! names are camelCase on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};

/// Line sent to `POST /api/create-checkout-session`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<&CartItem> for CheckoutLine {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Customer details collected on the checkout page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

/// Body of `POST /api/create-checkout-session`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub items: Vec<CheckoutLine>,
    pub customer: Customer,
}

impl CreateSessionRequest {
    pub fn from_cart(cart: &Cart, customer: Customer) -> Self {
        Self {
            items: cart.items().iter().map(CheckoutLine::from).collect(),
            customer,
        }
    }
}

/// Successful reply: the hosted payment page to redirect to
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub url: String,
}

/// Reply of `GET /api/checkout-session/:id`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub id: String,
    pub payment_status: String,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_email: String,
}

impl SessionStatus {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// Error body returned by every API endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartController, MemoryCartStorage};
    use crate::catalog::catalog;

    #[test]
    fn test_request_from_cart() {
        let products = catalog();
        let mut controller = CartController::load(MemoryCartStorage::new());
        controller.add(&products[0]);
        controller.add(&products[0]);

        let request = CreateSessionRequest::from_cart(controller.cart(), Customer::default());
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.items[0].name, products[0].name);
    }

    #[test]
    fn test_session_status_wire_names() {
        let raw = r#"{"id":"cs_1","paymentStatus":"paid","amountTotal":65000,"currency":"zar","customerEmail":"a@b.co"}"#;
        let status: SessionStatus = serde_json::from_str(raw).unwrap();
        assert!(status.is_paid());
        assert_eq!(status.amount_total, Some(65_000));
    }
}
