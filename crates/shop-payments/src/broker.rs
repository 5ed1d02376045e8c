//! Checkout Session Broker
//!
//! Validates the browser's cart at the boundary and asks the gateway for a
//! hosted session. Request bodies arrive loosely typed; nothing reaches the
//! provider unless every line passes.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shop_core::SessionStatus;
use shop_core::money::to_minor_units;

use crate::error::{PaymentError, Result};
use crate::gateway::{CreatedSession, LineItem, PaymentGateway, SessionRequest};

/// Placeholder the provider substitutes with the real session id
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Raw body of `POST /api/create-checkout-session`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CheckoutPayload {
    #[serde(default)]
    pub items: Option<Value>,

    #[serde(default)]
    pub customer: Option<CustomerPayload>,
}

/// Raw customer block
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerPayload {
    #[serde(default)]
    pub name: Option<Value>,

    #[serde(default)]
    pub email: Option<Value>,
}

/// Render a scalar JSON value as text; anything else is empty
fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn parse_price(value: Option<&Value>) -> Option<Decimal> {
    let text = match value? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn parse_quantity(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            // whole floats such as 2.0 are integers; u32 bound keeps the cast exact
            (f.fract() == 0.0 && f > 0.0 && f <= f64::from(u32::MAX)).then(|| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl LineItem {
    /// Validate one raw cart line
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        let name = scalar_text(value.get("name"));
        if name.is_empty() {
            return Err("missing name".into());
        }

        let price = parse_price(value.get("price")).ok_or("price is not a number")?;
        if price <= Decimal::ZERO {
            return Err(format!("price {price} is not positive"));
        }

        let unit_amount = to_minor_units(price)
            .filter(|cents| *cents > 0)
            .ok_or_else(|| format!("price {price} is out of range"))?;

        let quantity = parse_quantity(value.get("quantity"))
            .filter(|q| *q > 0)
            .ok_or("quantity is not a positive integer")?;

        Ok(Self {
            name,
            price,
            unit_amount,
            quantity,
        })
    }
}

/// Validate the whole item list; one bad line rejects everything
pub fn validate_items(items: Option<&Value>) -> Result<Vec<LineItem>> {
    let items = match items {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(PaymentError::EmptyCart),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, value)| {
            LineItem::from_value(value)
                .map_err(|reason| PaymentError::InvalidItems(format!("item {index}: {reason}")))
        })
        .collect()
}

/// Build the provider request for a validated payload
pub fn session_request(payload: &CheckoutPayload, origin: &str) -> Result<SessionRequest> {
    let items = validate_items(payload.items.as_ref())?;
    let origin = origin.trim_end_matches('/');

    let (name, email) = payload
        .customer
        .as_ref()
        .map(|c| (scalar_text(c.name.as_ref()), scalar_text(c.email.as_ref())))
        .unwrap_or_default();

    Ok(SessionRequest {
        items,
        customer_name: name,
        customer_email: (!email.is_empty()).then_some(email),
        success_url: format!(
            "{origin}/checkout?status=success&session_id={SESSION_ID_PLACEHOLDER}"
        ),
        cancel_url: format!("{origin}/checkout?status=cancel"),
    })
}

/// Brokers hosted sessions between the storefront and the gateway
#[derive(Clone)]
pub struct CheckoutBroker {
    gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutBroker {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    /// Validate the cart and open a hosted session
    pub async fn create_session(
        &self,
        payload: &CheckoutPayload,
        origin: &str,
    ) -> Result<CreatedSession> {
        let request = session_request(payload, origin).inspect_err(|e| {
            if let PaymentError::InvalidItems(detail) = e {
                tracing::info!(detail = %detail, "Rejected checkout request");
            }
        })?;

        let session = self.gateway.create_session(&request).await?;

        tracing::info!(
            session_id = %session.id,
            gateway = self.gateway.name(),
            lines = request.items.len(),
            "Created checkout session"
        );

        Ok(session)
    }

    /// Current payment status of a session
    pub async fn get_session(&self, id: &str) -> Result<SessionStatus> {
        let session = self.gateway.retrieve_session(id).await?;
        Ok(session.to_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGateway;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn payload(items: Value) -> CheckoutPayload {
        CheckoutPayload {
            items: Some(items),
            customer: Some(CustomerPayload {
                name: Some(json!("Thandi")),
                email: Some(json!("thandi@example.com")),
            }),
        }
    }

    #[test]
    fn test_valid_items() {
        let items = validate_items(Some(&json!([
            {"name": "Feather Logo Tee", "price": 320, "quantity": 2},
            {"name": " Talon Tote Bag ", "price": "210.50", "quantity": "1"},
            {"name": "Crest Bucket Hat", "price": 249.995, "quantity": 3.0}
        ])))
        .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].unit_amount, 32_000);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].name, "Talon Tote Bag");
        assert_eq!(items[1].price, dec!(210.50));
        assert_eq!(items[2].unit_amount, 25_000);
        assert_eq!(items[2].quantity, 3);
    }

    #[test]
    fn test_empty_cart() {
        assert!(matches!(validate_items(None), Err(PaymentError::EmptyCart)));
        assert!(matches!(validate_items(Some(&json!([]))), Err(PaymentError::EmptyCart)));
        assert!(matches!(validate_items(Some(&json!({"name": "x"}))), Err(PaymentError::EmptyCart)));
    }

    #[test]
    fn test_one_bad_line_rejects_all() {
        let bad_lines = [
            json!({"name": "Tee", "price": 0, "quantity": 1}),
            json!({"name": "Tee", "price": -5, "quantity": 1}),
            json!({"name": "Tee", "price": 100, "quantity": 1.5}),
            json!({"name": "Tee", "price": 100, "quantity": 0}),
            json!({"name": "Tee", "price": 100, "quantity": -1}),
            json!({"name": "   ", "price": 100, "quantity": 1}),
            json!({"price": 100, "quantity": 1}),
            json!({"name": "Tee", "price": "abc", "quantity": 1}),
            json!({"name": "Tee", "price": 0.001, "quantity": 1}),
            json!({"name": "Tee", "price": "1000000000000000000000000000", "quantity": 1}),
            json!({"name": "Tee", "price": "79228162514264337593543950335", "quantity": 1}),
        ];

        for bad in bad_lines {
            let items = json!([{"name": "Good", "price": 100, "quantity": 1}, bad]);
            let result = validate_items(Some(&items));
            assert!(
                matches!(result, Err(PaymentError::InvalidItems(_))),
                "accepted {items}"
            );
        }
    }

    #[test]
    fn test_session_request_urls_and_customer() {
        let request = session_request(
            &payload(json!([{"name": "Tee", "price": 100, "quantity": 1}])),
            "https://shop.example.com/",
        )
        .unwrap();

        assert_eq!(
            request.success_url,
            "https://shop.example.com/checkout?status=success&session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.cancel_url, "https://shop.example.com/checkout?status=cancel");
        assert_eq!(request.customer_email.as_deref(), Some("thandi@example.com"));
        assert_eq!(request.metadata()["customerName"], "Thandi");
    }

    #[test]
    fn test_missing_customer_is_allowed() {
        let request = session_request(
            &CheckoutPayload {
                items: Some(json!([{"name": "Tee", "price": 100, "quantity": 1}])),
                customer: None,
            },
            "http://localhost:3000",
        )
        .unwrap();

        assert_eq!(request.customer_email, None);
        assert_eq!(request.customer_name, "");
    }

    #[tokio::test]
    async fn test_invalid_cart_never_reaches_gateway() {
        let gateway = Arc::new(MockGateway::new());
        let broker = CheckoutBroker::new(gateway.clone());

        let result = broker
            .create_session(
                &payload(json!([
                    {"name": "Tee", "price": 100, "quantity": 1},
                    {"name": "Hat", "price": 0, "quantity": 1}
                ])),
                "http://localhost:3000",
            )
            .await;

        assert!(matches!(result, Err(PaymentError::InvalidItems(_))));
        assert!(gateway.created_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_poll_session() {
        let gateway = Arc::new(MockGateway::new());
        let broker = CheckoutBroker::new(gateway.clone());

        let created = broker
            .create_session(
                &payload(json!([{"name": "Tee", "price": 320, "quantity": 2}])),
                "http://localhost:3000",
            )
            .await
            .unwrap();
        assert!(created.url.contains(&created.id));

        let status = broker.get_session(&created.id).await.unwrap();
        assert_eq!(status.payment_status, "unpaid");
        assert_eq!(status.amount_total, Some(64_000));

        gateway.mark_paid(&created.id).await;
        assert!(broker.get_session(&created.id).await.unwrap().is_paid());

        let missing = broker.get_session("cs_unknown").await;
        assert!(matches!(missing, Err(PaymentError::SessionNotFound(_))));
    }
}
