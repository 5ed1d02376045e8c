//! Stripe Webhook Handling
//!
//! Verifies `Stripe-Signature` headers and records paid orders when a
//! checkout completes. Verification happens on the raw body before anything
//! is parsed, and any failure rejects the event.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::{PaymentError, Result};
use crate::gateway::{PaymentGateway, ProviderSession};
use crate::orders::{Order, OrderStore};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum age of a signed timestamp, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Verified event envelope
#[derive(Clone, Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub data: EventData,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// Checks webhook signatures against the shared endpoint secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Create from `STRIPE_WEBHOOK_SECRET`
    pub fn from_env() -> Result<Self> {
        std::env::var("STRIPE_WEBHOOK_SECRET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(Self::new)
            .ok_or_else(|| PaymentError::Config("STRIPE_WEBHOOK_SECRET not set".into()))
    }

    fn mac(&self, timestamp: &str, payload: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| PaymentError::Config(e.to_string()))?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac)
    }

    /// Signature header value for a payload, in Stripe's format
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> Result<String> {
        let timestamp = timestamp.to_string();
        let digest = self.mac(&timestamp, payload)?.finalize().into_bytes();
        Ok(format!("t={timestamp},v1={}", hex::encode(digest)))
    }

    /// Verify against the current clock and parse the event
    pub fn verify(&self, payload: &[u8], header: Option<&str>) -> Result<WebhookEnvelope> {
        self.verify_at(payload, header, chrono::Utc::now().timestamp())
    }

    /// Verify against a given clock (unix seconds) and parse the event
    pub fn verify_at(&self, payload: &[u8], header: Option<&str>, now: i64) -> Result<WebhookEnvelope> {
        let header = header
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| PaymentError::WebhookSignature("No stripe-signature header value was provided.".into()))?;

        let mut timestamp = None;
        let mut signatures = Vec::new();
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value),
                Some(("v1", value)) => signatures.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| PaymentError::WebhookSignature("Unable to extract timestamp from header".into()))?;
        let signed_at: i64 = timestamp
            .parse()
            .map_err(|_| PaymentError::WebhookSignature("Invalid timestamp in header".into()))?;
        if signatures.is_empty() {
            return Err(PaymentError::WebhookSignature(
                "No signatures found with expected scheme".into(),
            ));
        }

        let mac = self.mac(timestamp, payload)?;
        let matched = signatures.iter().any(|candidate| {
            hex::decode(candidate)
                .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
                .unwrap_or(false)
        });
        if !matched {
            return Err(PaymentError::WebhookSignature(
                "No signatures found matching the expected signature for payload".into(),
            ));
        }

        if now.saturating_sub(signed_at) > self.tolerance_secs {
            return Err(PaymentError::WebhookSignature(
                "Timestamp outside the tolerance zone".into(),
            ));
        }

        serde_json::from_slice(payload).map_err(|e| PaymentError::WebhookParse(e.to_string()))
    }
}

/// Outcome of handling a verified event
#[derive(Clone, Debug)]
pub enum WebhookEvent {
    /// Checkout completed - order recorded
    CheckoutCompleted { order: Order },

    /// Unhandled event type
    Other { event_type: String },
}

/// Webhook handler
pub struct WebhookHandler {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderStore>,
}

impl WebhookHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, orders: Arc<dyn OrderStore>) -> Self {
        Self { gateway, orders }
    }

    /// Process a verified webhook event
    pub async fn handle(&self, event: WebhookEnvelope) -> Result<WebhookEvent> {
        tracing::info!(event_id = %event.id, event_type = %event.event_type, "Processing Stripe webhook");

        if event.event_type != CHECKOUT_COMPLETED {
            tracing::debug!(event_type = %event.event_type, "Unhandled webhook event");
            return Ok(WebhookEvent::Other {
                event_type: event.event_type,
            });
        }

        let session: ProviderSession = serde_json::from_value(event.data.object)
            .map_err(|e| PaymentError::WebhookParse(format!("Invalid checkout session data: {e}")))?;

        let line_items = self.gateway.list_line_items(&session.id).await?;
        let order = Order::from_session(&session, line_items);

        match self.orders.upsert(order.clone()).await {
            Ok(()) if !self.orders.is_durable() => {
                tracing::warn!(
                    order_id = %order.id,
                    "Order stored in memory only. Configure a database for persistent order history."
                );
            }
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Could not persist order");
            }
        }

        let email = if order.customer_email.is_empty() {
            "no-email"
        } else {
            order.customer_email.as_str()
        };
        tracing::info!(
            order_id = %order.id,
            email = %email,
            total = ?order.total,
            "Paid order"
        );

        Ok(WebhookEvent::CheckoutCompleted { order })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{CustomerDetails, ProviderLineItem};
    use crate::mock::MockGateway;
    use crate::orders::MemoryOrderStore;
    use serde_json::json;

    const SECRET: &str = "whsec_test123secret456";
    const NOW: i64 = 1_760_000_000;

    fn completed_payload(session_id: &str) -> Vec<u8> {
        json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {
                "id": session_id,
                "object": "checkout.session",
                "payment_status": "paid",
                "amount_total": 97_000,
                "currency": "zar",
                "customer_email": "thandi@example.com",
                "customer_details": {"email": "thandi@example.com", "name": null},
                "metadata": {"customerName": "Thandi", "customerEmail": "thandi@example.com"}
            }}
        })
        .to_string()
        .into_bytes()
    }

    fn gateway_with(session_id: &str) -> Arc<MockGateway> {
        Arc::new(MockGateway::new().with_session(
            ProviderSession {
                id: session_id.into(),
                payment_status: Some("paid".into()),
                customer_details: Some(CustomerDetails::default()),
                ..Default::default()
            },
            vec![
                ProviderLineItem {
                    description: Some("Raven Classic Hoodie".into()),
                    quantity: Some(1),
                    amount_total: 65_000,
                },
                ProviderLineItem {
                    description: Some("Feather Logo Tee".into()),
                    quantity: Some(1),
                    amount_total: 32_000,
                },
            ],
        ))
    }

    #[test]
    fn test_valid_signature() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload("cs_1");
        let header = verifier.sign(&payload, NOW).unwrap();

        let event = verifier.verify_at(&payload, Some(&header), NOW + 10).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = completed_payload("cs_1");
        let header = WebhookVerifier::new("wrong_secret").sign(&payload, NOW).unwrap();

        let result = WebhookVerifier::new(SECRET).verify_at(&payload, Some(&header), NOW);
        assert!(matches!(result, Err(PaymentError::WebhookSignature(_))));
    }

    #[test]
    fn test_modified_payload_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        let header = verifier.sign(&completed_payload("cs_1"), NOW).unwrap();

        let result = verifier.verify_at(&completed_payload("cs_2"), Some(&header), NOW);
        assert!(matches!(result, Err(PaymentError::WebhookSignature(_))));
    }

    #[test]
    fn test_missing_or_malformed_header_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload("cs_1");

        let timestamp_only = format!("t={NOW}");

        for header in [None, Some(""), Some("garbage"), Some("t=abc,v1=00"), Some(timestamp_only.as_str())] {
            let result = verifier.verify_at(&payload, header, NOW);
            assert!(
                matches!(result, Err(PaymentError::WebhookSignature(_))),
                "accepted {header:?}"
            );
        }
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload("cs_1");
        let header = verifier.sign(&payload, NOW - 600).unwrap();

        let result = verifier.verify_at(&payload, Some(&header), NOW);
        assert!(matches!(result, Err(PaymentError::WebhookSignature(_))));
    }

    #[test]
    fn test_extreme_timestamp_is_stale_not_a_panic() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload("cs_1");
        let header = verifier.sign(&payload, i64::MIN).unwrap();

        let result = verifier.verify_at(&payload, Some(&header), NOW);
        assert!(matches!(result, Err(PaymentError::WebhookSignature(_))));
    }

    #[test]
    fn test_any_matching_v1_accepted() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload("cs_1");
        let signed = verifier.sign(&payload, NOW).unwrap();
        let header = signed.replacen(",v1=", ",v1=deadbeef,v0=abc,v1=", 1);

        assert!(verifier.verify_at(&payload, Some(&header), NOW).is_ok());
    }

    #[tokio::test]
    async fn test_completed_checkout_records_order() {
        let orders = Arc::new(MemoryOrderStore::new());
        let handler = WebhookHandler::new(gateway_with("cs_1"), orders.clone());
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload("cs_1");
        let header = verifier.sign(&payload, NOW).unwrap();

        let event = verifier.verify_at(&payload, Some(&header), NOW).unwrap();
        let outcome = handler.handle(event).await.unwrap();

        let WebhookEvent::CheckoutCompleted { order } = outcome else {
            panic!("expected a completed checkout");
        };
        assert_eq!(order.id, "cs_1");
        assert_eq!(order.customer_email, "thandi@example.com");
        assert_eq!(order.customer_name, "Thandi");
        assert_eq!(order.total, Some(97_000));
        assert_eq!(order.items.len(), 2);
        assert_eq!(orders.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_redelivery_keeps_one_order() {
        let orders = Arc::new(MemoryOrderStore::new());
        let handler = WebhookHandler::new(gateway_with("cs_1"), orders.clone());
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload("cs_1");
        let header = verifier.sign(&payload, NOW).unwrap();

        for _ in 0..2 {
            let event = verifier.verify_at(&payload, Some(&header), NOW).unwrap();
            handler.handle(event).await.unwrap();
        }

        let stored = orders.list().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "cs_1");
    }

    #[tokio::test]
    async fn test_other_events_ignored() {
        let orders = Arc::new(MemoryOrderStore::new());
        let handler = WebhookHandler::new(gateway_with("cs_1"), orders.clone());
        let event: WebhookEnvelope = serde_json::from_value(json!({
            "id": "evt_2",
            "type": "payment_intent.created",
            "data": {"object": {"id": "pi_1"}}
        }))
        .unwrap();

        let outcome = handler.handle(event).await.unwrap();
        assert!(matches!(outcome, WebhookEvent::Other { .. }));
        assert!(orders.list().await.is_empty());
    }
}
