//! Payment Gateway
//!
//! Provider-agnostic view of a hosted checkout. [`StripeClient`] talks to
//! Stripe; [`MockGateway`] stands in for it in tests.
//!
//! [`StripeClient`]: crate::StripeClient
//! [`MockGateway`]: crate::MockGateway

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_core::SessionStatus;

use crate::error::Result;

/// A validated checkout line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,

    /// Unit price in rand, as submitted
    pub price: Decimal,

    /// Unit price in cents
    pub unit_amount: i64,

    pub quantity: u64,
}

impl LineItem {
    /// Unit amount times quantity, in cents
    pub fn amount_total(&self) -> i64 {
        i64::try_from(self.quantity)
            .ok()
            .and_then(|q| self.unit_amount.checked_mul(q))
            .unwrap_or(i64::MAX)
    }
}

/// Everything the provider needs to open a hosted session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub items: Vec<LineItem>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
}

impl SessionRequest {
    /// Metadata attached to the session for reconciliation
    pub fn metadata(&self) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert("customerName".to_string(), self.customer_name.clone());
        metadata.insert(
            "customerEmail".to_string(),
            self.customer_email.clone().unwrap_or_default(),
        );
        metadata
    }
}

/// A freshly created hosted session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedSession {
    pub id: String,

    /// Hosted payment page to redirect the shopper to
    pub url: String,
}

/// Customer details captured by the hosted page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Snapshot of a provider checkout session (Stripe field names)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub id: String,

    #[serde(default)]
    pub url: Option<String>,

    /// `paid`, `unpaid` or `no_payment_required`
    #[serde(default)]
    pub payment_status: Option<String>,

    /// Total in cents
    #[serde(default)]
    pub amount_total: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl ProviderSession {
    /// Email from the hosted form, falling back to the prefilled one
    pub fn email(&self) -> String {
        non_empty(self.customer_details.as_ref().and_then(|d| d.email.as_ref()))
            .or_else(|| non_empty(self.customer_email.as_ref()))
            .unwrap_or_default()
            .to_string()
    }

    /// Name from the hosted form, falling back to the checkout metadata
    pub fn customer_name(&self) -> String {
        non_empty(self.customer_details.as_ref().and_then(|d| d.name.as_ref()))
            .or_else(|| non_empty(self.metadata.as_ref().and_then(|m| m.get("customerName"))))
            .unwrap_or_default()
            .to_string()
    }

    pub fn payment_status(&self) -> &str {
        self.payment_status.as_deref().unwrap_or("unpaid")
    }

    pub fn to_status(&self) -> SessionStatus {
        SessionStatus {
            id: self.id.clone(),
            payment_status: self.payment_status().to_string(),
            amount_total: self.amount_total,
            currency: self.currency.clone(),
            customer_email: self.email(),
        }
    }
}

/// A purchased line as reported by the provider
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderLineItem {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub quantity: Option<u64>,

    /// Total in cents
    #[serde(default)]
    pub amount_total: i64,
}

/// Payment provider trait (Strategy pattern)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session
    async fn create_session(&self, request: &SessionRequest) -> Result<CreatedSession>;

    /// Fetch the current state of a session
    async fn retrieve_session(&self, id: &str) -> Result<ProviderSession>;

    /// Purchased lines of a session (first 100)
    async fn list_line_items(&self, session_id: &str) -> Result<Vec<ProviderLineItem>>;

    /// Gateway name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_fallbacks() {
        let mut session = ProviderSession {
            id: "cs_1".into(),
            customer_email: Some("prefill@example.com".into()),
            customer_details: Some(CustomerDetails {
                email: Some(String::new()),
                name: None,
            }),
            metadata: Some(HashMap::from([("customerName".to_string(), "Thandi".to_string())])),
            ..Default::default()
        };

        assert_eq!(session.email(), "prefill@example.com");
        assert_eq!(session.customer_name(), "Thandi");

        session.customer_details = Some(CustomerDetails {
            email: Some("hosted@example.com".into()),
            name: Some("Thandi M".into()),
        });
        assert_eq!(session.email(), "hosted@example.com");
        assert_eq!(session.customer_name(), "Thandi M");
    }

    #[test]
    fn test_session_from_stripe_json() {
        let raw = r#"{
            "id": "cs_test_a1",
            "object": "checkout.session",
            "payment_status": "paid",
            "amount_total": 97000,
            "currency": "zar",
            "customer_email": null,
            "customer_details": {"email": "sipho@example.com", "name": "Sipho", "phone": null},
            "metadata": {"customerName": "Sipho"},
            "livemode": false
        }"#;

        let session: ProviderSession = serde_json::from_str(raw).unwrap();
        let status = session.to_status();
        assert!(status.is_paid());
        assert_eq!(status.amount_total, Some(97_000));
        assert_eq!(status.customer_email, "sipho@example.com");
    }

    #[test]
    fn test_line_amount_total() {
        let item = LineItem {
            name: "Feather Logo Tee".into(),
            price: Decimal::from(320),
            unit_amount: 32_000,
            quantity: 3,
        };
        assert_eq!(item.amount_total(), 96_000);
    }
}
