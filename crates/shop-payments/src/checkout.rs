//! Stripe Checkout Integration
//!
//! Implements the "Stripe Checkout (Hosted)" approach: one-off payment
//! sessions priced from the cart, plus session lookups for the success page
//! and the webhook.

use async_trait::async_trait;
use serde::Deserialize;
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionBillingAddressCollection,
    CheckoutSessionId, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};

use crate::error::{PaymentError, Result};
use crate::gateway::{
    CreatedSession, PaymentGateway, ProviderLineItem, ProviderSession, SessionRequest,
};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Stripe caps line item pages at 100
const LINE_ITEM_PAGE_LIMIT: &str = "100";

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
    http: reqwest::Client,
    secret_key: String,
    currency: Currency,
}

impl StripeClient {
    /// Create a new Stripe client charging in rand
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            http: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
            currency: Currency::ZAR,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(secret_key.trim()))
    }

    fn build_params<'a>(&self, request: &'a SessionRequest) -> CreateCheckoutSession<'a> {
        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.success_url = Some(request.success_url.as_str());
        params.cancel_url = Some(request.cancel_url.as_str());
        params.customer_email = request.customer_email.as_deref();
        params.billing_address_collection = Some(CheckoutSessionBillingAddressCollection::Required);
        params.metadata = Some(request.metadata());

        params.line_items = Some(
            request
                .items
                .iter()
                .map(|item| CreateCheckoutSessionLineItems {
                    quantity: Some(item.quantity),
                    price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                        currency: self.currency,
                        unit_amount: Some(item.unit_amount),
                        product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                            name: item.name.clone(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
        );

        params
    }
}

/// Map Stripe's session object onto our snapshot via its JSON form, which
/// keeps us independent of the generated type's optionality.
fn snapshot(session: &StripeCheckoutSession) -> Result<ProviderSession> {
    serde_json::to_value(session)
        .and_then(serde_json::from_value)
        .map_err(|e| PaymentError::Stripe(format!("Unexpected checkout session payload: {e}")))
}

#[derive(Debug, Deserialize)]
struct LineItemPage {
    #[serde(default)]
    data: Vec<ProviderLineItem>,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorBody {
    #[serde(default)]
    error: StripeErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl PaymentGateway for StripeClient {
    /// Create a Stripe Checkout session (Hosted approach)
    ///
    /// Returns a URL to redirect the user to Stripe's hosted checkout page.
    async fn create_session(&self, request: &SessionRequest) -> Result<CreatedSession> {
        let params = self.build_params(request);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("Stripe checkout URL is missing.".into()))?;

        Ok(CreatedSession {
            id: session.id.to_string(),
            url,
        })
    }

    async fn retrieve_session(&self, id: &str) -> Result<ProviderSession> {
        let session_id: CheckoutSessionId = id
            .parse()
            .map_err(|_| PaymentError::SessionNotFound(id.to_string()))?;

        let session = StripeCheckoutSession::retrieve(&self.client, &session_id, &[])
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        snapshot(&session)
    }

    async fn list_line_items(&self, session_id: &str) -> Result<Vec<ProviderLineItem>> {
        let url = format!("{STRIPE_API_BASE}/checkout/sessions/{session_id}/line_items");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(&[("limit", LINE_ITEM_PAGE_LIMIT)])
            .send()
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: StripeErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .error
                .message
                .unwrap_or_else(|| format!("Stripe returned {status}"));
            return Err(PaymentError::Stripe(message));
        }

        let page: LineItemPage = response
            .json()
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        Ok(page.data)
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}
