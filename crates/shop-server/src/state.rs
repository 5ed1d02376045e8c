//! Application State

use std::sync::Arc;

use shop_payments::{CheckoutBroker, OrderStore, PaymentGateway, WebhookHandler, WebhookVerifier};

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (None if Stripe is not configured)
    pub gateway: Option<Arc<dyn PaymentGateway>>,

    /// Webhook signature verifier (None if no endpoint secret is configured)
    pub webhook: Option<Arc<WebhookVerifier>>,

    /// Paid order storage
    pub orders: Arc<dyn OrderStore>,

    /// Server configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        gateway: Option<Arc<dyn PaymentGateway>>,
        webhook: Option<WebhookVerifier>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            gateway,
            webhook: webhook.map(Arc::new),
            orders,
            config: Arc::new(config),
        }
    }

    /// Checkout broker over the configured gateway
    pub fn broker(&self) -> Option<CheckoutBroker> {
        self.gateway.clone().map(CheckoutBroker::new)
    }

    /// Webhook handler, available only when both Stripe and the secret are set
    pub fn webhook_handler(&self) -> Option<(Arc<WebhookVerifier>, WebhookHandler)> {
        let verifier = self.webhook.clone()?;
        let gateway = self.gateway.clone()?;
        Some((verifier, WebhookHandler::new(gateway, self.orders.clone())))
    }
}
