//! # shop-payments
//!
//! Checkout brokering, payment confirmation and order storage for raven-shop.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  create-session  ┌─────────────────┐  redirect  ┌─────────────┐
//! │  Storefront │─────────────────▶│  Stripe Hosted  │───────────▶│  Checkout   │
//! │   (cart)    │                  │  Checkout Page  │            │  (success)  │
//! └─────────────┘                  └────────┬────────┘            └──────┬──────┘
//!                                           │ checkout.session.completed │ poll
//!                                           ▼                            ▼
//!                                  ┌─────────────────┐          ┌─────────────────┐
//!                                  │ WebhookHandler  │          │  get-session    │
//!                                  │ (writes orders) │          │  (read only)    │
//!                                  └────────┬────────┘          └─────────────────┘
//!                                           ▼
//!                                  ┌─────────────────┐
//!                                  │   OrderStore    │
//!                                  └─────────────────┘
//! ```
//!
//! The webhook is the only writer of orders; the success-page poll only tells
//! the browser whether to clear its cart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shop_payments::{CheckoutBroker, StripeClient};
//!
//! let broker = CheckoutBroker::new(Arc::new(StripeClient::new("sk_test_xxx")));
//! let session = broker.create_session(&payload, "https://shop.example.com").await?;
//!
//! // Redirect the shopper to: session.url
//! ```

mod broker;
mod checkout;
mod error;
mod gateway;
mod mock;
mod orders;
mod webhook;

pub use broker::{CheckoutBroker, CheckoutPayload, CustomerPayload, session_request, validate_items};
pub use checkout::StripeClient;
pub use error::{PaymentError, Result};
pub use gateway::{
    CreatedSession, CustomerDetails, LineItem, PaymentGateway, ProviderLineItem, ProviderSession,
    SessionRequest,
};
pub use mock::MockGateway;
pub use orders::{
    FileOrderStore, MEMORY_STORE_WARNING, MemoryOrderStore, Order, OrderItem, OrderStore,
};
pub use webhook::{
    DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER, WebhookEnvelope, WebhookEvent, WebhookHandler,
    WebhookVerifier,
};
