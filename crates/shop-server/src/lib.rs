//! raven-shop HTTP Server
//!
//! Axum-based server brokering Stripe checkout sessions, receiving payment
//! webhooks and serving the storefront's web client.

pub mod app;
pub mod config;
pub mod handlers;
pub mod state;

pub use app::router;
pub use config::{AppConfig, ConfigError, OrderStorage};
pub use state::AppState;
