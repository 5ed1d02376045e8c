//! raven-shop server binary

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_payments::{
    FileOrderStore, MemoryOrderStore, OrderStore, PaymentGateway, StripeClient, WebhookVerifier,
};
use shop_server::{AppConfig, AppState, OrderStorage, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Initialize payments
    let gateway: Option<Arc<dyn PaymentGateway>> = match StripeClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Stripe configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - checkout disabled ({})", e);
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
            None
        }
    };

    let webhook = WebhookVerifier::from_env()
        .inspect_err(|_| {
            tracing::warn!("⚠ STRIPE_WEBHOOK_SECRET not set - payment webhooks will be rejected");
        })
        .ok();

    let orders: Arc<dyn OrderStore> = match &config.order_storage {
        OrderStorage::File(path) => {
            tracing::info!("Orders file: {}", path.display());
            Arc::new(FileOrderStore::new(path))
        }
        OrderStorage::Memory => Arc::new(MemoryOrderStore::new()),
    };

    let addr = config.bind_addr;
    let state = AppState::new(config, gateway, webhook, orders);
    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server running at http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                      - Health check");
    tracing::info!("  POST /api/create-checkout-session - Start Stripe checkout");
    tracing::info!("  GET  /api/checkout-session/:id    - Poll payment status");
    tracing::info!("  GET  /api/orders                  - Paid orders");
    tracing::info!("  POST /api/webhooks/stripe         - Stripe events");

    axum::serve(listener, app).await?;

    Ok(())
}
