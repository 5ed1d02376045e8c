//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::handlers::{
    create_checkout_session, get_checkout_session, health_check, list_orders, stripe_webhook,
};
use crate::state::AppState;

/// Build the application router
///
/// Unknown paths fall through to the static web client, with `index.html`
/// answering client-side routes such as `/checkout`.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let assets = ServeDir::new(&static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Checkout
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/api/checkout-session/{id}", get(get_checkout_session))

        // Orders
        .route("/api/orders", get(list_orders))
        .route("/api/webhooks/stripe", post(stripe_webhook))

        // Static files (WASM frontend)
        .fallback_service(assets)

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
