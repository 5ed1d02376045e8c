//! HTTP Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use shop_core::api::{CreateSessionResponse, ErrorResponse, SessionStatus};
use shop_payments::{CheckoutPayload, MEMORY_STORE_WARNING, Order, SIGNATURE_HEADER};

use crate::state::AppState;

const STRIPE_NOT_CONFIGURED: &str = "Stripe secret key not configured.";
const WEBHOOK_NOT_CONFIGURED: &str = "Stripe webhook is not configured.";
const SESSION_NOT_FOUND: &str = "Session not found.";

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
    pub webhook_configured: bool,
    pub durable_orders: bool,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: state.gateway.is_some(),
        webhook_configured: state.webhook_handler().is_some(),
        durable_orders: state.orders.is_durable(),
    })
}

/// Origin for payment redirect URLs
fn request_origin(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.public_url {
        return url.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| state.config.bind_addr.to_string(), str::to_string);
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map_or("http", str::trim);

    format!("{scheme}://{host}")
}

/// Create Stripe checkout session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CheckoutPayload>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let broker = state
        .broker()
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, STRIPE_NOT_CONFIGURED))?;

    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable checkout body");
        api_error(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let origin = request_origin(&state, &headers);

    let session = broker.create_session(&payload, &origin).await.map_err(|e| {
        if e.is_validation() {
            api_error(StatusCode::BAD_REQUEST, e.user_message())
        } else {
            tracing::error!(error = %e, "Checkout error");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
        }
    })?;

    Ok(Json(CreateSessionResponse { url: session.url }))
}

/// Poll a checkout session's payment status
pub async fn get_checkout_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatus>, ApiError> {
    let broker = state
        .broker()
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, STRIPE_NOT_CONFIGURED))?;

    let status = broker.get_session(&id).await.map_err(|e| {
        tracing::debug!(session_id = %id, error = %e, "Session lookup failed");
        api_error(StatusCode::NOT_FOUND, SESSION_NOT_FOUND)
    })?;

    Ok(Json(status))
}

/// List recorded orders
pub async fn list_orders(State(state): State<AppState>) -> Response {
    let orders = state.orders.list().await;

    if state.orders.is_durable() {
        Json(OrdersResponse {
            orders,
            warning: None,
        })
        .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(OrdersResponse {
                orders,
                warning: Some(MEMORY_STORE_WARNING.into()),
            }),
        )
            .into_response()
    }
}

/// Stripe webhook handler
///
/// Takes the raw body: the signature covers the exact bytes Stripe sent.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let (verifier, handler) = state
        .webhook_handler()
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, WEBHOOK_NOT_CONFIGURED))?;

    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    let event = verifier.verify(&body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Webhook signature failed");
        api_error(StatusCode::BAD_REQUEST, e.user_message())
    })?;

    handler.handle(event).await.map_err(|e| {
        tracing::error!(error = %e, "Webhook processing error");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
    })?;

    Ok(Json(WebhookAck { received: true }))
}
