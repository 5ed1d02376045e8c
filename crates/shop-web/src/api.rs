//! API Client

use shop_core::api::{CreateSessionRequest, CreateSessionResponse, ErrorResponse, SessionStatus};
use shop_core::checkout::{START_FAILED_MESSAGE, VERIFY_FAILED_MESSAGE};

/// Absolute URL on the serving origin (reqwest needs one in the browser)
fn api_url(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

async fn error_message(response: reqwest::Response, fallback: &str) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .ok()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Open a hosted checkout session; returns the URL to redirect to
pub async fn create_checkout_session(request: &CreateSessionRequest) -> Result<String, String> {
    let response = reqwest::Client::new()
        .post(api_url("/api/create-checkout-session"))
        .json(request)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(error_message(response, START_FAILED_MESSAGE).await);
    }

    let data: CreateSessionResponse = response.json().await.map_err(|e| e.to_string())?;
    if data.url.is_empty() {
        return Err("Stripe checkout URL is missing.".into());
    }

    Ok(data.url)
}

/// Poll a checkout session after the provider redirects back
pub async fn fetch_session(id: &str) -> Result<SessionStatus, String> {
    let mut url = reqwest::Url::parse(&api_url("/api/checkout-session")).map_err(|e| e.to_string())?;
    url.path_segments_mut()
        .map_err(|()| VERIFY_FAILED_MESSAGE.to_string())?
        .push(id);

    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(error_message(response, VERIFY_FAILED_MESSAGE).await);
    }

    response.json().await.map_err(|e| e.to_string())
}
