//! Mock Payment Gateway
//!
//! In-process stand-in for Stripe, for tests and local demos. Sessions it
//! creates start `unpaid`; [`MockGateway::mark_paid`] plays the shopper
//! completing the hosted page.

use std::collections::HashMap;

use async_trait::async_trait;
use shop_core::money::CURRENCY_CODE;
use tokio::sync::Mutex;

use crate::error::{PaymentError, Result};
use crate::gateway::{
    CreatedSession, PaymentGateway, ProviderLineItem, ProviderSession, SessionRequest,
};

#[derive(Clone, Debug)]
struct MockSession {
    session: ProviderSession,
    line_items: Vec<ProviderLineItem>,
}

/// Mock gateway that keeps sessions in memory
#[derive(Debug, Default)]
pub struct MockGateway {
    sessions: Mutex<HashMap<String, MockSession>>,
    created: Mutex<Vec<SessionRequest>>,
    /// When set, every `create_session` fails with this message
    failure: Option<String>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway whose session creation always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Seed a session the provider already knows about
    pub fn with_session(mut self, session: ProviderSession, line_items: Vec<ProviderLineItem>) -> Self {
        self.sessions.get_mut().insert(
            session.id.clone(),
            MockSession {
                session,
                line_items,
            },
        );
        self
    }

    /// Requests received by `create_session`, oldest first
    pub async fn created_requests(&self) -> Vec<SessionRequest> {
        self.created.lock().await.clone()
    }

    /// Mark a session as paid; returns false for unknown ids
    pub async fn mark_paid(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(id) {
            Some(entry) => {
                entry.session.payment_status = Some("paid".into());
                true
            }
            None => false,
        }
    }

    /// Current snapshot of a session, as a webhook would carry it
    pub async fn session(&self, id: &str) -> Option<ProviderSession> {
        self.sessions.lock().await.get(id).map(|s| s.session.clone())
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_session(&self, request: &SessionRequest) -> Result<CreatedSession> {
        if let Some(message) = &self.failure {
            return Err(PaymentError::Stripe(message.clone()));
        }

        let mut created = self.created.lock().await;
        created.push(request.clone());
        let id = format!("cs_test_mock_{}", created.len());
        let url = format!("https://checkout.stripe.com/c/pay/{id}");

        let line_items: Vec<ProviderLineItem> = request
            .items
            .iter()
            .map(|item| ProviderLineItem {
                description: Some(item.name.clone()),
                quantity: Some(item.quantity),
                amount_total: item.amount_total(),
            })
            .collect();

        let session = ProviderSession {
            id: id.clone(),
            url: Some(url.clone()),
            payment_status: Some("unpaid".into()),
            amount_total: Some(
                line_items
                    .iter()
                    .fold(0_i64, |sum, i| sum.saturating_add(i.amount_total)),
            ),
            currency: Some(CURRENCY_CODE.into()),
            customer_email: request.customer_email.clone(),
            customer_details: None,
            metadata: Some(request.metadata()),
        };

        self.sessions.lock().await.insert(
            id.clone(),
            MockSession {
                session,
                line_items,
            },
        );

        Ok(CreatedSession { id, url })
    }

    async fn retrieve_session(&self, id: &str) -> Result<ProviderSession> {
        self.sessions
            .lock()
            .await
            .get(id)
            .map(|s| s.session.clone())
            .ok_or_else(|| PaymentError::SessionNotFound(id.to_string()))
    }

    async fn list_line_items(&self, session_id: &str) -> Result<Vec<ProviderLineItem>> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .map(|s| s.line_items.clone())
            .ok_or_else(|| PaymentError::SessionNotFound(session_id.to_string()))
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}
