//! Order Storage
//!
//! Orders are recorded only when the payment provider confirms a completed
//! checkout. Stores keep the list newest first and replace by id, so a
//! redelivered event never duplicates an order.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{PaymentError, Result};
use crate::gateway::{ProviderLineItem, ProviderSession};

/// Warning surfaced when orders only live in process memory
pub const MEMORY_STORE_WARNING: &str =
    "Persistent order storage is unavailable on Vercel without a database.";

/// A purchased line on an order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: Option<u64>,
    /// Total in cents
    pub amount_total: i64,
}

impl From<ProviderLineItem> for OrderItem {
    fn from(item: ProviderLineItem) -> Self {
        Self {
            name: item.description.unwrap_or_default(),
            quantity: item.quantity,
            amount_total: item.amount_total,
        }
    }
}

/// A paid order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Checkout session id
    pub id: String,
    pub payment_status: String,
    pub customer_email: String,
    pub customer_name: String,
    pub currency: Option<String>,
    /// Total in cents
    pub total: Option<i64>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from a completed session and its line items
    pub fn from_session(session: &ProviderSession, line_items: Vec<ProviderLineItem>) -> Self {
        Self {
            id: session.id.clone(),
            payment_status: session.payment_status().to_string(),
            customer_email: session.email(),
            customer_name: session.customer_name(),
            currency: session.currency.clone(),
            total: session.amount_total,
            items: line_items.into_iter().map(OrderItem::from).collect(),
            created_at: Utc::now(),
        }
    }
}

/// Replace any order with the same id and put the new one first
pub fn upsert_into(orders: &mut Vec<Order>, order: Order) {
    orders.retain(|existing| existing.id != order.id);
    orders.insert(0, order);
}

/// Order storage trait
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, newest first; unreadable storage yields an empty list
    async fn list(&self) -> Vec<Order>;

    /// Insert or replace by id
    async fn upsert(&self, order: Order) -> Result<()>;

    /// Whether orders survive a restart
    fn is_durable(&self) -> bool;
}

/// Orders kept as a JSON array in a single file
///
/// Read-modify-write is not atomic: concurrent upserts may lose one another.
#[derive(Clone, Debug)]
pub struct FileOrderStore {
    path: PathBuf,
}

impl FileOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write_all(&self, orders: &[Order]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PaymentError::Storage(format!("{}: {e}", parent.display())))?;
        }

        let json = serde_json::to_string_pretty(orders)
            .map_err(|e| PaymentError::Storage(e.to_string()))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| PaymentError::Storage(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl OrderStore for FileOrderStore {
    async fn list(&self) -> Vec<Order> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "No order file");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable order file");
            Vec::new()
        })
    }

    async fn upsert(&self, order: Order) -> Result<()> {
        let mut orders = self.list().await;
        upsert_into(&mut orders, order);
        self.write_all(&orders).await
    }

    fn is_durable(&self) -> bool {
        true
    }
}

/// Process-local order storage for stateless hosting
#[derive(Debug)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        tracing::warn!("Order history is kept in memory and will not survive a restart");
        Self {
            orders: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    async fn upsert(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        upsert_into(&mut orders, order);
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
