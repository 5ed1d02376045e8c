//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `BIND_ADDR` - Listen address (default: `0.0.0.0:$PORT`)
//! - `PORT` - Listen port when `BIND_ADDR` is unset (default: 3000)
//! - `PUBLIC_URL` - Origin used in payment redirect URLs (default: taken from
//!   the request's `Host` header)
//! - `STATIC_DIR` - Directory with the built web client (default: `static`)
//! - `ORDERS_FILE` - JSON file holding paid orders (default: `data/orders.json`)
//! - `ORDER_STORAGE` - `file` or `memory` (default: `file`)
//! - `VERCEL` - When set, the host is stateless and orders stay in memory
//!
//! Stripe credentials (`STRIPE_SECRET_KEY`, `STRIPE_WEBHOOK_SECRET`) are read
//! by `shop-payments`; both are optional and disable their features when
//! missing.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_ORDERS_FILE: &str = "data/orders.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where paid orders are kept
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderStorage {
    /// JSON array in a file
    File(PathBuf),

    /// Process memory; lost on restart
    Memory,
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub public_url: Option<String>,
    pub static_dir: PathBuf,
    pub order_storage: OrderStorage,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            public_url: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            order_storage: OrderStorage::File(PathBuf::from(DEFAULT_ORDERS_FILE)),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(addr) => addr
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("BIND_ADDR".into(), format!("{e}")))?,
            None => {
                let port = match get("PORT") {
                    Some(port) => port
                        .parse::<u16>()
                        .map_err(|e| ConfigError::InvalidEnvVar("PORT".into(), format!("{e}")))?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let stateless = get("VERCEL").is_some();
        let order_storage = match get("ORDER_STORAGE").as_deref() {
            Some("memory") => OrderStorage::Memory,
            Some("file") | None if !stateless => OrderStorage::File(PathBuf::from(
                get("ORDERS_FILE").unwrap_or_else(|| DEFAULT_ORDERS_FILE.into()),
            )),
            Some("file") | None => OrderStorage::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "ORDER_STORAGE".into(),
                    format!("expected `file` or `memory`, got `{other}`"),
                ));
            }
        };

        Ok(Self {
            bind_addr,
            public_url: get("PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
            static_dir: get("STATIC_DIR").map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            order_storage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.order_storage, OrderStorage::File(PathBuf::from("data/orders.json")));
        assert_eq!(config.public_url, None);
    }

    #[test]
    fn test_port_and_bind_addr() {
        assert_eq!(load(&[("PORT", "8080")]).unwrap().bind_addr.port(), 8080);

        let config = load(&[("PORT", "8080"), ("BIND_ADDR", "127.0.0.1:9000")]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");

        assert!(load(&[("PORT", "http")]).is_err());
    }

    #[test]
    fn test_stateless_host_uses_memory() {
        let config = load(&[("VERCEL", "1"), ("ORDERS_FILE", "/tmp/orders.json")]).unwrap();
        assert_eq!(config.order_storage, OrderStorage::Memory);

        let config = load(&[("ORDER_STORAGE", "memory")]).unwrap();
        assert_eq!(config.order_storage, OrderStorage::Memory);

        assert!(load(&[("ORDER_STORAGE", "postgres")]).is_err());
    }

    #[test]
    fn test_public_url_trailing_slash() {
        let config = load(&[("PUBLIC_URL", "https://shop.example.com/")]).unwrap();
        assert_eq!(config.public_url.as_deref(), Some("https://shop.example.com"));
    }
}
