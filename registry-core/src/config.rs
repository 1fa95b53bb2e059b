//! Configuration for the registry

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Owner identity, designated once at startup
    pub owner: String,

    /// Fixed registration price (exact-match; overpayment refunded)
    pub registration_price: Decimal,

    /// Actor mailbox capacity (bounded for backpressure)
    pub mailbox_capacity: usize,

    /// Metrics listen address
    pub metrics_listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "registry-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            owner: "conference-owner".to_string(),
            registration_price: Decimal::new(18, 1), // 1.8
            mailbox_capacity: 1000,
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(owner) = std::env::var("REGISTRY_OWNER") {
            config.owner = owner;
        }

        if let Ok(price) = std::env::var("REGISTRY_PRICE") {
            config.registration_price = price.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid REGISTRY_PRICE {:?}: {}", price, e))
            })?;
        }

        if let Ok(addr) = std::env::var("REGISTRY_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        Ok(config)
    }
}
