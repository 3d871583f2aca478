//! Frontend configuration. Shares the sidecar, pub/sub and pool settings (and their
//! variable names) with the order API.

use anyhow::{Context, Result};
use order_api::config::{
    bind_addr_from_lookup, outbound_timeout_from_lookup, PoolConfig, PubSubConfig, SidecarConfig,
};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_FRONTEND_PORT: u16 = 5001;
pub const DEFAULT_API_APP_ID: &str = "api";

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub bind_addr: SocketAddr,
    pub sidecar: SidecarConfig,
    pub pubsub: PubSubConfig,
    /// App id of the order API for service invocation (`API_APP_ID`).
    pub api_app_id: String,
    pub pool: PoolConfig,
    pub outbound_timeout: Duration,
}

impl FrontendConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self> {
        Ok(Self {
            bind_addr: bind_addr_from_lookup(&lookup, DEFAULT_FRONTEND_PORT)?,
            sidecar: SidecarConfig::from_lookup(&lookup).context("sidecar configuration")?,
            pubsub: PubSubConfig::from_lookup(&lookup).context("pub/sub configuration")?,
            api_app_id: lookup("API_APP_ID")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_APP_ID.to_string()),
            pool: PoolConfig::from_lookup(&lookup).context("publish pool configuration")?,
            outbound_timeout: outbound_timeout_from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FrontendConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.port(), 5001);
        assert_eq!(config.api_app_id, "api");
        assert_eq!(config.pubsub.orders_topic, "orders");
        assert_eq!(config.sidecar.endpoint(), "http://localhost:3500");
    }

    #[test]
    fn app_id_and_port_are_overridable() {
        let config = FrontendConfig::from_lookup(|key| match key {
            "API_APP_ID" => Some("orders-api".to_string()),
            "APP_PORT" => Some("8080".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_app_id, "orders-api");
        assert_eq!(config.bind_addr.port(), 8080);
    }
}
