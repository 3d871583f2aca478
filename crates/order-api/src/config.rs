//! # Configuration
//!
//! Every setting comes from the environment and falls back to a documented default.
//! Each struct has a `from_env()` constructor and a `from_lookup()` twin that takes the
//! variable source as a closure, so tests never touch the process environment.
//!
//! Absent variables use their defaults. Present but malformed values (a port that is
//! not a number, a zero concurrency) are startup errors.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_API_PORT: u16 = 5000;
pub const DEFAULT_BASE_URL: &str = "http://localhost";
pub const DEFAULT_SIDECAR_HTTP_PORT: u16 = 3500;
pub const DEFAULT_PUBSUB_NAME: &str = "orderpubsub";
pub const DEFAULT_ORDERS_TOPIC: &str = "orders";
pub const DEFAULT_DEAD_LETTER_TOPIC: &str = "deadletters";
pub const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_CONCURRENCY: usize = 8;

pub const US_EVENTS_URL: &str = "https://insights-collector.newrelic.com";
pub const EU_EVENTS_URL: &str = "https://insights-collector.eu01.nr-data.net";

/// Reads a variable and parses it, keeping `default` when it is absent or blank.
pub fn parse_or<L, T>(lookup: &L, key: &str, default: T) -> Result<T>
where
    L: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("parse {key}={value}")),
        None => Ok(default),
    }
}

fn string_or<L>(lookup: &L, key: &str, default: &str) -> String
where
    L: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Where the local sidecar listens (`BASE_URL`, `DAPR_HTTP_PORT`).
#[derive(Debug, Clone, PartialEq)]
pub struct SidecarConfig {
    pub base_url: String,
    pub http_port: u16,
}

impl SidecarConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self> {
        let base_url = string_or(&lookup, "BASE_URL", DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let http_port = parse_or(&lookup, "DAPR_HTTP_PORT", DEFAULT_SIDECAR_HTTP_PORT)?;
        Ok(Self {
            base_url,
            http_port,
        })
    }

    /// `{base_url}:{port}`, the prefix of every sidecar API call.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.base_url, self.http_port)
    }
}

/// Pub/sub component and topic names. Immutable once loaded and shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct PubSubConfig {
    pub pubsub_name: String,
    pub orders_topic: String,
    pub dead_letter_topic: String,
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            pubsub_name: DEFAULT_PUBSUB_NAME.to_string(),
            orders_topic: DEFAULT_ORDERS_TOPIC.to_string(),
            dead_letter_topic: DEFAULT_DEAD_LETTER_TOPIC.to_string(),
        }
    }
}

impl PubSubConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self> {
        let config = Self {
            pubsub_name: string_or(&lookup, "PUBSUB_NAME", DEFAULT_PUBSUB_NAME),
            orders_topic: string_or(&lookup, "ORDERS_TOPIC", DEFAULT_ORDERS_TOPIC),
            dead_letter_topic: string_or(&lookup, "DEAD_LETTER_TOPIC", DEFAULT_DEAD_LETTER_TOPIC),
        };
        if config.orders_topic == config.dead_letter_topic {
            bail!(
                "DEAD_LETTER_TOPIC must differ from ORDERS_TOPIC (both are {})",
                config.orders_topic
            );
        }
        Ok(config)
    }
}

/// Credentials and endpoint of the monitoring event API.
///
/// Missing credentials are not a startup error: the reporter logs each failed forward
/// and keeps answering 200.
#[derive(Clone, PartialEq)]
pub struct MonitoringConfig {
    pub account_id: Option<String>,
    pub insert_key: Option<String>,
    pub events_base_url: String,
}

// The insert key stays out of logs.
impl std::fmt::Debug for MonitoringConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringConfig")
            .field("account_id", &self.account_id)
            .field("insert_key", &self.insert_key.as_ref().map(|_| "<redacted>"))
            .field("events_base_url", &self.events_base_url)
            .finish()
    }
}

impl MonitoringConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let region_default = match non_blank("NEW_RELIC_REGION").as_deref() {
            Some("EU") => EU_EVENTS_URL,
            _ => US_EVENTS_URL,
        };
        let events_base_url = string_or(&lookup, "NEW_RELIC_EVENTS_URL", region_default)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            account_id: non_blank("NEW_RELIC_ACCOUNT_ID"),
            insert_key: non_blank("NEW_RELIC_INSERT_KEY"),
            events_base_url,
        })
    }
}

/// Sizing of the background publish pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolConfig {
    pub queue_capacity: usize,
    pub concurrency: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PoolConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self> {
        let queue_capacity = parse_or(&lookup, "PUBLISH_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?;
        let concurrency = parse_or(&lookup, "PUBLISH_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        if queue_capacity == 0 || concurrency == 0 {
            bail!("PUBLISH_QUEUE_CAPACITY and PUBLISH_CONCURRENCY must be at least 1");
        }
        Ok(Self {
            queue_capacity,
            concurrency,
        })
    }
}

/// Timeout applied to every outbound HTTP call (`OUTBOUND_TIMEOUT_SECS`).
pub fn outbound_timeout_from_lookup<L: Fn(&str) -> Option<String>>(lookup: &L) -> Result<Duration> {
    let secs = parse_or(lookup, "OUTBOUND_TIMEOUT_SECS", DEFAULT_OUTBOUND_TIMEOUT_SECS)?;
    if secs == 0 {
        bail!("OUTBOUND_TIMEOUT_SECS must be at least 1");
    }
    Ok(Duration::from_secs(secs))
}

/// Listen address for a service on `APP_PORT`, all interfaces.
pub fn bind_addr_from_lookup<L: Fn(&str) -> Option<String>>(
    lookup: &L,
    default_port: u16,
) -> Result<SocketAddr> {
    let port = parse_or(lookup, "APP_PORT", default_port)?;
    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Everything the order API needs at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub sidecar: SidecarConfig,
    pub pubsub: PubSubConfig,
    pub monitoring: MonitoringConfig,
    pub pool: PoolConfig,
    pub outbound_timeout: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self> {
        Ok(Self {
            bind_addr: bind_addr_from_lookup(&lookup, DEFAULT_API_PORT)?,
            sidecar: SidecarConfig::from_lookup(&lookup).context("sidecar configuration")?,
            pubsub: PubSubConfig::from_lookup(&lookup).context("pub/sub configuration")?,
            monitoring: MonitoringConfig::from_lookup(&lookup)
                .context("monitoring configuration")?,
            pool: PoolConfig::from_lookup(&lookup).context("publish pool configuration")?,
            outbound_timeout: outbound_timeout_from_lookup(&lookup)?,
        })
    }
}
