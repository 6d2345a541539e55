//! Shared HTTP clients for the collector
//!
//! Clients live for the whole process and are reused by every invocation
//! served by the same execution environment.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Pool settings applied to every collector client
#[derive(Debug, Clone)]
struct HttpClientPoolConfig {
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Duration,
    connect_timeout: Duration,
    tcp_keepalive: Duration,
    user_agent: &'static str,
}

impl Default for HttpClientPoolConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(10),
            tcp_keepalive: Duration::from_secs(60),
            user_agent: concat!("moesif-lambda-rs/", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Timeout-specific client cache
static TIMEOUT_CLIENT_CACHE: OnceCell<Mutex<HashMap<u64, Arc<Client>>>> = OnceCell::new();

/// Get or create a client with a specific timeout
///
/// Clients are cached by timeout in whole seconds.
pub fn client_with_timeout(timeout: Duration) -> Arc<Client> {
    let cache = TIMEOUT_CLIENT_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let timeout_secs = timeout.as_secs();

    cache
        .lock()
        .entry(timeout_secs)
        .or_insert_with(|| {
            debug!(timeout_secs, "Creating cached HTTP client for timeout");
            Arc::new(create_client(timeout))
        })
        .clone()
}

fn create_client(timeout: Duration) -> Client {
    let config = HttpClientPoolConfig::default();

    ClientBuilder::new()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(config.pool_idle_timeout)
        .timeout(timeout)
        .connect_timeout(config.connect_timeout)
        .tcp_keepalive(config.tcp_keepalive)
        .tcp_nodelay(true)
        .user_agent(config.user_agent)
        .build()
        .unwrap_or_else(|e| {
            warn!(
                "Failed to create pooled HTTP client, falling back to default: {}",
                e
            );
            Client::new()
        })
}
