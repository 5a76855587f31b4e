//! HTTP Client Pool for maintaining persistent connections per base URL.
//!
//! Every backend adapter asks this pool for its `reqwest::Client`, so adapters pointing at the
//! same provider share one connection pool:
//! - HTTP connections are reused across turns
//! - DNS lookups and TLS handshakes are not repeated per request
//!
//! Clients carry no global timeout; each adapter sets its own bound per request.

use lazy_static::lazy_static;
use log::warn;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

lazy_static! {
    /// Global HTTP client pool, keyed by base URL.
    static ref HTTP_CLIENT_POOL: Mutex<HashMap<String, reqwest::Client>> =
        Mutex::new(HashMap::new());
}

/// Get or create a shared HTTP client for the given base URL.
pub fn get_http_client(base_url: &str) -> reqwest::Client {
    let mut pool = HTTP_CLIENT_POOL
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(client) = pool.get(base_url) {
        return client.clone();
    }

    let client = create_pooled_client();
    pool.insert(base_url.to_string(), client.clone());
    client
}

fn create_pooled_client() -> reqwest::Client {
    reqwest::ClientBuilder::new()
        // Keep idle connections alive for 90 seconds
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|err| {
            warn!(
                "duologue::http_client_pool: falling back to default client: {}",
                err
            );
            reqwest::Client::new()
        })
}
