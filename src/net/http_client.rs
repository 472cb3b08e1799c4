use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one remote collaborator.
///
/// Idle connections are never pooled: a request may be driven by a runtime
/// that is dropped right after, and a pooled connection would outlive it.
pub fn build_client(request_timeout: Duration) -> Client {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(request_timeout))
        .pool_max_idle_per_host(0)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "http client builder failed, using defaults");
            Client::new()
        })
}
