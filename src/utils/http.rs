//! HTTP client construction shared by the service API callers.

use std::time::Duration;

/// Per-request timeout for calls to the analysis service.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client whose requests fail after `timeout` instead of waiting forever.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("ruling-harness")
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
