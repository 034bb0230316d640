use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::rate_limiter::RateLimitConfig;

/// LN Markets REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.lnmarkets.com";
/// LN Markets API version segment
pub const DEFAULT_API_VERSION: &str = "v1";

/// Retry policy applied by the HTTP transport
///
/// Connection failures, 429 and 5xx (except 501) are retried with an
/// exponential backoff bounded by `wait_min_ms` and `wait_max_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub wait_min_ms: u64,
    pub wait_max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            wait_min_ms: 1_000,
            wait_max_ms: 30_000,
        }
    }
}

impl RetryConfig {
    /// No retries at all
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let wait = self.wait_min_ms.saturating_mul(factor).min(self.wait_max_ms);
        Duration::from_millis(wait)
    }
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub version: String,
    /// Per-attempt timeout on the HTTP client
    pub timeout_secs: u64,
    /// Deadline for a whole call, retries included
    pub call_timeout_secs: Option<u64>,
    pub retry: RetryConfig,
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 30,
            call_timeout_secs: None,
            retry: RetryConfig::default(),
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, with `LNMARKETS_BASE_URL` overriding the endpoint when set
    pub fn from_env() -> Self {
        match std::env::var("LNMARKETS_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_call_timeout(mut self, secs: u64) -> Self {
        self.call_timeout_secs = Some(secs);
        self
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }
}
