use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Client-side request pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Token bucket shared by every request issued through one transport
pub struct RateLimiter {
    limiter: GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(per_second);

        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            limiter: GovernorRateLimiter::direct(quota),
        }
    }

    /// Wait until a request can be made
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a token without waiting
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_is_exhausted_without_waiting() {
        let limiter = RateLimiter::new(RateLimitConfig {
            requests_per_second: 10,
            burst_size: 2,
        });

        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_zero_rate_falls_back_to_one() {
        let limiter = RateLimiter::new(RateLimitConfig {
            requests_per_second: 0,
            burst_size: 0,
        });

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
