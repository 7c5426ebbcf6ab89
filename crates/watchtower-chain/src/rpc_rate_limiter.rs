use std::num::NonZeroU32;

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Rate limiter for calls against the execution client.
///
/// Wraps `governor` with a plain requests-per-second quota. If no limit is
/// configured, all calls pass through immediately.
pub struct RpcRateLimiter {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RpcRateLimiter {
    /// `requests_per_second`: maximum requests per second. `None` means unlimited.
    pub fn new(requests_per_second: Option<u32>) -> Self {
        let limiter = requests_per_second.and_then(|rps| {
            NonZeroU32::new(rps).map(|rps| RateLimiter::direct(Quota::per_second(rps)))
        });

        Self { limiter }
    }

    pub(crate) fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until a request can be made according to the rate limit.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
