use std::time::Instant;

use tokio::time::{interval, Duration};

use crate::RateLimits;

pub const EVICTION_INTERVAL: Duration = Duration::from_secs(30);

/// Periodically drops limiter entries whose windows have all expired.
pub async fn start_limiter_eviction_task(limits: RateLimits) {
    let mut interval = interval(EVICTION_INTERVAL);

    loop {
        interval.tick().await;

        let now = Instant::now();
        let evicted: usize = limits.all().iter().map(|store| store.evict_idle(now)).sum();
        if evicted > 0 {
            tracing::debug!("Evicted {} idle rate limit entries", evicted);
        }
    }
}
