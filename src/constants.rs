use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

/// Captured on first access; `main` forces it at startup.
pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub fn uptime() -> Duration {
    let seconds = Utc::now().signed_duration_since(*START_TIME).num_seconds();
    Duration::from_secs(seconds.max(0) as u64)
}
