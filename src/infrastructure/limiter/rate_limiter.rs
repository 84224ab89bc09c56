use std::{
    collections::VecDeque,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use derive_more::Display;
use parking_lot::Mutex;

/// One "N per period" rule, e.g. `5 per hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub limit: u64,
    pub window: Duration,
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum RateLimitParseError {
    #[display("Empty rate limit rule")]
    Empty,

    #[display("Invalid rate limit count in '{_0}'")]
    InvalidCount(String),

    #[display("Unknown rate limit period in '{_0}'")]
    InvalidPeriod(String),
}

impl std::error::Error for RateLimitParseError {}

impl RateLimitRule {
    pub fn new(limit: u64, window: Duration) -> Self {
        Self { limit, window }
    }
}

fn unit_seconds(unit: &str) -> Option<u64> {
    match unit.trim_end_matches('s') {
        "second" | "sec" => Some(1),
        "minute" | "min" => Some(60),
        "hour" => Some(60 * 60),
        "day" => Some(60 * 60 * 24),
        _ => None,
    }
}

impl FromStr for RateLimitRule {
    type Err = RateLimitParseError;

    /// Accepts `5 per hour`, `5/hour`, `10 per 2 minutes` and `10/2 minutes`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule = s.trim().to_lowercase();
        if rule.is_empty() {
            return Err(RateLimitParseError::Empty);
        }

        let (count, period) = rule
            .split_once('/')
            .or_else(|| rule.split_once(" per "))
            .ok_or_else(|| RateLimitParseError::InvalidPeriod(s.trim().to_string()))?;

        let limit: u64 = count
            .trim()
            .parse()
            .map_err(|_| RateLimitParseError::InvalidCount(s.trim().to_string()))?;

        let mut parts = period.split_whitespace();
        let (multiplier, unit) = match (parts.next(), parts.next(), parts.next()) {
            (Some(unit), None, None) => (1, unit),
            (Some(n), Some(unit), None) => {
                let n: u64 = n
                    .parse()
                    .map_err(|_| RateLimitParseError::InvalidPeriod(s.trim().to_string()))?;
                (n, unit)
            }
            _ => return Err(RateLimitParseError::InvalidPeriod(s.trim().to_string())),
        };

        let seconds = unit_seconds(unit)
            .filter(|_| multiplier > 0)
            .and_then(|unit| unit.checked_mul(multiplier))
            .ok_or_else(|| RateLimitParseError::InvalidPeriod(s.trim().to_string()))?;

        Ok(RateLimitRule::new(limit, Duration::from_secs(seconds)))
    }
}

/// Parses a list of rules separated by commas or semicolons.
pub fn parse_rules(spec: &str) -> Result<Vec<RateLimitRule>, RateLimitParseError> {
    spec.split([',', ';'])
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Outcome of a single rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u64,
    pub retry_after: Option<Duration>,
}

impl RateDecision {
    fn unlimited() -> Self {
        Self { allowed: true, remaining: u64::MAX, retry_after: None }
    }

    /// Whole seconds until the client may retry, never less than one.
    pub fn retry_after_secs(&self) -> u64 {
        self.retry_after
            .map(|d| d.as_secs() + u64::from(d.subsec_nanos() > 0))
            .unwrap_or(0)
            .max(1)
    }
}

/// Sliding log of accepted hits for one client, one deque per rule.
#[derive(Debug)]
struct ClientLog {
    hits: Vec<VecDeque<Instant>>,
    last_seen: Instant,
}

impl ClientLog {
    fn new(rules: usize, now: Instant) -> Self {
        Self {
            hits: (0..rules).map(|_| VecDeque::new()).collect(),
            last_seen: now,
        }
    }

    /// A hit is recorded against every rule only when all of them allow it.
    fn check(&mut self, rules: &[RateLimitRule], now: Instant) -> RateDecision {
        self.last_seen = now;

        let mut retry_after: Option<Duration> = None;
        for (rule, hits) in rules.iter().zip(self.hits.iter_mut()) {
            while hits
                .front()
                .is_some_and(|t| now.saturating_duration_since(*t) >= rule.window)
            {
                hits.pop_front();
            }

            if hits.len() as u64 >= rule.limit {
                let wait = hits
                    .front()
                    .map(|oldest| rule.window.saturating_sub(now.saturating_duration_since(*oldest)))
                    .unwrap_or(rule.window);
                retry_after = Some(retry_after.map_or(wait, |current| current.max(wait)));
            }
        }

        if retry_after.is_some() {
            return RateDecision { allowed: false, remaining: 0, retry_after };
        }

        let mut remaining = u64::MAX;
        for (rule, hits) in rules.iter().zip(self.hits.iter_mut()) {
            hits.push_back(now);
            remaining = remaining.min(rule.limit - hits.len() as u64);
        }

        RateDecision { allowed: true, remaining, retry_after: None }
    }
}

// --- Per-client limiter store ---
type Key = String;

/// In-process limiter keyed by client address. State is lost on restart and
/// is not shared between processes.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<Key, Arc<Mutex<ClientLog>>>>,
    rules: Arc<[RateLimitRule]>,
}

impl RateLimiterStore {
    pub fn new(rules: Vec<RateLimitRule>) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            rules: rules.into(),
        }
    }

    fn get_log(&self, key: &str, now: Instant) -> Arc<Mutex<ClientLog>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ClientLog::new(self.rules.len(), now))))
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        if self.rules.is_empty() {
            return RateDecision::unlimited();
        }
        let log = self.get_log(key, now);
        let mut log = log.lock();
        log.check(&self.rules, now)
    }

    /// Drops clients idle for longer than the widest window. Returns how many were removed.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let ttl = self
            .rules
            .iter()
            .map(|r| r.window)
            .max()
            .unwrap_or_default();

        // retain checks and removes under the same shard lock
        let mut evicted = 0;
        self.map.retain(|_, log| {
            let keep = now.saturating_duration_since(log.lock().last_seen) <= ttl;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }
}
