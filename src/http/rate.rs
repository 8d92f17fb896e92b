use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Total number of requests allowed in the current window.
pub const HEADER_RATE_LIMIT: &str = "x-ratelimit-limit";
/// Requests left in the current window.
pub const HEADER_RATE_REMAINING: &str = "x-ratelimit-remaining";
/// End of the current window, UTC epoch seconds.
pub const HEADER_RATE_RESET: &str = "x-ratelimit-reset";

/// Rate limit counters reported by the API on a single response.
///
/// Every field is read from its own header. A missing or unparsable header
/// leaves the field at zero (or `None` for the reset time), so partial
/// snapshots are normal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rate {
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: Option<DateTime<Utc>>,
    /// Seconds to wait before the next attempt.
    pub retry_after: u64,
}

impl Rate {
    pub fn retry_after_duration(&self) -> Duration {
        Duration::from_secs(self.retry_after)
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

pub fn parse_rate(headers: &HeaderMap) -> Rate {
    let reset_at = headers
        .get(HEADER_RATE_RESET)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|epoch| *epoch != 0)
        .and_then(|epoch| DateTime::<Utc>::from_timestamp(epoch, 0));
    Rate {
        limit: header_u64(headers, HEADER_RATE_LIMIT).unwrap_or_default(),
        remaining: header_u64(headers, HEADER_RATE_REMAINING).unwrap_or_default(),
        reset_at,
        retry_after: header_u64(headers, RETRY_AFTER.as_str()).unwrap_or_default(),
    }
}

/// Latest rate snapshot seen by a client. Only the most recent one is kept.
#[derive(Debug, Default)]
pub struct RateTracker {
    current: Mutex<Rate>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, rate: Rate) {
        *self.current.lock() = rate;
    }

    pub fn current(&self) -> Rate {
        *self.current.lock()
    }
}
