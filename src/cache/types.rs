//! Cache data structures.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::fetch::Headers;

/// One cached fetch outcome.
///
/// Serialized as a named record under its URL key; `url` itself is not
/// written, it is restored from the key on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(skip)]
    pub url: String,
    /// Seconds since the Unix epoch
    pub fetched_at: f64,
    pub status_code: Option<u16>,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub body: String,
    /// The redirect chain was cut off by the hop limit; the status is the last 3xx
    #[serde(default)]
    pub hop_limit_exceeded: bool,
}

/// The whole cache document: URL exactly as requested → entry.
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Source of the current time, in seconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        chrono::Utc::now().timestamp_millis() as f64 / 1000.0
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, secs: f64) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) += secs;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}
