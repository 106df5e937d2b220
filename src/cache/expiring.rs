// Expiring key-value cache over a Storage backend.
// Each entry carries an absolute expiry in epoch milliseconds.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::store::Storage;

/// Default TTL for cached GitHub data: 1 hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self(AtomicI64::new(now_ms))
    }

    pub fn set(&self, now_ms: i64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.0.fetch_add(duration_ms(by), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// A stored value with its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    /// Absolute expiry, milliseconds since the Unix epoch.
    pub expiry: i64,
}

impl<T> CacheEntry<T> {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expiry
    }
}

/// Key-value cache where every entry expires after its TTL.
///
/// Failures never escape: a storage or decoding error on read is a miss, and
/// a failed write is logged and dropped.
pub struct ExpiringCache<S, C = SystemClock> {
    storage: S,
    clock: C,
    ttl: Duration,
}

impl<S: Storage> ExpiringCache<S, SystemClock> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: Storage, C: Clock> ExpiringCache<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            ttl: DEFAULT_TTL,
        }
    }

    /// Replace the TTL used by `set`.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get a live entry, deleting it if it has expired or cannot be decoded.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(key, error = %e, "Unreadable cache entry, removing");
                self.remove(key);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!(key, error = %e, "Corrupt cache entry, removing");
                self.remove(key);
                return None;
            }
        };

        if !entry.is_valid_at(self.clock.now_ms()) {
            tracing::debug!(key, expiry = entry.expiry, "Cache entry expired");
            self.remove(key);
            return None;
        }

        Some(entry)
    }

    /// Store `value` for the default TTL.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.set_with_ttl(key, value, self.ttl);
    }

    /// Store `value` until `now + ttl`.
    pub fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expiry: self.clock.now_ms().saturating_add(duration_ms(ttl)),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key, error = %e, "Error serializing cache entry");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(key, &json) {
            tracing::error!(key, error = %e, "Error writing to cache storage");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            tracing::warn!(key, error = %e, "Error removing cache entry");
        }
    }
}

fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
