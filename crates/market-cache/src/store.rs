//! Expiring in-memory store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use market_core::SharedClock;
use serde::Serialize;

use crate::key::{CacheFamily, CacheKey};

/// Default entry lifetime: 30 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Status of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Entry present and not expired.
    Hit,
    /// Entry present but expired.
    Stale,
    /// No entry.
    Miss,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Stale => write!(f, "STALE"),
            Self::Miss => write!(f, "MISS"),
        }
    }
}

/// A cached value with its absolute expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached value.
    pub value: V,
    /// When the entry was written.
    pub stored_at: DateTime<Utc>,
    /// When the entry stops being served as fresh.
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Fresh while `now < expires_at`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Time left before expiry.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<V> {
    /// The value, when any entry exists.
    pub value: Option<V>,
    /// Lookup status.
    pub status: CacheStatus,
}

impl<V> CacheLookup<V> {
    fn hit(value: V) -> Self {
        Self {
            value: Some(value),
            status: CacheStatus::Hit,
        }
    }

    fn stale(value: V) -> Self {
        Self {
            value: Some(value),
            status: CacheStatus::Stale,
        }
    }

    fn miss() -> Self {
        Self {
            value: None,
            status: CacheStatus::Miss,
        }
    }

    /// The value, only if fresh.
    pub fn fresh(self) -> Option<V> {
        match self.status {
            CacheStatus::Hit => self.value,
            _ => None,
        }
    }
}

/// Snapshot of cache contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    /// Number of entries, fresh or not.
    pub size: usize,
    /// Every key.
    pub keys: Vec<String>,
    /// Keys whose entry is still fresh.
    pub valid_keys: Vec<String>,
}

/// TTL cache keyed by [`CacheKey`].
///
/// Constructed explicitly and handed to whoever needs it; there is no
/// process-wide instance. Every operation takes the lock for a single map
/// access and never across an `.await`.
pub struct TtlCache<V> {
    entries: Mutex<BTreeMap<CacheKey, CacheEntry<V>>>,
    clock: SharedClock,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the default 30-minute TTL.
    pub fn new(clock: SharedClock) -> Self {
        Self::with_ttl(clock, DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(clock: SharedClock, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            clock,
            ttl,
        }
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up an entry and classify it.
    pub fn lookup(&self, key: &CacheKey) -> CacheLookup<V> {
        let now = self.clock.now();
        match self.lock().get(key) {
            Some(entry) if entry.is_fresh(now) => CacheLookup::hit(entry.value.clone()),
            Some(entry) => CacheLookup::stale(entry.value.clone()),
            None => CacheLookup::miss(),
        }
    }

    /// The value, only if not expired.
    pub fn get_fresh(&self, key: &CacheKey) -> Option<V> {
        self.lookup(key).fresh()
    }

    /// The value, even if expired.
    pub fn get_any(&self, key: &CacheKey) -> Option<V> {
        self.lookup(key).value
    }

    /// Store a value; its expiry becomes `now + ttl`.
    pub fn insert(&self, key: CacheKey, value: V) {
        let now = self.clock.now();
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        tracing::debug!(cache_key = %key, "cache write");
        self.lock().insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                expires_at,
            },
        );
    }

    /// Remove one entry.
    pub fn remove(&self, key: &CacheKey) -> Option<V> {
        self.lock().remove(key).map(|e| e.value)
    }

    /// Remove every entry of a family. Returns how many were dropped.
    pub fn invalidate_family(&self, family: CacheFamily) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| key.family() != family);
        let removed = before - entries.len();
        tracing::debug!(family = %family, removed, "cache family invalidated");
        removed
    }

    /// Remove everything.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries, fresh or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of keys and which of them are fresh.
    pub fn info(&self) -> CacheInfo {
        let now = self.clock.now();
        let entries = self.lock();
        CacheInfo {
            size: entries.len(),
            keys: entries.keys().map(|k| k.to_string()).collect(),
            valid_keys: entries
                .iter()
                .filter(|(_, e)| e.is_fresh(now))
                .map(|(k, _)| k.to_string())
                .collect(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<CacheKey, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
