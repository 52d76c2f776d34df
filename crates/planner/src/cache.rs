//! In-memory key/value cache with a per-entry time-to-live.
//!
//! Keys are content-addressed: any serializable value is reduced to the
//! SHA-256 of its canonical JSON form. Expired entries are only purged when
//! a lookup touches them; nothing runs in the background.
//!
//! The cache does no locking of its own. Share it as
//! `Arc<Mutex<ExpiringCache<V>>>` and never hold the guard across an await.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Time source for entry expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Furthest a [`ManualClock`] can be moved from its origin: 100 years.
const MAX_MANUAL_OFFSET_MS: u64 = 100 * 365 * 24 * 60 * 60 * 1000;

/// A clock that only moves when told to.
///
/// Advancing saturates at [`MAX_MANUAL_OFFSET_MS`] past the origin.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        let _ = self
            .offset_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(ms).min(MAX_MANUAL_OFFSET_MS))
            });
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = Duration::from_millis(self.offset_ms.load(Ordering::SeqCst));
        self.origin.checked_add(offset).unwrap_or(self.origin)
    }
}

/// Reduce `key` to a stable hex digest.
///
/// Object fields are hashed in sorted order, so two equal mappings built in
/// a different insertion order share a key. Values that cannot be
/// serialized fall back to their `Debug` text; distinct keys with the same
/// text will collide.
pub fn cache_key<K: Serialize + Debug + ?Sized>(key: &K) -> String {
    let canonical = match serde_json::to_value(key) {
        // `Value` objects are BTreeMap-backed, so keys come out sorted.
        Ok(value) => value.to_string(),
        Err(e) => {
            debug!(error = %e, "Key not serializable, hashing its debug form");
            format!("{key:?}")
        }
    };
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

/// Content-addressed cache with lazy expiry.
pub struct ExpiringCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value for `key`, if it has not expired. An expired entry
    /// is removed on the way out.
    pub fn get<K: Serialize + Debug + ?Sized>(&mut self, key: &K) -> Option<V> {
        let hash = cache_key(key);
        let now = self.clock.now();

        let live = {
            let entry = self.entries.get(&hash)?;
            now.saturating_duration_since(entry.stored_at) < self.ttl
        };

        if live {
            debug!(key = %hash, "Cache hit");
            self.entries.get(&hash).map(|entry| entry.value.clone())
        } else {
            debug!(key = %hash, "Cache entry expired");
            self.entries.remove(&hash);
            None
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set<K: Serialize + Debug + ?Sized>(&mut self, key: &K, value: V) {
        let hash = cache_key(key);
        self.entries.insert(
            hash,
            CacheEntry {
                stored_at: self.clock.now(),
                value,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, counting expired ones not yet purged.
    pub fn size(&self) -> usize {
        self.entries.len()
    }
}
