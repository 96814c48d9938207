//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and idle tracking.

use std::sync::OnceLock;
use std::time::Instant;

use crate::models::Product;

// == Cache Entry ==
/// A snapshot of a product taken at miss-fill time, plus its clocks.
///
/// The value is never mutated after creation; an update replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored snapshot
    pub value: Product,
    /// Insertion time (cache clock milliseconds)
    pub inserted_at: u64,
    /// Last read or write (cache clock milliseconds)
    pub last_access: u64,
    /// Expiration time (cache clock milliseconds), None = no TTL
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry as if inserted at `now`.
    pub fn new_at(value: Product, ttl_ms: Option<u64>, now: u64) -> Self {
        Self {
            value,
            inserted_at: now,
            last_access: now,
            expires_at: ttl_ms.map(|ttl| now.saturating_add(ttl)),
        }
    }

    // == Touch ==
    /// Records a read at `now`, restarting the idle clock.
    pub fn touch(&mut self, now: u64) {
        self.last_access = self.last_access.max(now);
    }

    // == Is Expired ==
    /// Checks whether the entry is dead at `now`.
    ///
    /// TTL and max-idle are independent clocks: the entry is dead once
    /// `now > expires_at` or `now > last_access + max_idle`, whichever fires first.
    /// Idle refreshes never extend an entry past its TTL.
    pub fn is_expired_at(&self, now: u64, max_idle_ms: Option<u64>) -> bool {
        let ttl_elapsed = self.expires_at.is_some_and(|expires| now > expires);
        let idle_elapsed =
            max_idle_ms.is_some_and(|idle| now > self.last_access.saturating_add(idle));
        ttl_elapsed || idle_elapsed
    }
}

// == Utility Functions ==
/// Returns milliseconds elapsed on the process-wide cache clock.
///
/// Backed by [`Instant`], so wall-clock adjustments never stretch or cut
/// short an entry's lifetime. Values are only comparable within one process.
pub fn current_timestamp_ms() -> u64 {
    static CLOCK_BASE: OnceLock<Instant> = OnceLock::new();
    let base = CLOCK_BASE.get_or_init(Instant::now);
    u64::try_from(base.elapsed().as_millis()).unwrap_or(u64::MAX)
}
