#![forbid(unsafe_code)]

//! Identity-stable binders.
//!
//! This module provides the two caching adapters:
//!
//! - [`ValueBinder`]: turns a `cb(value, event)` callback into an event
//!   [`Handler`](crate::callback::Handler) that reads the current value of the
//!   event's target.
//! - [`ArgBinder`]: partially applies a [`Callback`](crate::callback::Callback)
//!   to a list of leading arguments.
//!
//! # Architecture
//!
//! Both binders key a map by the address of the original callback. A cached
//! wrapper holds a strong reference to the callback it wraps, so an entry's
//! key cannot be freed (and its address reused) while the entry exists.
//!
//! The map itself only keeps a `Weak` to the callback. An entry is reclaimed
//! by a sweep once every strong reference to the callback and to its
//! wrappers is owned by the cache itself, which gives the same lifetime as a
//! weak-keyed map: the entry lives while either side is reachable from the
//! program.
//!
//! # Invariants
//!
//! 1. Binding the same callback (and, for [`ArgBinder`], a same-value equal
//!    argument list) returns the same wrapper instance while its entry lives.
//! 2. Distinct callbacks never share an entry.
//! 3. A sweep never reclaims an entry whose callback or wrappers are still
//!    reachable outside the cache.
//! 4. No cache borrow is held while user code runs, so callbacks may bind
//!    re-entrantly.

pub mod args;
pub mod value;

pub use args::ArgBinder;
pub use value::ValueBinder;

use std::cell::Cell;

use crate::config::BindConfig;

/// Point-in-time view of a binder's caches and counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Callbacks with a cached value handler.
    pub value_entries: usize,
    /// Callbacks with at least one cached bound callback.
    pub arg_callbacks: usize,
    /// Cached bound callbacks across all callbacks.
    pub arg_entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that built a new wrapper.
    pub misses: u64,
    /// Entries removed by sweeps.
    pub reclaimed: u64,
}

impl CacheStats {
    /// Combine the stats of two binders.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            value_entries: self.value_entries + other.value_entries,
            arg_callbacks: self.arg_callbacks + other.arg_callbacks,
            arg_entries: self.arg_entries + other.arg_entries,
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            reclaimed: self.reclaimed + other.reclaimed,
        }
    }
}

/// Monotonic lookup counters.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: Cell<u64>,
    misses: Cell<u64>,
    reclaimed: Cell<u64>,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.set(self.hits.get() + 1);
    }

    pub(crate) fn miss(&self) {
        self.misses.set(self.misses.get() + 1);
    }

    pub(crate) fn reclaim(&self, n: usize) {
        self.reclaimed.set(self.reclaimed.get() + n as u64);
    }

    pub(crate) fn fill(&self, stats: &mut CacheStats) {
        stats.hits = self.hits.get();
        stats.misses = self.misses.get();
        stats.reclaimed = self.reclaimed.get();
    }
}

/// Amortised trigger for automatic sweeps.
#[derive(Debug)]
pub(crate) struct SweepPolicy {
    auto: bool,
    floor: usize,
    next_at: Cell<usize>,
}

impl SweepPolicy {
    pub(crate) fn new(config: &BindConfig) -> Self {
        let floor = config.sweep_floor.max(1);
        Self {
            auto: config.auto_sweep,
            floor,
            next_at: Cell::new(floor),
        }
    }

    /// Whether a cache holding `len` entries should be swept now.
    pub(crate) fn due(&self, len: usize) -> bool {
        self.auto && len >= self.next_at.get()
    }

    /// Re-arm after a sweep left `live` entries.
    pub(crate) fn rearm(&self, live: usize) {
        self.next_at.set(self.floor.max(live.saturating_mul(2)));
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn log_sweep(binder: &'static str, reclaimed: usize, remaining: usize) {
    tracing::debug!(message = "bind.sweep", binder, reclaimed, remaining);
}
