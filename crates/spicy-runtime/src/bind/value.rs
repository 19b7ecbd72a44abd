#![forbid(unsafe_code)]

//! Value binder: event handlers that receive the target's current value.

use std::cell::RefCell;
use std::rc::Weak;

use ahash::AHashMap;
use spicy_core::event::Event;

use super::{CacheStats, Counters, SweepPolicy};
use crate::callback::{Handler, ValueCallback, ValueFn};
use crate::config::BindConfig;

struct ValueEntry {
    /// The original callback. Only the handler holds it strongly.
    callback: Weak<ValueFn>,
    handler: Handler,
}

impl ValueEntry {
    /// Nothing outside the cache can reach the callback or its handler.
    fn is_reclaimable(&self) -> bool {
        self.callback.strong_count() <= 1 && self.handler.strong_count() == 1
    }
}

/// Caches one [`Handler`] per [`ValueCallback`].
pub struct ValueBinder {
    entries: RefCell<AHashMap<usize, ValueEntry>>,
    policy: SweepPolicy,
    counters: Counters,
}

impl Default for ValueBinder {
    fn default() -> Self {
        Self::new(&BindConfig::default())
    }
}

impl std::fmt::Debug for ValueBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueBinder")
            .field("entries", &self.entries.borrow().len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ValueBinder {
    #[must_use]
    pub fn new(config: &BindConfig) -> Self {
        Self {
            entries: RefCell::new(AHashMap::new()),
            policy: SweepPolicy::new(config),
            counters: Counters::default(),
        }
    }

    /// Adapt `cb(value, event)` into `handler(event)`.
    ///
    /// The handler passes the current value of the event's target when the
    /// target is an input, select or text area, and `""` otherwise. Repeated
    /// calls with the same callback return the same handler.
    pub fn bind_value(&self, cb: &ValueCallback) -> Handler {
        let key = cb.addr();
        if let Some(entry) = self.entries.borrow().get(&key) {
            self.counters.hit();
            #[cfg(feature = "tracing")]
            tracing::trace!(message = "bind.value.hit", callback = key);
            return entry.handler.clone();
        }

        self.counters.miss();
        let handler = value_handler(cb.clone());
        let garbage = {
            let mut entries = self.entries.borrow_mut();
            entries.insert(
                key,
                ValueEntry {
                    callback: cb.downgrade(),
                    handler: handler.clone(),
                },
            );
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "bind.value.miss", callback = key, entries = entries.len());
            if self.policy.due(entries.len()) {
                self.collect(&mut entries)
            } else {
                Vec::new()
            }
        };
        // Dropped outside the borrow: captured state may run arbitrary code.
        drop(garbage);
        handler
    }

    /// Drop the cached handler for `cb`, e.g. when the component owning it
    /// unmounts. Handlers already handed out keep working. Returns whether an
    /// entry existed.
    pub fn forget(&self, cb: &ValueCallback) -> bool {
        let removed = self.entries.borrow_mut().remove(&cb.addr());
        removed.is_some()
    }

    /// Reclaim entries that nothing outside the cache references.
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let garbage = self.collect(&mut self.entries.borrow_mut());
        garbage.len()
    }

    /// Remove every entry. Counters are kept.
    pub fn clear(&self) {
        let old = std::mem::take(&mut *self.entries.borrow_mut());
        self.policy.rearm(0);
        drop(old);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            value_entries: self.len(),
            ..CacheStats::default()
        };
        self.counters.fill(&mut stats);
        stats
    }

    fn collect(&self, entries: &mut AHashMap<usize, ValueEntry>) -> Vec<ValueEntry> {
        let dead: Vec<usize> = entries
            .iter()
            .filter(|(_, entry)| entry.is_reclaimable())
            .map(|(key, _)| *key)
            .collect();
        let garbage: Vec<ValueEntry> = dead.iter().filter_map(|key| entries.remove(key)).collect();
        self.counters.reclaim(garbage.len());
        self.policy.rearm(entries.len());
        #[cfg(feature = "tracing")]
        super::log_sweep("value", garbage.len(), entries.len());
        garbage
    }
}

fn value_handler(cb: ValueCallback) -> Handler {
    Handler::new(move |event: &Event| {
        let value = event.target_value().unwrap_or("");
        cb.emit(value, event);
    })
}
