#![forbid(unsafe_code)]

//! Argument binder: memoized partial application.
//!
//! `bind(&[a, b], &cb)` returns a callback `bound` such that
//! `bound.emit(&[c])` calls `cb.emit(&[a, b, c])`. Binding the same callback
//! with a same-value equal argument list returns the same `bound` instance,
//! so handing it to a component on every render does not look like a new
//! listener.
//!
//! Each callback owns a short list of `(arguments, bound)` pairs that is
//! scanned linearly. The list is expected to stay small: it grows with the
//! number of distinct argument lists a call site produces for one callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::{AHashMap, AHashSet};

use super::{CacheStats, Counters, SweepPolicy};
use crate::arg::{Arg, IntoArgs, SameValue};
use crate::callback::{Callback, CallbackFn};
use crate::config::BindConfig;
use crate::error::{BindError, Result};

struct Bound {
    /// Shared with the bound closure, so argument values are stored once.
    args: Rc<[Arg]>,
    callback: Callback,
}

struct ArgEntry {
    /// The original callback. Only the bound closures hold it strongly.
    callback: Weak<CallbackFn>,
    bound: Vec<Bound>,
}

/// Caches bound callbacks per (callback, argument list).
pub struct ArgBinder {
    entries: RefCell<AHashMap<usize, ArgEntry>>,
    policy: SweepPolicy,
    counters: Counters,
}

impl Default for ArgBinder {
    fn default() -> Self {
        Self::new(&BindConfig::default())
    }
}

impl std::fmt::Debug for ArgBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.borrow();
        f.debug_struct("ArgBinder")
            .field("callbacks", &entries.len())
            .field("bound", &entries.values().map(|e| e.bound.len()).sum::<usize>())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ArgBinder {
    #[must_use]
    pub fn new(config: &BindConfig) -> Self {
        Self {
            entries: RefCell::new(AHashMap::new()),
            policy: SweepPolicy::new(config),
            counters: Counters::default(),
        }
    }

    /// Bind `args` as the leading arguments of `cb`.
    pub fn bind(&self, args: &[Arg], cb: &Callback) -> Callback {
        let key = cb.addr();
        if let Some(found) = self.lookup(key, args) {
            self.counters.hit();
            #[cfg(feature = "tracing")]
            tracing::trace!(message = "bind.args.hit", callback = key, arity = args.len());
            return found;
        }

        self.counters.miss();
        let fixed: Rc<[Arg]> = Rc::from(args);
        let bound = bound_callback(Rc::clone(&fixed), cb.clone());
        let garbage = {
            let mut entries = self.entries.borrow_mut();
            let entry = entries.entry(key).or_insert_with(|| ArgEntry {
                callback: cb.downgrade(),
                bound: Vec::new(),
            });
            entry.bound.push(Bound {
                args: fixed,
                callback: bound.clone(),
            });
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "bind.args.miss",
                callback = key,
                arity = args.len(),
                entries = entry.bound.len()
            );
            if self.policy.due(entries.len()) {
                self.collect(&mut entries)
            } else {
                Vec::new()
            }
        };
        drop(garbage);
        bound
    }

    /// Bind a tuple (up to nine values), array or `Vec` of leading arguments.
    pub fn bind_with(&self, args: impl IntoArgs, cb: &Callback) -> Callback {
        self.bind(&args.into_args(), cb)
    }

    /// Bind a dynamically assembled argument list whose last element is the
    /// callback.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidCallback`] when the list is empty or its
    /// last element is not [`Arg::Func`].
    pub fn bind_dynamic(&self, mut args: Vec<Arg>) -> Result<Callback> {
        match args.pop() {
            Some(Arg::Func(cb)) => Ok(self.bind(&args, &cb)),
            Some(other) => Err(BindError::invalid_callback(other.kind_name())),
            None => Err(BindError::invalid_callback("nothing")),
        }
    }

    /// Drop every bound callback cached for `cb`. Bound callbacks already
    /// handed out keep working. Returns the number of entries removed.
    pub fn forget(&self, cb: &Callback) -> usize {
        let removed = self.entries.borrow_mut().remove(&cb.addr());
        removed.map_or(0, |entry| entry.bound.len())
    }

    /// Reclaim callbacks that nothing outside the cache references, along
    /// with all of their bound callbacks. Returns the number of callbacks
    /// removed.
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

    /// Number of callbacks with cached bound callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bound callbacks cached for `cb`.
    #[must_use]
    pub fn bound_count(&self, cb: &Callback) -> usize {
        self.entries
            .borrow()
            .get(&cb.addr())
            .map_or(0, |entry| entry.bound.len())
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.borrow();
        let mut stats = CacheStats {
            arg_callbacks: entries.len(),
            arg_entries: entries.values().map(|e| e.bound.len()).sum(),
            ..CacheStats::default()
        };
        self.counters.fill(&mut stats);
        stats
    }

    fn lookup(&self, key: usize, args: &[Arg]) -> Option<Callback> {
        let entries = self.entries.borrow();
        entries
            .get(&key)?
            .bound
            .iter()
            .find(|b| b.args.same_value(args))
            .map(|b| b.callback.clone())
    }

    fn collect(&self, entries: &mut AHashMap<usize, ArgEntry>) -> Vec<ArgEntry> {
        let live = reachable(entries);
        let dead: Vec<usize> = entries
            .keys()
            .filter(|key| !live.contains(*key))
            .copied()
            .collect();
        let garbage: Vec<ArgEntry> = dead.iter().filter_map(|key| entries.remove(key)).collect();
        self.counters.reclaim(garbage.len());
        self.policy.rearm(entries.len());
        #[cfg(feature = "tracing")]
        super::log_sweep("args", garbage.len(), entries.len());
        garbage
    }
}

fn bound_callback(fixed: Rc<[Arg]>, cb: Callback) -> Callback {
    Callback::new(move |rest: &[Arg]| {
        if rest.is_empty() {
            cb.emit(&fixed);
            return;
        }
        let mut all = Vec::with_capacity(fixed.len() + rest.len());
        all.extend_from_slice(&fixed);
        all.extend_from_slice(rest);
        cb.emit(&all);
    })
}

/// Keys of entries that are reachable from outside the cache.
///
/// Bound callbacks can themselves be bound again, or be passed as bound
/// arguments, so entries reference each other. A function is externally
/// held when its strong count exceeds the references the cache accounts for;
/// liveness then spreads along those references:
///
/// - a live callback keeps its bound callbacks (and their arguments) alive;
/// - a live bound callback keeps the callback it wraps alive.
fn reachable(entries: &AHashMap<usize, ArgEntry>) -> AHashSet<usize> {
    // Strong references owned by the cache, per function address.
    let mut internal: AHashMap<usize, usize> = AHashMap::new();
    // Bound callback address -> key of the entry that stores it.
    let mut owner: AHashMap<usize, usize> = AHashMap::new();
    for (&key, entry) in entries.iter() {
        *internal.entry(key).or_default() += entry.bound.len();
        for bound in &entry.bound {
            let addr = bound.callback.addr();
            *internal.entry(addr).or_default() += 1;
            owner.insert(addr, key);
            for f in bound.args.iter().filter_map(Arg::as_callback) {
                *internal.entry(f.addr()).or_default() += 1;
            }
        }
    }

    let held = |addr: usize, strong: usize| strong > internal.get(&addr).copied().unwrap_or(0);
    let mut stack: Vec<usize> = entries
        .iter()
        .filter(|(key, entry)| {
            held(**key, entry.callback.strong_count())
                || entry
                    .bound
                    .iter()
                    .any(|b| held(b.callback.addr(), b.callback.strong_count()))
        })
        .map(|(key, _)| *key)
        .collect();

    let mut live = AHashSet::new();
    while let Some(key) = stack.pop() {
        if !live.insert(key) {
            continue;
        }
        if let Some(&parent) = owner.get(&key) {
            stack.push(parent);
        }
        let Some(entry) = entries.get(&key) else {
            continue;
        };
        for bound in &entry.bound {
            let addr = bound.callback.addr();
            if entries.contains_key(&addr) {
                stack.push(addr);
            }
            for f in bound.args.iter().filter_map(Arg::as_callback) {
                let addr = f.addr();
                if entries.contains_key(&addr) {
                    stack.push(addr);
                }
                if let Some(&parent) = owner.get(&addr) {
                    stack.push(parent);
                }
            }
        }
    }
    live
}
