#![forbid(unsafe_code)]

//! Bind context: the two binder caches behind one handle.
//!
//! Applications that want explicit control create a [`BindContext`] at
//! startup and pass it to their components. Everything else can use the free
//! functions in this module, which go through a lazily created per-thread
//! default context. UI code is single-threaded and the handles are `Rc`-based,
//! so "process-wide" means "per UI thread" here.
//!
//! # Example
//!
//! ```
//! use spicy_runtime::{Arg, Callback, bind};
//!
//! let log = Callback::new(|args| println!("{args:?}"));
//! let first = bind!(1, "row", log);
//! let again = bind!(1, "row", log);
//! assert_eq!(first, again);
//! first.emit(&[Arg::from(true)]);
//! ```

use crate::arg::{Arg, IntoArgs};
use crate::bind::{ArgBinder, CacheStats, ValueBinder};
use crate::callback::{Callback, Handler, ValueCallback};
use crate::config::BindConfig;
use crate::error::Result;

/// Owns a [`ValueBinder`] and an [`ArgBinder`].
#[derive(Debug)]
pub struct BindContext {
    config: BindConfig,
    values: ValueBinder,
    args: ArgBinder,
}

impl Default for BindContext {
    fn default() -> Self {
        Self::new(BindConfig::default())
    }
}

impl BindContext {
    #[must_use]
    pub fn new(config: BindConfig) -> Self {
        Self {
            values: ValueBinder::new(&config),
            args: ArgBinder::new(&config),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// See [`ValueBinder::bind_value`].
    pub fn bind_value(&self, cb: &ValueCallback) -> Handler {
        self.values.bind_value(cb)
    }

    /// See [`ArgBinder::bind`].
    pub fn bind(&self, args: &[Arg], cb: &Callback) -> Callback {
        self.args.bind(args, cb)
    }

    /// See [`ArgBinder::bind_with`].
    pub fn bind_with(&self, args: impl IntoArgs, cb: &Callback) -> Callback {
        self.args.bind_with(args, cb)
    }

    /// See [`ArgBinder::bind_dynamic`].
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidCallback`](crate::BindError::InvalidCallback)
    /// when the last element is not a function.
    pub fn bind_dynamic(&self, args: Vec<Arg>) -> Result<Callback> {
        self.args.bind_dynamic(args)
    }

    /// Drop the cached value handler for `cb`.
    pub fn forget_value(&self, cb: &ValueCallback) -> bool {
        self.values.forget(cb)
    }

    /// Drop all cached bound callbacks for `cb`.
    pub fn forget_args(&self, cb: &Callback) -> usize {
        self.args.forget(cb)
    }

    /// Sweep both caches. Returns the number of callbacks reclaimed.
    pub fn sweep(&self) -> usize {
        self.values.sweep() + self.args.sweep()
    }

    /// Empty both caches.
    pub fn clear(&self) {
        self.values.clear();
        self.args.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.values.stats().merge(self.args.stats())
    }

    #[must_use]
    pub fn value_binder(&self) -> &ValueBinder {
        &self.values
    }

    #[must_use]
    pub fn arg_binder(&self) -> &ArgBinder {
        &self.args
    }
}

thread_local! {
    static DEFAULT_CONTEXT: BindContext = BindContext::default();
}

/// Run `f` with this thread's default context.
pub fn with_default_context<R>(f: impl FnOnce(&BindContext) -> R) -> R {
    DEFAULT_CONTEXT.with(f)
}

/// [`BindContext::bind_value`] on the default context.
pub fn bind_value(cb: &ValueCallback) -> Handler {
    with_default_context(|cx| cx.bind_value(cb))
}

/// [`BindContext::bind`] on the default context.
pub fn bind(args: &[Arg], cb: &Callback) -> Callback {
    with_default_context(|cx| cx.bind(args, cb))
}

/// [`BindContext::bind_with`] on the default context.
pub fn bind_with(args: impl IntoArgs, cb: &Callback) -> Callback {
    with_default_context(|cx| cx.bind_with(args, cb))
}

/// [`BindContext::bind_dynamic`] on the default context.
///
/// # Errors
///
/// Returns [`BindError::InvalidCallback`](crate::BindError::InvalidCallback)
/// when the last element is not a function.
pub fn bind_dynamic(args: Vec<Arg>) -> Result<Callback> {
    with_default_context(|cx| cx.bind_dynamic(args))
}

/// [`BindContext::sweep`] on the default context.
pub fn sweep() -> usize {
    with_default_context(BindContext::sweep)
}

/// [`BindContext::stats`] on the default context.
#[must_use]
pub fn stats() -> CacheStats {
    with_default_context(BindContext::stats)
}

/// Bind leading arguments to a callback given last, using the default
/// context.
///
/// `bind!(a, b, cb)` is `bind(&[Arg::from(a), Arg::from(b)], &cb)`; any
/// number of leading arguments is accepted, including none.
#[macro_export]
macro_rules! bind {
    (@collect [$($arg:expr),*] $cb:expr) => {
        $crate::context::bind(&[$($crate::Arg::from($arg)),*], &$cb)
    };
    (@collect [$($arg:expr),*] $head:expr, $($rest:tt)+) => {
        $crate::bind!(@collect [$($arg,)* $head] $($rest)+)
    };
    ($($all:tt)+) => {
        $crate::bind!(@collect [] $($all)+)
    };
}
