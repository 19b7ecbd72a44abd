#![forbid(unsafe_code)]

//! Runtime: identity-stable callback binders for UI components.
//!
//! Frameworks that compare callback identity to decide whether to re-render
//! or re-attach a listener need callbacks that stay the same across renders.
//! This crate provides two memoizing adapters:
//!
//! - [`bind_value`]: wraps `cb(value, event)` into `handler(event)`, reading
//!   the current value of an input, select or text area target.
//! - [`bind`] / [`bind!`]: partial application with a cached result per
//!   callback and same-value equal argument list.
//!
//! Both work on a per-thread default [`BindContext`]; create one explicitly
//! to scope the caches to an application or a test.

pub mod arg;
pub mod bind;
pub mod callback;
pub mod config;
pub mod context;
pub mod error;

pub use arg::{Arg, IntoArgs, SameValue};
pub use bind::{ArgBinder, CacheStats, ValueBinder};
pub use callback::{Callback, Handler, ValueCallback};
pub use config::BindConfig;
pub use context::{
    BindContext, bind, bind_dynamic, bind_value, bind_with, stats, sweep, with_default_context,
};
pub use error::{BindError, Result};
