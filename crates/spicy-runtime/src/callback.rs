#![forbid(unsafe_code)]

//! Shared function handles with pointer identity.
//!
//! UI frameworks decide whether to re-attach a listener or re-render a child
//! by comparing the callback they were given last time with the one they are
//! given now. These handles make that comparison cheap and well-defined: two
//! handles are equal exactly when they point at the same allocation, no
//! matter what the functions do.
//!
//! All handles are `Rc`-based and therefore `!Send`; they live on the UI
//! thread together with the caches that hand them out.

use std::fmt;
use std::rc::{Rc, Weak};

use spicy_core::event::Event;

use crate::arg::Arg;

pub(crate) type HandlerFn = dyn Fn(&Event);
pub(crate) type ValueFn = dyn Fn(&str, &Event);
pub(crate) type CallbackFn = dyn Fn(&[Arg]);

/// Implements identity semantics shared by every handle type.
macro_rules! identity_handle {
    ($name:ident, $inner:ty) => {
        impl $name {
            /// Whether both handles point at the same function instance.
            #[must_use]
            pub fn ptr_eq(&self, other: &Self) -> bool {
                Rc::ptr_eq(&self.inner, &other.inner)
            }

            /// Address of the shared function, used as its identity key.
            #[must_use]
            pub fn addr(&self) -> usize {
                Rc::as_ptr(&self.inner) as *const () as usize
            }

            /// Number of live handles to this function instance.
            #[must_use]
            pub fn strong_count(&self) -> usize {
                Rc::strong_count(&self.inner)
            }

            #[allow(dead_code)]
            pub(crate) fn downgrade(&self) -> Weak<$inner> {
                Rc::downgrade(&self.inner)
            }
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                Self {
                    inner: Rc::clone(&self.inner),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.ptr_eq(other)
            }
        }

        impl Eq for $name {}

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.addr())
            }
        }
    };
}

/// An event handler: `handler(event)`.
pub struct Handler {
    inner: Rc<HandlerFn>,
}

impl Handler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    /// Dispatch an event to the handler.
    pub fn emit(&self, event: &Event) {
        (self.inner)(event);
    }
}

identity_handle!(Handler, HandlerFn);

/// A callback that consumes the current value of an event's target:
/// `cb(value, event)`.
pub struct ValueCallback {
    inner: Rc<ValueFn>,
}

impl ValueCallback {
    pub fn new(f: impl Fn(&str, &Event) + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    pub fn emit(&self, value: &str, event: &Event) {
        (self.inner)(value, event);
    }
}

identity_handle!(ValueCallback, ValueFn);

/// A variadic callback: `cb(args...)`.
///
/// Bound callbacks returned by the argument binder are themselves
/// `Callback`s, so they can be bound again or passed around as [`Arg::Func`].
pub struct Callback {
    inner: Rc<CallbackFn>,
}

impl Callback {
    pub fn new(f: impl Fn(&[Arg]) + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    /// Invoke the callback. Return values are not part of the contract;
    /// callbacks are fire-and-forget.
    pub fn emit(&self, args: &[Arg]) {
        (self.inner)(args);
    }
}

identity_handle!(Callback, CallbackFn);
