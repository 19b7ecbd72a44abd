#![forbid(unsafe_code)]

//! spicy public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.
//!
//! ```
//! use spicy::prelude::*;
//!
//! let on_pick = Callback::new(|args| {
//!     assert_eq!(args[0], Arg::from("row-1"));
//! });
//! // Same arguments, same callback instance: no listener churn on re-render.
//! assert_eq!(bind!("row-1", on_pick), bind!("row-1", on_pick));
//!
//! let on_input = ValueCallback::new(|value, _event| assert_eq!(value, "hi"));
//! let handler = bind_value(&on_input);
//! handler.emit(&Event::new(EventKind::Input).with_target(Element::input("hi")));
//! ```

pub use spicy_core as core;
pub use spicy_runtime as runtime;

pub use spicy_runtime::bind;

pub mod prelude {
    pub use spicy_core::event::{Element, ElementKind, Event, EventKind};
    pub use spicy_runtime::{
        Arg, BindConfig, BindContext, BindError, Callback, Handler, ValueCallback, bind,
        bind_dynamic, bind_value, bind_with,
    };
}
