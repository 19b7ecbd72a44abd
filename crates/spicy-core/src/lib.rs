#![forbid(unsafe_code)]

//! Core: the event and element model consumed by the spicy binders.

pub mod event;

pub use event::{Element, ElementKind, Event, EventKind};
