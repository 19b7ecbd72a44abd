#![forbid(unsafe_code)]

//! Canonical event and element types.
//!
//! The binders only ever look at two things on an event: the kind of its
//! current target and, for value-bearing controls, the target's textual
//! value. Everything else here exists so hosts can describe their events
//! faithfully when routing them through a bound handler.

use web_time::Instant;

/// Kind of UI control an event is dispatched on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Single-line text input.
    Input,
    /// Selection list.
    Select,
    /// Multi-line text area.
    TextArea,
    /// Push button.
    Button,
    /// Any other element, keyed by its lower-cased tag name.
    Other(String),
}

impl ElementKind {
    /// Map a tag name to an element kind. Matching is ASCII case-insensitive.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "input" => Self::Input,
            "select" => Self::Select,
            "textarea" => Self::TextArea,
            "button" => Self::Button,
            _ => Self::Other(tag),
        }
    }

    /// Canonical lower-case tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::Select => "select",
            Self::TextArea => "textarea",
            Self::Button => "button",
            Self::Other(tag) => tag,
        }
    }

    /// Whether controls of this kind expose a current textual value.
    #[must_use]
    pub const fn is_value_bearing(&self) -> bool {
        matches!(self, Self::Input | Self::Select | Self::TextArea)
    }
}

/// A UI element as seen by an event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    kind: ElementKind,
    value: String,
    id: Option<String>,
}

impl Element {
    /// Create an element of the given kind with an empty value.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            value: String::new(),
            id: None,
        }
    }

    /// Create an element from a tag name.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        Self::new(ElementKind::from_tag(tag))
    }

    /// Text input holding `value`.
    #[must_use]
    pub fn input(value: impl Into<String>) -> Self {
        Self::new(ElementKind::Input).with_value(value)
    }

    /// Selection list whose selected option is `value`.
    #[must_use]
    pub fn select(value: impl Into<String>) -> Self {
        Self::new(ElementKind::Select).with_value(value)
    }

    /// Text area holding `value`.
    #[must_use]
    pub fn textarea(value: impl Into<String>) -> Self {
        Self::new(ElementKind::TextArea).with_value(value)
    }

    /// Set the element's textual value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current value, or `None` when the element is not value-bearing.
    ///
    /// A button may carry a `value` attribute, but it is not a control the
    /// user edits, so it is not reported here.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.kind.is_value_bearing().then_some(self.value.as_str())
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    Change,
    Click,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    Submit,
    /// Host-defined event name.
    Custom(String),
}

/// A UI event dispatched to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    current_target: Option<Element>,
    time_stamp: Instant,
}

impl Event {
    /// Create an event with no target, stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            current_target: None,
            time_stamp: Instant::now(),
        }
    }

    /// Attach the element the handler is registered on.
    #[must_use]
    pub fn with_target(mut self, target: Element) -> Self {
        self.current_target = Some(target);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Element the handler is registered on, if any.
    #[must_use]
    pub fn current_target(&self) -> Option<&Element> {
        self.current_target.as_ref()
    }

    /// Value of the current target when it is a value-bearing control.
    #[must_use]
    pub fn target_value(&self) -> Option<&str> {
        self.current_target.as_ref().and_then(Element::value)
    }

    #[must_use]
    pub fn time_stamp(&self) -> Instant {
        self.time_stamp
    }
}

/// Event constructors for tests in dependent crates.
#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures {
    use super::{Element, Event, EventKind};

    /// `input` event on a text input holding `value`.
    #[must_use]
    pub fn input_event(value: &str) -> Event {
        Event::new(EventKind::Input).with_target(Element::input(value))
    }

    /// `change` event on a selection list with `value` selected.
    #[must_use]
    pub fn select_event(value: &str) -> Event {
        Event::new(EventKind::Change).with_target(Element::select(value))
    }

    /// `click` event on a button.
    #[must_use]
    pub fn click_event() -> Event {
        Event::new(EventKind::Click).with_target(Element::new(super::ElementKind::Button))
    }
}
