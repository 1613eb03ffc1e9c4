#![forbid(unsafe_code)]

//! Event payloads and handlers.
//!
//! The binding layer fills an [`Event`] and hands it to the handler by
//! mutable reference; handlers may edit the target (e.g. clear an input
//! after consuming its text).

use std::fmt;
use std::rc::Rc;

/// Key code of the Enter key.
pub const ENTER_KEY: u32 = 13;

/// The element an event was dispatched on, as seen by the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTarget {
    /// Current text of an input, if any.
    pub value: Option<String>,
    /// Checked state of a checkbox, if the event carries one.
    pub checked: Option<bool>,
}

/// Payload passed to an event handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub key_code: Option<u32>,
    pub target: EventTarget,
}

impl Event {
    /// An event without key code or target state.
    #[must_use]
    pub fn click() -> Self {
        Self::default()
    }

    /// A click on a checkbox in the given state.
    #[must_use]
    pub fn checked(checked: bool) -> Self {
        Self {
            key_code: None,
            target: EventTarget {
                value: None,
                checked: Some(checked),
            },
        }
    }

    /// A key release on an input holding `value`.
    #[must_use]
    pub fn key_up(key_code: u32, value: impl Into<String>) -> Self {
        Self {
            key_code: Some(key_code),
            target: EventTarget {
                value: Some(value.into()),
                checked: None,
            },
        }
    }

    /// A committed edit of an input holding `value`.
    #[must_use]
    pub fn change(value: impl Into<String>) -> Self {
        Self {
            key_code: None,
            target: EventTarget {
                value: Some(value.into()),
                checked: None,
            },
        }
    }

    /// Target text, or the empty string.
    #[must_use]
    pub fn value(&self) -> &str {
        self.target.value.as_deref().unwrap_or_default()
    }

    /// Target checked state; a missing state reads as `false`.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.target.checked.unwrap_or(false)
    }
}

/// A shared event callback.
#[derive(Clone)]
pub struct Handler {
    callback: Rc<dyn Fn(&mut Event)>,
}

impl Handler {
    pub fn new(callback: impl Fn(&mut Event) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Run the handler.
    pub fn call(&self, event: &mut Event) {
        (self.callback)(event);
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}
