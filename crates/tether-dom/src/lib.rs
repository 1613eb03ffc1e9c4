#![forbid(unsafe_code)]

//! Declarative element model for Tether.
//!
//! Elements describe UI nodes whose attributes, styles and contents may be
//! static values or [`tether_reactive::Observable`]s. Descriptions are pure
//! data; the binding layer (`tether-harness`) turns them into live output.

pub mod element;
pub mod error;
pub mod event;
pub mod prop;
pub mod value;

pub use element::{DEFAULT_TAG, Element, ElementBuilder, ElementConfig, Node, element};
pub use error::{ElementError, Result};
pub use event::{ENTER_KEY, Event, EventTarget, Handler};
pub use prop::Prop;
pub use value::AttrValue;
