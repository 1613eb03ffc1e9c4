#![forbid(unsafe_code)]

//! Value-or-observable props.

use std::fmt;

use tether_reactive::{Observable, Subscription};

use crate::element::Node;
use crate::value::AttrValue;

/// A prop that is either fixed at construction or follows an observable.
///
/// The binding layer matches on the variant once, when it binds the
/// element, and only subscribes for `Reactive` props.
pub enum Prop<T> {
    Static(T),
    Reactive(Observable<T>),
}

impl<T: Clone> Clone for Prop<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Reactive(source) => Self::Reactive(source.clone()),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Reactive(source) => f.debug_tuple("Reactive").field(source).finish(),
        }
    }
}

impl<T: Clone + 'static> Prop<T> {
    /// Current value. Reactive props read through their observable.
    #[must_use]
    pub fn get(&self) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Reactive(source) => source.get(),
        }
    }

    /// Whether the prop follows an observable.
    #[must_use]
    pub fn is_reactive(&self) -> bool {
        matches!(self, Self::Reactive(_))
    }

    /// The observable behind a reactive prop.
    #[must_use]
    pub fn observable(&self) -> Option<&Observable<T>> {
        match self {
            Self::Static(_) => None,
            Self::Reactive(source) => Some(source),
        }
    }

    /// Subscribe to changes; `None` for static props, which never change.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Option<Subscription> {
        self.observable().map(|source| source.subscribe(callback))
    }
}

impl From<AttrValue> for Prop<AttrValue> {
    fn from(value: AttrValue) -> Self {
        Self::Static(value)
    }
}

impl From<&str> for Prop<AttrValue> {
    fn from(text: &str) -> Self {
        Self::Static(text.into())
    }
}

impl From<String> for Prop<AttrValue> {
    fn from(text: String) -> Self {
        Self::Static(text.into())
    }
}

impl From<bool> for Prop<AttrValue> {
    fn from(flag: bool) -> Self {
        Self::Static(flag.into())
    }
}

impl From<Observable<AttrValue>> for Prop<AttrValue> {
    fn from(source: Observable<AttrValue>) -> Self {
        Self::Reactive(source)
    }
}

impl From<Observable<String>> for Prop<AttrValue> {
    fn from(source: Observable<String>) -> Self {
        Self::Reactive(source.map(|text| AttrValue::Text(text.clone())))
    }
}

impl From<Observable<bool>> for Prop<AttrValue> {
    fn from(source: Observable<bool>) -> Self {
        Self::Reactive(source.map(|flag| AttrValue::Bool(*flag)))
    }
}

impl From<&str> for Prop<String> {
    fn from(text: &str) -> Self {
        Self::Static(text.to_owned())
    }
}

impl From<String> for Prop<String> {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl From<Observable<String>> for Prop<String> {
    fn from(source: Observable<String>) -> Self {
        Self::Reactive(source)
    }
}

impl From<Vec<Node>> for Prop<Vec<Node>> {
    fn from(nodes: Vec<Node>) -> Self {
        Self::Static(nodes)
    }
}

impl From<Observable<Vec<Node>>> for Prop<Vec<Node>> {
    fn from(source: Observable<Vec<Node>>) -> Self {
        Self::Reactive(source)
    }
}
