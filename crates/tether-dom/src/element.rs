#![forbid(unsafe_code)]

//! Declarative element descriptions.
//!
//! An [`Element`] is an immutable description of one UI node: a tag name,
//! attributes, styles, contents and event handlers. Attribute, style and
//! contents props may be static or reactive ([`Prop`]); building an element
//! only validates and stores them. Subscribing and rendering are left to the
//! binding layer.
//!
//! # Invariants
//!
//! 1. A built element always has a valid tag name (default `div`).
//! 2. Attribute, style and handler keys are valid and unique; insertion
//!    order is preserved.
//! 3. Building performs no I/O and registers no subscription.
//! 4. Cloning an element is cheap and shares the description.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tether_reactive::Observable;

use crate::error::{ElementError, Result};
use crate::event::{Event, Handler};
use crate::prop::Prop;
use crate::value::AttrValue;

/// Tag used when a configuration names none.
pub const DEFAULT_TAG: &str = "div";

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One entry of an element's contents.
#[derive(Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Element(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Concatenated text of this node and its current descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Element(element) => element.text_content(),
            Self::Text(text) => text.clone(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => fmt::Debug::fmt(element, f),
            Self::Text(text) => fmt::Debug::fmt(text, f),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration record accepted by [`element`]. Every field is optional.
#[derive(Default)]
pub struct ElementConfig {
    pub name: Option<String>,
    pub attributes: Vec<(String, Prop<AttrValue>)>,
    pub style: Vec<(String, Prop<String>)>,
    pub contents: Option<Prop<Vec<Node>>>,
    pub handlers: Vec<(String, Handler)>,
}

/// Validate `config` and build the element it describes.
pub fn element(config: ElementConfig) -> Result<Element> {
    let name = config.name.unwrap_or_else(|| DEFAULT_TAG.to_owned());
    if !is_valid_tag(&name) {
        return Err(ElementError::InvalidTagName { name });
    }

    let mut attributes = IndexMap::with_capacity(config.attributes.len());
    for (key, prop) in config.attributes {
        if !is_valid_attribute(&key) {
            return Err(ElementError::InvalidAttributeName {
                element: name,
                attribute: key,
            });
        }
        if attributes.contains_key(&key) {
            return Err(duplicate(name, "attribute", key));
        }
        attributes.insert(key, prop);
    }

    let mut style = IndexMap::with_capacity(config.style.len());
    for (key, prop) in config.style {
        if !is_valid_style_property(&key) {
            return Err(ElementError::InvalidStyleProperty {
                element: name,
                property: key,
            });
        }
        if style.contains_key(&key) {
            return Err(duplicate(name, "style property", key));
        }
        style.insert(key, prop);
    }

    let mut handlers = IndexMap::with_capacity(config.handlers.len());
    for (key, handler) in config.handlers {
        if !is_valid_event(&key) {
            return Err(ElementError::InvalidEventName {
                element: name,
                event: key,
            });
        }
        if handlers.contains_key(&key) {
            return Err(duplicate(name, "handler", key));
        }
        handlers.insert(key, handler);
    }

    let contents = config.contents.unwrap_or(Prop::Static(Vec::new()));
    tracing::trace!(
        message = "element.build",
        name = %name,
        attributes = attributes.len(),
        handlers = handlers.len(),
        reactive_contents = contents.is_reactive()
    );

    Ok(Element {
        inner: Rc::new(ElementInner {
            name,
            attributes,
            style,
            contents,
            handlers,
        }),
    })
}

fn duplicate(element: String, kind: &'static str, key: String) -> ElementError {
    ElementError::Duplicate { element, kind, key }
}

fn is_valid_tag(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_attribute(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '>' | '/' | '=')
        })
}

fn is_valid_style_property(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_event(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

struct ElementInner {
    name: String,
    attributes: IndexMap<String, Prop<AttrValue>>,
    style: IndexMap<String, Prop<String>>,
    contents: Prop<Vec<Node>>,
    handlers: IndexMap<String, Handler>,
}

/// Description of one UI node.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.inner.name)
            .field("attributes", &self.inner.attributes)
            .field("style", &self.inner.style)
            .field("contents", &self.inner.contents)
            .field("handlers", &self.inner.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Element {
    /// Start a builder for a `name` element.
    pub fn builder(name: impl Into<String>) -> ElementBuilder {
        ElementBuilder::new(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Attribute props in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Prop<AttrValue>)> {
        self.inner
            .attributes
            .iter()
            .map(|(key, prop)| (key.as_str(), prop))
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Prop<AttrValue>> {
        self.inner.attributes.get(name)
    }

    /// Current value of an attribute; `None` when the element has no such
    /// attribute at all.
    #[must_use]
    pub fn attr_value(&self, name: &str) -> Option<AttrValue> {
        self.attribute(name).map(Prop::get)
    }

    /// Style props in insertion order.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &Prop<String>)> {
        self.inner
            .style
            .iter()
            .map(|(key, prop)| (key.as_str(), prop))
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<&Prop<String>> {
        self.inner.style.get(property)
    }

    /// Current value of a style property.
    #[must_use]
    pub fn style_value(&self, property: &str) -> Option<String> {
        self.style(property).map(Prop::get)
    }

    #[must_use]
    pub fn contents(&self) -> &Prop<Vec<Node>> {
        &self.inner.contents
    }

    /// Current contents.
    #[must_use]
    pub fn children(&self) -> Vec<Node> {
        self.inner.contents.get()
    }

    /// The current child at `index`, if it is an element.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Element> {
        self.children()
            .into_iter()
            .nth(index)
            .and_then(|node| match node {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            })
    }

    /// Concatenated text of the current descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.children().iter().map(Node::text_content).collect()
    }

    /// Names of the events this element handles, in insertion order.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.inner.handlers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn handler(&self, event: &str) -> Option<&Handler> {
        self.inner.handlers.get(event)
    }

    /// Run the handler for `event`, if any. Returns whether one ran.
    pub fn trigger(&self, event: &str, payload: &mut Event) -> bool {
        // Clone first: the handler may drop the last other handle to `self`.
        match self.handler(event).cloned() {
            Some(handler) => {
                handler.call(payload);
                true
            }
            None => false,
        }
    }

    /// Whether both handles share one description.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent front end for [`ElementConfig`].
#[derive(Default)]
#[must_use]
pub struct ElementBuilder {
    config: ElementConfig,
}

impl ElementBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: ElementConfig {
                name: Some(name.into()),
                ..ElementConfig::default()
            },
        }
    }

    /// Set an attribute to a static value or an observable.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Prop<AttrValue>>) -> Self {
        self.config.attributes.push((name.into(), value.into()));
        self
    }

    /// Set a style property to a static value or an observable.
    pub fn style(mut self, property: impl Into<String>, value: impl Into<Prop<String>>) -> Self {
        self.config.style.push((property.into(), value.into()));
        self
    }

    /// Replace the contents with a literal list or an observable list.
    pub fn contents(mut self, contents: impl Into<Prop<Vec<Node>>>) -> Self {
        self.config.contents = Some(contents.into());
        self
    }

    /// Follow an observable list of nodes.
    pub fn reactive_contents(mut self, contents: Observable<Vec<Node>>) -> Self {
        self.config.contents = Some(Prop::Reactive(contents));
        self
    }

    /// Append one node to static contents.
    ///
    /// Appending to reactive contents replaces them with a static list.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        match &mut self.config.contents {
            Some(Prop::Static(nodes)) => nodes.push(node.into()),
            slot => *slot = Some(Prop::Static(vec![node.into()])),
        }
        self
    }

    /// Register a handler for `event`.
    pub fn on(mut self, event: impl Into<String>, callback: impl Fn(&mut Event) + 'static) -> Self {
        self.config
            .handlers
            .push((event.into(), Handler::new(callback)));
        self
    }

    /// Register an existing [`Handler`].
    pub fn handler(mut self, event: impl Into<String>, handler: Handler) -> Self {
        self.config.handlers.push((event.into(), handler));
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Element> {
        element(self.config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
