#![forbid(unsafe_code)]

//! In-memory binding layer.
//!
//! [`Mount`] renders an [`Element`] tree into a snapshot of plain values and
//! keeps it in sync with every reactive prop:
//!
//! - reactive attributes and styles are re-read and stored in place when
//!   their observable fires;
//! - reactive contents are re-read and replaced wholesale. The new children
//!   are bound afresh and every binding under the old children is released,
//!   even when a [`NodeHandle`] still points into them.
//!
//! Static props are copied once and never subscribed.
//!
//! # Invariants
//!
//! 1. After any `set()` returns, the snapshot equals a fresh render of the
//!    element tree.
//! 2. Each rendered element owns exactly one subscription per reactive prop.
//! 3. Detached subtrees hold no subscriptions.
//! 4. No snapshot borrow is held while a handler runs.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tether_dom::{AttrValue, Element, Event, Node};

use crate::markup;
use crate::scope::BindingScope;

type NodeRef = Rc<RefCell<RenderedElement>>;

/// Number of snapshot updates applied, by prop kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub attributes: u64,
    pub styles: u64,
    pub contents: u64,
}

impl UpdateStats {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.attributes + self.styles + self.contents
    }
}

type SharedStats = Rc<Cell<UpdateStats>>;

fn bump(stats: &SharedStats, f: impl FnOnce(&mut UpdateStats)) {
    let mut current = stats.get();
    f(&mut current);
    stats.set(current);
}

pub(crate) struct RenderedElement {
    pub(crate) tag: String,
    pub(crate) attributes: IndexMap<String, AttrValue>,
    pub(crate) style: IndexMap<String, String>,
    pub(crate) children: Vec<RenderedChild>,
    source: Element,
    scope: BindingScope,
}

pub(crate) enum RenderedChild {
    Element(NodeRef),
    Text(String),
}

fn render_children(nodes: &[Node], stats: &SharedStats) -> Vec<RenderedChild> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Element(element) => RenderedChild::Element(bind(element, stats)),
            Node::Text(text) => RenderedChild::Text(text.clone()),
        })
        .collect()
}

/// Render `element` and subscribe to its reactive props.
fn bind(element: &Element, stats: &SharedStats) -> NodeRef {
    let node = Rc::new(RefCell::new(RenderedElement {
        tag: element.name().to_owned(),
        attributes: element
            .attributes()
            .map(|(key, prop)| (key.to_owned(), prop.get()))
            .collect(),
        style: element
            .styles()
            .map(|(key, prop)| (key.to_owned(), prop.get()))
            .collect(),
        children: render_children(&element.children(), stats),
        source: element.clone(),
        scope: BindingScope::new(),
    }));
    let weak = Rc::downgrade(&node);
    let mut scope = BindingScope::new();

    for (key, prop) in element.attributes() {
        let Some(source) = prop.observable() else {
            continue;
        };
        let (weak, key, reader, stats) = (
            Weak::clone(&weak),
            key.to_owned(),
            source.clone(),
            Rc::clone(stats),
        );
        scope.keep(source.subscribe(move || {
            let Some(node) = weak.upgrade() else {
                return;
            };
            let value = reader.get();
            tracing::debug!(message = "binding.attribute", key = %key, value = %value);
            node.borrow_mut().attributes.insert(key.clone(), value);
            bump(&stats, |s| s.attributes += 1);
        }));
    }

    for (property, prop) in element.styles() {
        let Some(source) = prop.observable() else {
            continue;
        };
        let (weak, property, reader, stats) = (
            Weak::clone(&weak),
            property.to_owned(),
            source.clone(),
            Rc::clone(stats),
        );
        scope.keep(source.subscribe(move || {
            let Some(node) = weak.upgrade() else {
                return;
            };
            let value = reader.get();
            tracing::debug!(message = "binding.style", property = %property, value = %value);
            node.borrow_mut().style.insert(property.clone(), value);
            bump(&stats, |s| s.styles += 1);
        }));
    }

    if let Some(source) = element.contents().observable() {
        let (weak, reader, stats) = (Weak::clone(&weak), source.clone(), Rc::clone(stats));
        scope.keep(source.subscribe(move || {
            let Some(node) = weak.upgrade() else {
                return;
            };
            let children = render_children(&reader.get(), &stats);
            tracing::debug!(message = "binding.contents", children = children.len());
            let previous = std::mem::replace(&mut node.borrow_mut().children, children);
            // Outstanding handles may keep old nodes alive; unbind them anyway.
            detach(&previous);
            drop(previous);
            bump(&stats, |s| s.contents += 1);
        }));
    }

    node.borrow_mut().scope = scope;
    node
}

/// Release every binding under `children`, depth first.
fn detach(children: &[RenderedChild]) {
    for child in children {
        let RenderedChild::Element(child) = child else {
            continue;
        };
        let mut node = child.borrow_mut();
        node.scope.release_all();
        detach(&node.children);
    }
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// `tag`, `.class` or `tag.class`.
struct Selector<'a> {
    tag: Option<&'a str>,
    class: Option<&'a str>,
}

impl<'a> Selector<'a> {
    fn parse(selector: &'a str) -> Self {
        let (tag, class) = match selector.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (selector, None),
        };
        Self {
            tag: (!tag.is_empty()).then_some(tag),
            class,
        }
    }

    fn matches(&self, node: &RenderedElement) -> bool {
        if self.tag.is_some_and(|tag| tag != node.tag) {
            return false;
        }
        match self.class {
            None => true,
            Some(class) => node
                .attributes
                .get("class")
                .and_then(AttrValue::as_text)
                .is_some_and(|value| value.split_whitespace().any(|c| c == class)),
        }
    }
}

fn collect(node: &NodeRef, selector: &Selector<'_>, out: &mut Vec<NodeHandle>, first_only: bool) {
    if first_only && !out.is_empty() {
        return;
    }
    let children: Vec<NodeRef> = {
        let borrowed = node.borrow();
        if selector.matches(&borrowed) {
            out.push(NodeHandle {
                node: Rc::clone(node),
            });
            if first_only {
                return;
            }
        }
        borrowed
            .children
            .iter()
            .filter_map(|child| match child {
                RenderedChild::Element(child) => Some(Rc::clone(child)),
                RenderedChild::Text(_) => None,
            })
            .collect()
    };
    for child in &children {
        collect(child, selector, out, first_only);
    }
}

// ---------------------------------------------------------------------------
// NodeHandle
// ---------------------------------------------------------------------------

/// Handle to one rendered element.
///
/// A handle stays valid after its element is detached: it keeps the last
/// rendered state, and the detached element no longer receives updates.
#[derive(Clone)]
pub struct NodeHandle {
    node: NodeRef,
}

impl NodeHandle {
    #[must_use]
    pub fn tag(&self) -> String {
        self.node.borrow().tag.clone()
    }

    /// Rendered attribute value; `None` if the element declares no such
    /// attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.node.borrow().attributes.get(name).cloned()
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.node.borrow().style.get(property).cloned()
    }

    /// Concatenated rendered text of all descendants.
    #[must_use]
    pub fn text(&self) -> String {
        fn walk(node: &RenderedElement, out: &mut String) {
            for child in &node.children {
                match child {
                    RenderedChild::Element(child) => walk(&child.borrow(), out),
                    RenderedChild::Text(text) => out.push_str(text),
                }
            }
        }
        let mut out = String::new();
        walk(&self.node.borrow(), &mut out);
        out
    }

    /// Direct element children.
    #[must_use]
    pub fn children(&self) -> Vec<NodeHandle> {
        self.node
            .borrow()
            .children
            .iter()
            .filter_map(|child| match child {
                RenderedChild::Element(node) => Some(NodeHandle {
                    node: Rc::clone(node),
                }),
                RenderedChild::Text(_) => None,
            })
            .collect()
    }

    /// First descendant (or self) matching `selector`.
    #[must_use]
    pub fn find(&self, selector: &str) -> Option<NodeHandle> {
        let mut out = Vec::new();
        collect(&self.node, &Selector::parse(selector), &mut out, true);
        out.pop()
    }

    /// Every descendant (and self) matching `selector`, in document order.
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        collect(&self.node, &Selector::parse(selector), &mut out, false);
        out
    }

    /// Run this element's handler for `event`. Returns whether one ran.
    pub fn dispatch(&self, event: &str, payload: &mut Event) -> bool {
        let source = self.node.borrow().source.clone();
        let ran = source.trigger(event, payload);
        tracing::debug!(message = "binding.dispatch", tag = %source.name(), event, ran);
        ran
    }

    /// Serialized markup of this element.
    #[must_use]
    pub fn markup(&self) -> String {
        let mut out = String::new();
        markup::write_element(&mut out, &self.node.borrow());
        out
    }

    /// Subscriptions held by this element and its descendants.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        let node = self.node.borrow();
        node.scope.len()
            + node
                .children
                .iter()
                .map(|child| match child {
                    RenderedChild::Element(child) => NodeHandle {
                        node: Rc::clone(child),
                    }
                    .binding_count(),
                    RenderedChild::Text(_) => 0,
                })
                .sum::<usize>()
    }

    /// The element description this node was rendered from.
    #[must_use]
    pub fn element(&self) -> Element {
        self.node.borrow().source.clone()
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeHandle").field(&self.markup()).finish()
    }
}

// ---------------------------------------------------------------------------
// Mount
// ---------------------------------------------------------------------------

/// A live, rendered element tree.
pub struct Mount {
    root: NodeHandle,
    stats: SharedStats,
}

impl Mount {
    /// Render `root` and bind every reactive prop in the tree.
    #[must_use]
    pub fn new(root: &Element) -> Self {
        let stats: SharedStats = Rc::new(Cell::new(UpdateStats::default()));
        let node = bind(root, &stats);
        let mount = Self {
            root: NodeHandle { node },
            stats,
        };
        tracing::debug!(
            message = "binding.mount",
            tag = %root.name(),
            bindings = mount.binding_count()
        );
        mount
    }

    #[must_use]
    pub fn root(&self) -> &NodeHandle {
        &self.root
    }

    #[must_use]
    pub fn markup(&self) -> String {
        self.root.markup()
    }

    #[must_use]
    pub fn find(&self, selector: &str) -> Option<NodeHandle> {
        self.root.find(selector)
    }

    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<NodeHandle> {
        self.root.find_all(selector)
    }

    /// Dispatch `event` on the first element matching `selector`.
    ///
    /// Returns whether a handler ran.
    pub fn dispatch(&self, selector: &str, event: &str, payload: &mut Event) -> bool {
        self.find(selector)
            .is_some_and(|node| node.dispatch(event, payload))
    }

    /// Updates applied since mounting.
    #[must_use]
    pub fn stats(&self) -> UpdateStats {
        self.stats.get()
    }

    /// Subscriptions held by the whole tree.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.root.binding_count()
    }
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("stats", &self.stats.get())
            .field("bindings", &self.binding_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
