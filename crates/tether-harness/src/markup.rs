#![forbid(unsafe_code)]

//! Markup serialization of a rendered snapshot.
//!
//! Output is deterministic: attributes and style properties appear in the
//! element's declaration order, `style` comes last, and nothing is
//! pretty-printed.

use std::fmt::Write as _;

use tether_dom::AttrValue;
use v_htmlescape::escape;

use crate::mount::{RenderedChild, RenderedElement};

/// Tags rendered without contents or closing tag.
const VOID_TAGS: &[&str] = &["area", "br", "col", "hr", "img", "input", "link", "meta"];

pub(crate) fn write_element(out: &mut String, node: &RenderedElement) {
    let _ = write!(out, "<{}", node.tag);
    for (key, value) in &node.attributes {
        match value {
            AttrValue::Text(text) => {
                let _ = write!(out, " {key}=\"{}\"", escape(text));
            }
            AttrValue::Bool(true) => {
                let _ = write!(out, " {key}");
            }
            AttrValue::Bool(false) | AttrValue::Unset => {}
        }
    }
    if !node.style.is_empty() {
        let declarations: Vec<String> = node
            .style
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect();
        let _ = write!(out, " style=\"{}\"", escape(&declarations.join("; ")));
    }
    out.push('>');

    if VOID_TAGS.contains(&node.tag.as_str()) {
        return;
    }
    for child in &node.children {
        write_child(out, child);
    }
    let _ = write!(out, "</{}>", node.tag);
}

pub(crate) fn write_child(out: &mut String, child: &RenderedChild) {
    match child {
        RenderedChild::Element(node) => write_element(out, &node.borrow()),
        RenderedChild::Text(text) => {
            let _ = write!(out, "{}", escape(text));
        }
    }
}
