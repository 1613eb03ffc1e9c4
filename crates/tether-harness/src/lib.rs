#![forbid(unsafe_code)]

//! Binding layer and markup snapshots for Tether element trees.
//!
//! Mount an [`Element`](tether_dom::Element), drive its observables, and
//! inspect the rendered output:
//!
//! ```
//! use tether_dom::Element;
//! use tether_harness::Mount;
//! use tether_reactive::publisher;
//!
//! let text = publisher(String::from("a"));
//! let label = text.map(|t| vec![tether_dom::Node::from(t.as_str())]);
//! let el = Element::builder("label").reactive_contents(label).build().unwrap();
//!
//! let mount = Mount::new(&el);
//! assert_eq!(mount.markup(), "<label>a</label>");
//! text.set("b".into());
//! assert_eq!(mount.markup(), "<label>b</label>");
//! ```

mod markup;
pub mod mount;
pub mod scope;

pub use mount::{Mount, NodeHandle, UpdateStats};
pub use scope::BindingScope;
