#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! Re-exports the reactive primitives, the element model and (with the
//! default `harness` feature) the in-memory binding layer.
//!
//! ```
//! use tether::prelude::*;
//!
//! let name = publisher(String::from("world"));
//! let greeting = name.map(|n| vec![Node::from(format!("hello {n}"))]);
//! let el = Element::builder("p").reactive_contents(greeting).build().unwrap();
//!
//! let mount = Mount::new(&el);
//! name.set("tether".into());
//! assert_eq!(mount.markup(), "<p>hello tether</p>");
//! ```

pub use tether_dom as dom;
#[cfg(feature = "harness")]
pub use tether_harness as harness;
pub use tether_reactive as reactive;

pub mod prelude {
    pub use tether_dom::{AttrValue, Element, ElementConfig, Event, Node, Prop, element};
    #[cfg(feature = "harness")]
    pub use tether_harness::Mount;
    pub use tether_reactive::{
        Computed, Dependency, Observable, Publisher, Subscription, publisher, subscriber,
    };
}
