#![forbid(unsafe_code)]

//! Property tests for element construction.
//!
//! # Invariants
//!
//! 1. Well-formed tag names always build; the name is kept verbatim.
//! 2. Attribute order is insertion order.
//! 3. Any repeated attribute key is rejected as a duplicate.
//! 4. Static props read back exactly what was passed in.

use proptest::prelude::*;
use tether_dom::{AttrValue, Element, ElementError};

fn tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z-]{0,6}"
}

proptest! {
    #[test]
    fn well_formed_tags_build(name in tag()) {
        let el = Element::builder(name.clone()).build();
        prop_assert!(el.is_ok());
        prop_assert_eq!(el.map(|e| e.name().to_owned()).ok(), Some(name));
    }

    #[test]
    fn attributes_keep_insertion_order(keys in prop::collection::btree_set(key(), 0..8)) {
        // Reversed so the expected order is not the sorted one.
        let keys: Vec<String> = keys.into_iter().rev().collect();
        let mut builder = Element::builder("div");
        for (i, key) in keys.iter().enumerate() {
            builder = builder.attr(key.clone(), i.to_string());
        }
        let el = builder.build().expect("unique keys");
        let seen: Vec<&str> = el.attributes().map(|(k, _)| k).collect();
        prop_assert_eq!(seen, keys.iter().map(String::as_str).collect::<Vec<_>>());
        for (i, key) in keys.iter().enumerate() {
            prop_assert_eq!(el.attr_value(key), Some(AttrValue::from(i.to_string())));
        }
    }

    #[test]
    fn repeated_attribute_is_rejected(
        keys in prop::collection::vec(key(), 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let repeated = keys[pick.index(keys.len())].clone();
        let mut builder = Element::builder("span");
        for key in &keys {
            builder = builder.attr(key.clone(), "x");
        }
        let result = builder.attr(repeated, "y").build();
        let is_duplicate = matches!(
            result,
            Err(ElementError::Duplicate { kind: "attribute", .. })
        );
        prop_assert!(is_duplicate);
    }

    #[test]
    fn static_styles_read_back(value in "[a-z0-9 ]{0,12}") {
        let el = Element::builder("p")
            .style("color", value.clone())
            .build()
            .expect("valid");
        prop_assert_eq!(el.style_value("color"), Some(value));
    }
}
