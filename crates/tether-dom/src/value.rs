#![forbid(unsafe_code)]

//! Attribute values.

use std::fmt;

/// The value of one element attribute.
///
/// `Unset` means "no attribute": a cleared class, an unchecked box. The
/// binding layer omits `Unset` and `Bool(false)` attributes and renders
/// `Bool(true)` as a bare attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AttrValue {
    Text(String),
    Bool(bool),
    #[default]
    Unset,
}

impl AttrValue {
    /// Whether the attribute is present when rendered.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Unset | Self::Bool(false))
    }

    /// Text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Unset => Ok(()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl<V: Into<AttrValue>> From<Option<V>> for AttrValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Unset, Into::into)
    }
}
