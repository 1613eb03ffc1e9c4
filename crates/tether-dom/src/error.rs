use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElementError>;

/// Reasons an element configuration is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error("invalid tag name: {name:?}")]
    InvalidTagName { name: String },

    #[error("invalid attribute name {attribute:?} on <{element}>")]
    InvalidAttributeName { element: String, attribute: String },

    #[error("invalid style property {property:?} on <{element}>")]
    InvalidStyleProperty { element: String, property: String },

    #[error("invalid event name {event:?} on <{element}>")]
    InvalidEventName { element: String, event: String },

    #[error("duplicate {kind} {key:?} on <{element}>")]
    Duplicate {
        element: String,
        kind: &'static str,
        key: String,
    },
}

impl ElementError {
    /// Tag of the element whose configuration was rejected, when known.
    #[must_use]
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::InvalidTagName { .. } => None,
            Self::InvalidAttributeName { element, .. }
            | Self::InvalidStyleProperty { element, .. }
            | Self::InvalidEventName { element, .. }
            | Self::Duplicate { element, .. } => Some(element),
        }
    }
}
