use thiserror::Error;

use tether_dom::ElementError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("element error: {0}")]
    Element(#[from] ElementError),

    #[error("item {index} is blank")]
    BlankItem { index: usize },

    #[error("completed index {index} out of range ({len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid log filter {filter:?}: {message}")]
    InvalidLogFilter { filter: String, message: String },

    #[error("failed to install log subscriber: {message}")]
    LogInit { message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BlankItem { .. } | Self::IndexOutOfRange { .. } | Self::InvalidLogFilter { .. } => {
                2
            }
            Self::Element(_) | Self::LogInit { .. } => 1,
        }
    }
}
