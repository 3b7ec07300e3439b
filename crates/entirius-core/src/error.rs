//! Error type shared by every template operation.

use entirius_proto::Kind;
use thiserror::Error;

/// Failures raised by configuration construction, `greet`, `validate`, and
/// `process`. Each variant keeps the structured context of the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Configuration failed its construction checks.
    #[error("{reason}")]
    Config { reason: String },

    /// A scalar argument had the wrong kind.
    #[error("{what} must be a string, got {found}")]
    InputType { what: &'static str, found: Kind },

    /// A sequence element was not text.
    #[error("List items must be strings, got {found} at index {index}")]
    ElementType { index: usize, found: Kind },

    /// A mapping key was not text.
    #[error("Dictionary keys must be strings, got {found}")]
    KeyType { found: Kind },

    /// `process` received something other than text, a sequence or a mapping.
    #[error("Unsupported data type: {found}")]
    UnsupportedType { found: Kind },
}

impl TemplateError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        TemplateError::Config {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = TemplateError> = std::result::Result<T, E>;
