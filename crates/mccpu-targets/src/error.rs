//! Error types for template rendering and target lookup.

use std::path::PathBuf;

use crate::slot::Slot;

/// Structural errors raised while parsing a template or binding parameters to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A required placeholder does not occur in the template.
    #[error("template is missing placeholder {}", slot.marker())]
    MissingPlaceholder {
        /// The absent slot.
        slot: Slot,
    },

    /// A placeholder occurs more than once in the template.
    #[error("placeholder {} occurs {count} times (expected exactly once)", slot.marker())]
    DuplicatePlaceholder {
        /// The repeated slot.
        slot: Slot,
        /// How many times it occurs.
        count: usize,
    },

    /// A numeric parameter is negative or larger than the target can declare.
    #[error("invalid {slot} value {value}: {reason}")]
    InvalidParameter {
        /// The slot the value was meant for.
        slot: Slot,
        /// The offending value, as given.
        value: i128,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors that can occur while loading targets or looking them up.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// No registered target matches the identifier.
    #[error("unknown target '{name}'")]
    UnknownTarget {
        /// The identifier that was looked up.
        name: String,
    },

    /// The target's template is structurally invalid, or parameters do not fit it.
    #[error("target '{target}': {source}")]
    Render {
        /// Name of the target being rendered or loaded.
        target: String,
        /// The underlying render error.
        #[source]
        source: RenderError,
    },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading descriptor or template files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor or template file not found.
    #[error("target file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Descriptor fails validation.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

impl TargetError {
    /// The render error behind this failure, if any.
    pub fn render_error(&self) -> Option<&RenderError> {
        match self {
            TargetError::Render { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
