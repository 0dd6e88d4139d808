//! Error types for the tree engine.

use std::path::PathBuf;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the tree engine.
///
/// Most edge states (unknown ids, out-of-range indices, conflicting
/// modifiers) are silent no-ops rather than errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An optional accessor hook required by the operation is not configured.
    #[error("Unsupported operation '{operation}': no '{hook}' accessor configured")]
    UnsupportedOperation {
        operation: &'static str,
        hook: &'static str,
    },

    /// Tree options could not be parsed.
    #[error("Invalid tree options: {0}")]
    OptionsParse(#[from] toml::de::Error),

    /// Tree options could not be serialized.
    #[error("Failed to serialize tree options: {0}")]
    OptionsSerialize(#[from] toml::ser::Error),

    /// Tree options file could not be read.
    #[error("Failed to read tree options '{path}': {source}")]
    OptionsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an unsupported-operation error.
    pub fn unsupported(operation: &'static str, hook: &'static str) -> Self {
        Self::UnsupportedOperation { operation, hook }
    }

    /// Create an I/O error for an options file.
    pub fn options_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OptionsIo {
            path: path.into(),
            source,
        }
    }
}
