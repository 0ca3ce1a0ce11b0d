//! Error type shared by every generation step.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::richtext::ParseError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = DeckError> = std::result::Result<T, E>;

/// Failures that abort a generation run.
///
/// Every variant is fatal: the pipeline stops at the first error and never
/// retries.  Output files that were already written stay on disk; the file
/// being written when the error occurred is never left half-written.
#[derive(Debug, Error)]
pub enum DeckError {
    /// An output file or directory could not be created, written or replaced.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Path that was being written.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// A JSON content or configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// A JSON content or configuration file could not be parsed.
    #[error("invalid JSON in {}: {source}", path.display())]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parser error with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// Deck text references a `{{placeholder}}` that has no value.
    #[error("unknown placeholder `{{{{{name}}}}}` in deck template")]
    UnknownPlaceholder {
        /// Name of the missing variable.
        name: String,
    },

    /// Deck text contains malformed inline markup.
    #[error("invalid markup in {text:?}: {source}")]
    Markup {
        /// The offending text after placeholder substitution.
        text: String,
        /// Position and description of the problem.
        #[source]
        source: ParseError,
    },

    /// A chart block references a chart that was not rendered in this run.
    #[error("deck references the {kind} chart but no such artifact was rendered")]
    MissingArtifact {
        /// Name of the chart kind.
        kind: String,
    },

    /// The PDF handout could not be produced.
    #[error("failed to render handout: {0}")]
    Handout(#[from] genpdf::error::Error),
}

impl DeckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the failure came from the filesystem.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_message_shows_braces() {
        let err = DeckError::UnknownPlaceholder {
            name: "client".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "unknown placeholder `{{client}}` in deck template"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        let err = DeckError::io(
            "out/deck.html",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        );
        assert!(err.is_io());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("out/deck.html"));
    }
}
