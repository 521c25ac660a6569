//! Unified error handling for the mapping engine.
//!
//! Recoverable and fatal conditions are kept in one enum so callers can match
//! on the whole taxonomy. `Evaluation` errors are recovered inside the engine
//! (the failing field is omitted and the failure logged); everything else is
//! surfaced to the caller of the operation that produced it.

use std::io;

/// Errors produced by path parsing, rule compilation, transform evaluation,
/// and SCIM envelope assembly.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A path string that cannot be parsed into segments.
    #[error("Malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// A transform expression that cannot be parsed.
    #[error("Invalid expression '{expression}': {reason}")]
    ExpressionSyntax { expression: String, reason: String },

    /// A mapping rule that failed to compile, identified by its target path.
    #[error("Rule targeting '{target_path}' failed to compile: {source}")]
    RuleCompile {
        target_path: String,
        #[source]
        source: Box<MapError>,
    },

    /// A transform expression that failed at evaluation time.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A resource type outside the supported set (`User`, `Group`).
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    /// A document that cannot be wrapped in a SCIM envelope.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// IO errors from profile load/save.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    /// Create a malformed-path error with context.
    pub fn malformed_path<S: Into<String>>(path: S, reason: S) -> Self {
        Self::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an evaluation error with context.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        Self::Evaluation(msg.into())
    }

    /// True for errors the engine recovers from by omitting a single field.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MapError::Evaluation(_))
    }
}

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_identification() {
        let err = MapError::malformed_path("a..b", "empty segment");
        let msg = format!("{}", err);
        assert!(msg.contains("a..b"));
        assert!(msg.contains("empty segment"));

        let err = MapError::RuleCompile {
            target_path: "name.givenName".to_string(),
            source: Box::new(MapError::evaluation("boom")),
        };
        assert!(format!("{}", err).contains("name.givenName"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(MapError::evaluation("x").is_recoverable());
        assert!(!MapError::UnsupportedResourceType("Device".to_string()).is_recoverable());
    }
}
