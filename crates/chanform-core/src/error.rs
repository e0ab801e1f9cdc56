//! Error type shared by every chanform crate.

use std::error::Error as StdError;
use std::fmt;

use crate::value::ValueKind;

/// Convenience alias used throughout chanform.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by settings forms and their collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Delete confirmation text does not match the entity's display name.
    ///
    /// Handled locally; never reaches the network.
    ValidationGate {
        /// Length of the name the user has to type.
        expected_len: usize,
        /// What the user typed.
        typed: String,
    },
    /// A remote update/delete was rejected. The message is shown verbatim.
    Remote(String),
    /// The projector found no baseline for this entity.
    EntityVanished(String),
    /// The record has no field with this name.
    UnknownField(String),
    /// A value of the wrong kind was written to a field.
    TypeMismatch {
        /// Field being written.
        field: String,
        /// Kind the field holds.
        expected: ValueKind,
        /// Kind that was supplied.
        found: ValueKind,
    },
    /// A permission table is malformed (duplicate or out-of-range bit).
    InvalidPermissionTable(String),
    /// Configuration could not be loaded.
    Config(String),
}

impl Error {
    /// Message suitable for showing to the user.
    ///
    /// Remote failures pass the server's text through untouched.
    pub fn user_message(&self) -> String {
        match self {
            Error::Remote(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error originated from the remote side.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValidationGate { expected_len, typed } => write!(
                f,
                "confirmation text does not match ({} chars typed, {} expected)",
                typed.chars().count(),
                expected_len
            ),
            Error::Remote(msg) => write!(f, "{}", msg),
            Error::EntityVanished(key) => write!(f, "entity no longer exists: {}", key),
            Error::UnknownField(field) => write!(f, "unknown field: {}", field),
            Error::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "type mismatch for field {}: expected {}, found {}",
                field, expected, found
            ),
            Error::InvalidPermissionTable(msg) => write!(f, "invalid permission table: {}", msg),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl StdError for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_is_verbatim() {
        let err = Error::Remote("rate limited".to_string());
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(err.user_message(), "rate limited");
        assert!(err.is_remote());
    }

    #[test]
    fn test_validation_gate_display() {
        let err = Error::ValidationGate {
            expected_len: 5,
            typed: "rule".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "confirmation text does not match (4 chars typed, 5 expected)"
        );
        assert!(!err.is_remote());
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = Error::TypeMismatch {
            field: "name".to_string(),
            expected: ValueKind::Text,
            found: ValueKind::Mask,
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for field name: expected text, found mask"
        );
    }

    #[test]
    fn test_json_error_becomes_config() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
