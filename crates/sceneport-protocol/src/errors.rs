//! Protocol-level failures surfaced to clients as error envelopes.

use thiserror::Error;

/// Errors raised while framing or interpreting a client message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The accumulated bytes can never become valid JSON.
    #[error("malformed JSON: {message}")]
    MalformedJson {
        /// Parser diagnostic.
        message: String,
    },

    /// The message parsed but is not a JSON object.
    #[error("command must be a JSON object")]
    NotAnObject,

    /// The `type` field is absent, null, empty, or not a string.
    #[error("command is missing a string 'type' field")]
    MissingType,

    /// The `params` field is present but not an object.
    #[error("command 'params' must be a JSON object")]
    InvalidParams,

    /// The pending buffer grew past the configured limit.
    #[error("message exceeds {limit} byte limit")]
    MessageTooLarge {
        /// Maximum number of pending bytes.
        limit: usize,
    },
}

impl ProtocolError {
    /// Creates a malformed JSON error from a parser error.
    #[must_use]
    pub fn malformed(source: &serde_json::Error) -> Self {
        Self::MalformedJson {
            message: source.to_string(),
        }
    }

    /// Returns true when the connection should be closed after reporting.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MessageTooLarge { .. })
    }
}
