//! Response envelopes returned for every framed command.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single command.
///
/// Serialized with an internal `status` tag so that exactly one of `result`
/// and `message` is present on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// The operation completed and produced a result.
    Success {
        /// Operation result.
        result: Value,
    },
    /// The command could not be completed.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

impl Response {
    /// Creates a success envelope.
    #[must_use]
    pub const fn success(result: Value) -> Self {
        Self::Success { result }
    }

    /// Creates an error envelope.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns true for success envelopes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the result payload of a success envelope.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match self {
            Self::Success { result } => Some(result),
            Self::Error { .. } => None,
        }
    }

    /// Returns the message of an error envelope.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }

    /// Serializes the envelope to its wire form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Interprets a framed JSON value as a response envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not match the envelope schema.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
