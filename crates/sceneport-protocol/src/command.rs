//! Command requests sent by clients.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ProtocolError;

/// A single client-issued request naming an operation and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    /// Registered operation name. Matched exactly and case-sensitively.
    #[serde(rename = "type")]
    pub command_type: String,
    /// Operation parameters. Absent or null `params` become an empty map.
    pub params: Map<String, Value>,
}

impl Command {
    /// Builds a command from its parts.
    #[must_use]
    pub fn new(command_type: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            command_type: command_type.into(),
            params,
        }
    }

    /// Interprets a framed JSON value as a command.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NotAnObject`] for non-object messages,
    /// [`ProtocolError::MissingType`] when `type` is absent or not a non-empty
    /// string, and [`ProtocolError::InvalidParams`] when `params` is present
    /// but not an object.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let Value::Object(mut object) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        let command_type = match object.remove("type") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return Err(ProtocolError::MissingType),
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(params)) => params,
            Some(_) => return Err(ProtocolError::InvalidParams),
        };

        Ok(Self {
            command_type,
            params,
        })
    }

    /// Serializes the command to its wire form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
