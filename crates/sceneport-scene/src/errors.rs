//! Failures raised by catalog operations.

use thiserror::Error;

/// Errors returned by scene operations. The `Display` text is sent to
/// clients verbatim as the error envelope message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SceneError {
    /// No object carries the requested id.
    #[error("Object with ID {id} not found")]
    ObjectNotFound {
        /// Identifier as supplied by the client.
        id: String,
    },

    /// No object carries the requested name.
    #[error("Object with name {name} not found.")]
    ObjectNameNotFound {
        /// Requested name.
        name: String,
    },

    /// More than one object carries the requested name.
    #[error("Multiple objects with name {name} found.")]
    AmbiguousName {
        /// Requested name.
        name: String,
    },

    /// Neither `id` nor `name` was supplied.
    #[error("an object 'id' or 'name' is required")]
    MissingIdentifier,

    /// A required parameter is absent or null.
    #[error("missing required parameter '{name}'")]
    MissingParameter {
        /// Parameter name.
        name: String,
    },

    /// A parameter is present but unusable.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// `create_object` was asked for a type it cannot build.
    #[error("Unsupported object type: {kind}")]
    UnsupportedObjectType {
        /// Requested type.
        kind: String,
    },

    /// A layer with the requested name already exists.
    #[error("Layer {name} already exists")]
    LayerExists {
        /// Conflicting name.
        name: String,
    },

    /// The layer is current and cannot be removed.
    #[error("Layer {name} is the current layer and cannot be deleted")]
    LayerInUse {
        /// Layer name.
        name: String,
    },

    /// A script line failed; the document was rolled back.
    #[error("Script failed at line {line}: {reason}")]
    Script {
        /// One-based line number.
        line: usize,
        /// Failure of the offending line.
        reason: String,
    },
}

impl SceneError {
    /// Creates a missing parameter error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
