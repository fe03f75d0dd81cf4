//! Error type returned by registered operations.

use std::error::Error as StdError;

use thiserror::Error;

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure raised by an operation. Its `Display` text becomes the
/// `message` of the error envelope sent to the client.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct OperationError {
    #[source]
    source: BoxedError,
}

impl OperationError {
    /// Wraps any error raised by an operation.
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            source: Box::new(error),
        }
    }

    /// Creates an error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            source: BoxedError::from(message.into()),
        }
    }

    /// Returns the wrapped error when it has type `E`.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}
