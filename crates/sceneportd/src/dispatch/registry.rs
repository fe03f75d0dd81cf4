//! Name-to-operation lookup table.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::OperationError;

/// A named unit of work run against the document `D`.
///
/// Implemented for every `Fn(&mut D, &Map<String, Value>) -> Result<Value, E>`
/// whose error type is a thread-safe [`std::error::Error`], so plain functions
/// register directly.
pub trait Operation<D>: Send + Sync {
    /// Runs the operation against the document.
    ///
    /// # Errors
    ///
    /// Returns an [`OperationError`] describing why the operation failed.
    fn call(&self, document: &mut D, params: &Map<String, Value>) -> Result<Value, OperationError>;
}

impl<D, F, E> Operation<D> for F
where
    F: Fn(&mut D, &Map<String, Value>) -> Result<Value, E> + Send + Sync + 'static,
    E: StdError + Send + Sync + 'static,
{
    fn call(&self, document: &mut D, params: &Map<String, Value>) -> Result<Value, OperationError> {
        self(document, params).map_err(OperationError::new)
    }
}

/// Operations keyed by their exact, case-sensitive wire name.
///
/// The registry is assembled before the server starts and only read while
/// it runs.
pub struct OperationRegistry<D> {
    operations: HashMap<String, Arc<dyn Operation<D>>>,
}

impl<D> Default for OperationRegistry<D> {
    fn default() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }
}

impl<D> fmt::Debug for OperationRegistry<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OperationRegistry")
            .field("operations", &self.names())
            .finish()
    }
}

impl<D: 'static> OperationRegistry<D> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `(name, operation)` pairs such as
    /// `sceneport_scene::catalog()`.
    #[must_use]
    pub fn from_catalog<'a, O, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a (&'static str, O)>,
        O: Operation<D> + Copy + 'static,
    {
        let mut registry = Self::new();
        for (name, operation) in entries {
            registry.register(*name, *operation);
        }
        registry
    }

    /// Registers `operation` under `name`, returning any operation it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        operation: impl Operation<D> + 'static,
    ) -> Option<Arc<dyn Operation<D>>> {
        self.operations.insert(name.into(), Arc::new(operation))
    }

    /// Looks up an operation by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Operation<D>>> {
        self.operations.get(name).cloned()
    }

    /// Returns true when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<D> OperationRegistry<D> {
    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
