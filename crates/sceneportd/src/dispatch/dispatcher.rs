//! Routes commands to operations and wraps every outcome in an envelope.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, warn};

use sceneport_protocol::{Command, Response};

use super::{DISPATCH_TARGET, OperationRegistry};
use crate::executor::ExecutorHandle;

/// Looks up commands in the registry and runs them on the executor.
///
/// Dispatch is the containment boundary for command failures: unknown
/// commands, operation errors and operation panics all become error
/// envelopes, and nothing propagates to the caller.
pub struct Dispatcher<D> {
    registry: Arc<OperationRegistry<D>>,
    executor: ExecutorHandle<D>,
}

impl<D> Clone for Dispatcher<D> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            executor: self.executor.clone(),
        }
    }
}

impl<D> fmt::Debug for Dispatcher<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<D: Send + 'static> Dispatcher<D> {
    /// Creates a dispatcher over `registry` that runs operations on `executor`.
    #[must_use]
    pub fn new(registry: OperationRegistry<D>, executor: ExecutorHandle<D>) -> Self {
        Self {
            registry: Arc::new(registry),
            executor,
        }
    }

    /// Runs one command and returns its response envelope.
    #[must_use]
    pub fn dispatch(&self, command: Command) -> Response {
        let Command {
            command_type,
            params,
        } = command;
        let Some(operation) = self.registry.get(&command_type) else {
            warn!(target: DISPATCH_TARGET, command = %command_type, "unknown command type");
            return Response::error(format!("Unknown command type: {command_type}"));
        };

        let started = Instant::now();
        let outcome = self
            .executor
            .run_exclusive(move |document| operation.call(document, &params));
        let elapsed_ms = started.elapsed().as_millis();
        match outcome {
            Ok(Ok(result)) => {
                debug!(
                    target: DISPATCH_TARGET,
                    command = %command_type,
                    elapsed_ms,
                    "command succeeded"
                );
                Response::success(result)
            }
            Ok(Err(failure)) => {
                debug!(
                    target: DISPATCH_TARGET,
                    command = %command_type,
                    elapsed_ms,
                    error = %failure,
                    "command failed"
                );
                Response::error(failure.to_string())
            }
            Err(failure) => {
                error!(
                    target: DISPATCH_TARGET,
                    command = %command_type,
                    elapsed_ms,
                    error = %failure,
                    "command could not run"
                );
                Response::error(failure.to_string())
            }
        }
    }

    /// Interprets a framed JSON value as a command and runs it.
    #[must_use]
    pub fn dispatch_value(&self, value: Value) -> Response {
        match Command::from_value(value) {
            Ok(command) => self.dispatch(command),
            Err(failure) => {
                debug!(target: DISPATCH_TARGET, error = %failure, "rejected malformed command");
                Response::error(failure.to_string())
            }
        }
    }
}
