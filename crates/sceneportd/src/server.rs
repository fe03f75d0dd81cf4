//! Lifecycle of the command server.

use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use sceneport_config::ListenEndpoint;

use crate::dispatch::{Dispatcher, OperationRegistry};
use crate::executor::{Executor, ExecutorError};
use crate::health::HealthReporter;
use crate::transport::{
    CommandConnectionHandler, CommandListener, ConnectionHandler, JoinOutcome, ListenerError,
    ListenerHandle,
};

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Upper bound on how long [`CommandServer::stop`] waits for the accept
/// thread.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Errors surfaced while constructing or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound or launched.
    #[error(transparent)]
    Listener(#[from] ListenerError),
    /// The executor could not be created.
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// TCP command server over a document `D`.
///
/// The server owns the executor holding the document, so the document
/// survives any number of stop/start cycles. All lifecycle state sits behind
/// one mutex, which makes concurrent `start` and `stop` calls safe.
pub struct CommandServer<D> {
    endpoint: ListenEndpoint,
    dispatcher: Dispatcher<D>,
    reporter: Arc<dyn HealthReporter>,
    listener: Mutex<Option<ListenerHandle>>,
    executor: Executor<D>,
}

impl<D> fmt::Debug for CommandServer<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandServer")
            .field("endpoint", &self.endpoint)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<D: Send + 'static> CommandServer<D> {
    /// Builds a stopped server that will listen on `endpoint` and run the
    /// operations in `registry` against `document`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Executor`] when the executor thread cannot be
    /// spawned.
    pub fn new(
        endpoint: ListenEndpoint,
        registry: OperationRegistry<D>,
        document: D,
        reporter: Arc<dyn HealthReporter>,
    ) -> Result<Self, ServerError> {
        let executor = Executor::spawn(document)?;
        let dispatcher = Dispatcher::new(registry, executor.handle());
        Ok(Self {
            endpoint,
            dispatcher,
            reporter,
            listener: Mutex::new(None),
            executor,
        })
    }

    /// Endpoint used by [`Self::start`].
    #[must_use]
    pub const fn endpoint(&self) -> &ListenEndpoint {
        &self.endpoint
    }

    /// Dispatcher shared by every connection.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<D> {
        &self.dispatcher
    }

    /// Starts listening on the configured endpoint.
    ///
    /// # Errors
    ///
    /// See [`Self::start_on`].
    pub fn start(&self) -> Result<(), ServerError> {
        self.start_on(&self.endpoint)
    }

    /// Starts listening on `endpoint`. Starting a running server logs a
    /// warning and leaves the existing listener untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Listener`] when the endpoint cannot be resolved
    /// or bound; the server then stays stopped.
    pub fn start_on(&self, endpoint: &ListenEndpoint) -> Result<(), ServerError> {
        let mut listener = self.lock_listener();
        if let Some(running) = listener.as_ref() {
            warn!(
                target: SERVER_TARGET,
                endpoint = %running.endpoint(),
                "command server already running"
            );
            return Ok(());
        }

        self.reporter.server_starting(endpoint);
        let handler: Arc<dyn ConnectionHandler> =
            Arc::new(CommandConnectionHandler::new(self.dispatcher.clone()));
        match CommandListener::bind(endpoint).and_then(|bound| bound.start(handler)) {
            Ok(handle) => {
                self.reporter.server_started(endpoint, handle.local_addr());
                *listener = Some(handle);
                Ok(())
            }
            Err(error) => {
                let error = ServerError::from(error);
                self.reporter.server_start_failed(endpoint, &error);
                Err(error)
            }
        }
    }
}

impl<D> CommandServer<D> {
    /// Stops accepting connections. Calling `stop` on a stopped server does
    /// nothing.
    ///
    /// Connection threads finish on their own: each notices the cleared run
    /// flag within one read poll interval.
    pub fn stop(&self) {
        let mut listener = self.lock_listener();
        let Some(handle) = listener.take() else {
            debug!(target: SERVER_TARGET, "command server already stopped");
            return;
        };
        let endpoint = handle.endpoint().clone();
        match handle.join_timeout(STOP_TIMEOUT) {
            Ok(JoinOutcome::Joined) => {
                info!(target: SERVER_TARGET, endpoint = %endpoint, "accept loop joined");
            }
            Ok(JoinOutcome::Detached) => warn!(
                target: SERVER_TARGET,
                endpoint = %endpoint,
                timeout_ms = STOP_TIMEOUT.as_millis(),
                "accept loop did not stop in time; detaching"
            ),
            Err(error) => warn!(
                target: SERVER_TARGET,
                endpoint = %endpoint,
                error = %error,
                "accept loop ended abnormally"
            ),
        }
        self.reporter.server_stopped(&endpoint);
    }

    /// Returns true while a listener is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_listener().is_some()
    }

    /// Address the running listener is bound to. Useful with port 0.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.lock_listener()
            .as_ref()
            .and_then(ListenerHandle::local_addr)
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<ListenerHandle>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D> Drop for CommandServer<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
