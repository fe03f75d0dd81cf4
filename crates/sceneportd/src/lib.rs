//! TCP command server for a long-lived 3D scene document.
//!
//! Automation clients connect over raw TCP and send one JSON object per
//! command. Each connection runs on its own thread, but every command is
//! executed on a single worker thread that owns the document, so mutations
//! never interleave no matter how many clients are connected.
//!
//! The pieces, leaf first:
//!
//! - the transport accepts connections and frames undelimited JSON messages
//! - the [`Dispatcher`] maps a command name to an [`Operation`] in an
//!   [`OperationRegistry`] and wraps every outcome in a response envelope
//! - the [`Executor`] serializes operations against the document
//! - the [`CommandServer`] owns all of the above and exposes idempotent
//!   start and stop
//!
//! [`bootstrap_with`] assembles a server over a fresh
//! [`sceneport_scene::Document`] with the whole scene catalog registered, and
//! [`run_daemon`] drives it from process start to a termination signal.

mod bootstrap;
mod dispatch;
mod executor;
mod health;
mod process;
mod server;
pub mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{Dispatcher, Operation, OperationError, OperationRegistry};
pub use executor::{Executor, ExecutorError, ExecutorHandle};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, SHUTDOWN_SIGNALS, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon,
    run_daemon_with,
};
pub use server::{CommandServer, STOP_TIMEOUT, ServerError};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
