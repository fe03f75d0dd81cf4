//! Foreground process runner for `sceneportd`.
//!
//! The runner bootstraps the server, starts listening, then blocks until a
//! termination signal arrives and stops the server before returning.

mod errors;
mod shutdown;

use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};

pub use self::errors::LaunchError;
pub use self::shutdown::{SHUTDOWN_SIGNALS, ShutdownError, ShutdownSignal, SystemShutdownSignal};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Runs the server with system configuration and signal handling.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, binding, or signal handler
/// installation fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        &SystemShutdownSignal::new(),
    )
}

/// Runs the server with the supplied collaborators.
///
/// # Errors
///
/// See [`run_daemon`].
pub fn run_daemon_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let daemon = bootstrap_with(loader, reporter)?;
    let server = daemon.server();
    server.start()?;
    info!(
        target: PROCESS_TARGET,
        endpoint = %server.endpoint(),
        local_addr = ?server.local_addr(),
        "sceneportd ready"
    );

    let waited = shutdown.wait();
    server.stop();
    waited?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
