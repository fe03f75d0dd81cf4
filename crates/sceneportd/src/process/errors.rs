//! Error surface of the server process.

use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::server::ServerError;

use super::shutdown::ShutdownError;

/// Errors that end the server process with a failure status.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrap failed before the server existed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The command server could not start listening.
    #[error("failed to start command server: {0}")]
    Server(#[from] ServerError),
    /// Waiting for a shutdown signal failed.
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}
