//! Structured health reporting for server lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use sceneport_config::{Config, ListenEndpoint};

use crate::bootstrap::BootstrapError;
use crate::server::ServerError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer notified of bootstrap and listener lifecycle events.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked before the listener binds.
    fn server_starting(&self, endpoint: &ListenEndpoint);

    /// Invoked once the listener is accepting connections.
    fn server_started(&self, endpoint: &ListenEndpoint, local_addr: Option<SocketAddr>);

    /// Invoked when the listener could not be started.
    fn server_start_failed(&self, endpoint: &ListenEndpoint, error: &ServerError);

    /// Invoked after the listener has been stopped.
    fn server_stopped(&self, endpoint: &ListenEndpoint);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn server_starting(&self, endpoint: &ListenEndpoint) {
        (**self).server_starting(endpoint);
    }

    fn server_started(&self, endpoint: &ListenEndpoint, local_addr: Option<SocketAddr>) {
        (**self).server_started(endpoint, local_addr);
    }

    fn server_start_failed(&self, endpoint: &ListenEndpoint, error: &ServerError) {
        (**self).server_start_failed(endpoint, error);
    }

    fn server_stopped(&self, endpoint: &ListenEndpoint) {
        (**self).server_stopped(endpoint);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting server bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            endpoint = %config.endpoint(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "server bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "server bootstrap failed"
        );
    }

    fn server_starting(&self, endpoint: &ListenEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_starting",
            endpoint = %endpoint,
            "starting command server"
        );
    }

    fn server_started(&self, endpoint: &ListenEndpoint, local_addr: Option<SocketAddr>) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_started",
            endpoint = %endpoint,
            local_addr = ?local_addr,
            "command server listening"
        );
    }

    fn server_start_failed(&self, endpoint: &ListenEndpoint, error: &ServerError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "server_start_failed",
            endpoint = %endpoint,
            error = %error,
            "command server failed to start"
        );
    }

    fn server_stopped(&self, endpoint: &ListenEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_stopped",
            endpoint = %endpoint,
            "command server stopped"
        );
    }
}
