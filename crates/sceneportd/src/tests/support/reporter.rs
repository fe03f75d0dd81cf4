//! Test double for [`HealthReporter`] that records lifecycle events.

use std::net::SocketAddr;
use std::sync::Mutex;

use sceneport_config::{Config, ListenEndpoint};

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::server::ServerError;

/// Lifecycle events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    ServerStarting,
    ServerStarted(Option<SocketAddr>),
    ServerStartFailed(String),
    ServerStopped,
}

impl HealthEvent {
    /// Event name as emitted by the structured reporter.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BootstrapStarting => "bootstrap_starting",
            Self::BootstrapSucceeded => "bootstrap_succeeded",
            Self::BootstrapFailed(_) => "bootstrap_failed",
            Self::ServerStarting => "server_starting",
            Self::ServerStarted(_) => "server_started",
            Self::ServerStartFailed(_) => "server_start_failed",
            Self::ServerStopped => "server_stopped",
        }
    }
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// Names of the recorded events, in order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(HealthEvent::name).collect()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn server_starting(&self, _endpoint: &ListenEndpoint) {
        self.record(HealthEvent::ServerStarting);
    }

    fn server_started(&self, _endpoint: &ListenEndpoint, local_addr: Option<SocketAddr>) {
        self.record(HealthEvent::ServerStarted(local_addr));
    }

    fn server_start_failed(&self, _endpoint: &ListenEndpoint, error: &ServerError) {
        self.record(HealthEvent::ServerStartFailed(error.to_string()));
    }

    fn server_stopped(&self, _endpoint: &ListenEndpoint) {
        self.record(HealthEvent::ServerStopped);
    }
}
