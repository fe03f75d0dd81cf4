//! TCP listener and per-connection command loop.
//!
//! The listener accepts connections on a background thread and hands each one
//! to a [`ConnectionHandler`] running on its own named thread. Every run of the
//! listener owns a fresh [`RunFlag`]; clearing it stops the accept loop and,
//! within one read poll interval, every connection that run spawned.

mod connection;
mod errors;
mod listener;
#[cfg(test)]
mod listener_tests;
#[cfg(test)]
mod test_utils;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) use self::connection::{CommandConnectionHandler, ConnectionHandler};
pub use self::errors::ListenerError;
pub(crate) use self::listener::{CommandListener, JoinOutcome, ListenerHandle};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Running flag shared by one listener run and the connections it spawned.
#[derive(Debug, Clone)]
pub(crate) struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub(crate) fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
