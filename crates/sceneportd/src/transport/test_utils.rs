//! Test helpers for the transport module.

use std::net::TcpStream;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::thread;

use super::{ConnectionHandler, RunFlag};

/// Counts accepted connections and records the thread each one ran on.
pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
    thread_names: Mutex<Vec<String>>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
            thread_names: Mutex::new(Vec::new()),
        });
        (count, handler)
    }

    pub(crate) fn thread_names(&self) -> Vec<String> {
        self.thread_names.lock().expect("thread names lock").clone()
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, _stream: TcpStream, _running: &RunFlag) {
        let name = thread::current().name().unwrap_or_default().to_owned();
        self.thread_names
            .lock()
            .expect("thread names lock")
            .push(name);
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Holds each connection open until its run flag clears.
pub(crate) struct ParkingHandler {
    finished: Arc<AtomicUsize>,
}

impl ParkingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let finished = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            finished: Arc::clone(&finished),
        });
        (finished, handler)
    }
}

impl ConnectionHandler for ParkingHandler {
    fn handle(&self, _stream: TcpStream, running: &RunFlag) {
        while running.is_running() {
            thread::sleep(super::listener::READ_POLL_INTERVAL);
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
