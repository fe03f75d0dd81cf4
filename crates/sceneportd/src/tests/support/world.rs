//! BDD test world: loader, reporter, bootstrapped daemon and the last client
//! response, shared by the lifecycle step functions.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};

use sceneport_config::ListenEndpoint;
use sceneport_protocol::{Command, MessageFramer, Response};

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, bootstrap_with};
use crate::server::ServerError;

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::reporter::RecordingHealthReporter;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    loader: Box<dyn ConfigLoader>,
    pub reporter: Arc<RecordingHealthReporter>,
    daemon: Option<Daemon>,
    bootstrap_error: Option<BootstrapError>,
    start_error: Option<ServerError>,
    occupied: Option<TcpListener>,
    last_port: Option<u16>,
    response: Option<Response>,
}

impl TestWorld {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new(0)),
            reporter: Arc::new(RecordingHealthReporter::default()),
            daemon: None,
            bootstrap_error: None,
            start_error: None,
            occupied: None,
            last_port: None,
            response: None,
        }
    }

    /// Binds a port so the server cannot, and points the config at it.
    pub fn occupy_port(&mut self) {
        let occupied = TcpListener::bind("127.0.0.1:0").expect("occupy a port");
        let port = occupied.local_addr().expect("occupied address").port();
        self.loader = Box::new(TestConfigLoader::new(port));
        self.occupied = Some(occupied);
    }

    pub fn use_failing_loader(&mut self) {
        self.loader = Box::new(FailingConfigLoader);
    }

    pub fn bootstrap(&mut self) {
        match bootstrap_with(&*self.loader, self.reporter.clone()) {
            Ok(daemon) => self.daemon = Some(daemon),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    #[must_use]
    pub const fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    #[must_use]
    pub const fn start_error(&self) -> Option<&ServerError> {
        self.start_error.as_ref()
    }

    fn daemon(&self) -> &Daemon {
        self.daemon.as_ref().expect("daemon should be bootstrapped")
    }

    pub fn start(&mut self) {
        if let Err(error) = self.daemon().server().start() {
            self.start_error = Some(error);
        }
    }

    pub fn start_on_last_port(&mut self) {
        let port = self.last_port.expect("server should have run before");
        let endpoint = ListenEndpoint::new("127.0.0.1", port);
        if let Err(error) = self.daemon().server().start_on(&endpoint) {
            self.start_error = Some(error);
        }
    }

    pub fn stop(&mut self) {
        self.last_port = self.local_addr().map(|addr| addr.port());
        self.daemon().server().stop();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.daemon().server().is_running()
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.daemon().server().local_addr()
    }

    /// Sends one command on a fresh connection and stores the response.
    pub fn send(&mut self, command_type: &str, params: Value) {
        let addr = self.local_addr().expect("server should be listening");
        let params = match params {
            Value::Object(params) => params,
            _ => Map::new(),
        };
        let bytes = Command::new(command_type, params)
            .to_bytes()
            .expect("serialize command");

        let mut stream = TcpStream::connect_timeout(&addr, CLIENT_TIMEOUT).expect("connect");
        stream
            .set_read_timeout(Some(CLIENT_TIMEOUT))
            .expect("set read timeout");
        stream.write_all(&bytes).expect("write command");

        let mut framer = MessageFramer::new();
        let mut chunk = [0_u8; 4096];
        let value = loop {
            if let Some(message) = framer.next_message() {
                break message.expect("response should be JSON");
            }
            let read = stream.read(&mut chunk).expect("read response");
            assert!(read > 0, "server closed the connection without responding");
            framer.push(&chunk[..read]).expect("buffer response");
        };
        self.response = Some(Response::from_value(value).expect("response envelope"));
    }

    pub fn create_point(&mut self, name: &str) {
        self.send(
            "create_object",
            json!({"type": "POINT", "name": name, "params": {"x": 1, "y": 2, "z": 3}}),
        );
    }

    #[must_use]
    pub fn response(&self) -> &Response {
        self.response.as_ref().expect("a response should be recorded")
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
