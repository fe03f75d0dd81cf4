//! Accept loop for the command listener.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use sceneport_config::ListenEndpoint;

use super::{ConnectionHandler, LISTENER_TARGET, ListenerError, RunFlag};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(10);
const ACCEPT_THREAD_NAME: &str = "sceneport-accept";

/// Read timeout applied to accepted streams; connection loops re-check their
/// run flag at this interval.
pub(crate) const READ_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Listener bound to a TCP endpoint but not yet accepting.
#[derive(Debug)]
pub(crate) struct CommandListener {
    endpoint: ListenEndpoint,
    listener: TcpListener,
}

impl CommandListener {
    pub(crate) fn bind(endpoint: &ListenEndpoint) -> Result<Self, ListenerError> {
        let listener = bind_tcp(&endpoint.host, endpoint.port)?;
        Ok(Self {
            endpoint: endpoint.clone(),
            listener,
        })
    }

    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Switches the socket to non-blocking mode and launches the accept loop.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let local_addr = self.local_addr();
        let endpoint = self.endpoint.clone();
        let running = RunFlag::new();
        let accept_flag = running.clone();
        let handle = thread::Builder::new()
            .name(ACCEPT_THREAD_NAME.to_owned())
            .spawn(move || run_accept_loop(&self, &accept_flag, &handler))
            .map_err(|source| ListenerError::ThreadSpawn { source })?;
        Ok(ListenerHandle {
            running,
            handle: Some(handle),
            endpoint,
            local_addr,
        })
    }
}

/// Whether the accept thread finished inside the join deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinOutcome {
    Joined,
    Detached,
}

/// Handle to a running accept loop.
#[derive(Debug)]
pub(crate) struct ListenerHandle {
    running: RunFlag,
    handle: Option<thread::JoinHandle<()>>,
    endpoint: ListenEndpoint,
    local_addr: Option<SocketAddr>,
}

impl ListenerHandle {
    pub(crate) fn shutdown(&self) {
        self.running.stop();
    }

    pub(crate) const fn endpoint(&self) -> &ListenEndpoint {
        &self.endpoint
    }

    pub(crate) const fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Clears the run flag and waits up to `timeout` for the accept thread.
    /// A thread still running at the deadline is detached.
    pub(crate) fn join_timeout(mut self, timeout: Duration) -> Result<JoinOutcome, ListenerError> {
        self.shutdown();
        let Some(handle) = self.handle.take() else {
            return Ok(JoinOutcome::Joined);
        };
        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                return Ok(JoinOutcome::Detached);
            }
            thread::sleep(JOIN_POLL_INTERVAL);
        }
        handle
            .join()
            .map(|()| JoinOutcome::Joined)
            .map_err(|_| ListenerError::ThreadPanic)
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.running.stop();
    }
}

fn run_accept_loop(
    listener: &CommandListener,
    running: &RunFlag,
    handler: &Arc<dyn ConnectionHandler>,
) {
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.endpoint,
        "command listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while running.is_running() {
        match accept_connection(&listener.listener) {
            Ok(Some((stream, peer))) => {
                last_error = None;
                spawn_connection(stream, peer, running, handler);
            }
            Ok(None) => thread::sleep(ACCEPT_BACKOFF),
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    debug!(
        target: LISTENER_TARGET,
        endpoint = %listener.endpoint,
        "command listener stopped"
    );
}

fn spawn_connection(
    stream: TcpStream,
    peer: SocketAddr,
    running: &RunFlag,
    handler: &Arc<dyn ConnectionHandler>,
) {
    let handler = Arc::clone(handler);
    let running = running.clone();
    let spawned = thread::Builder::new()
        .name(format!("sceneport-conn-{peer}"))
        .spawn(move || handler.handle(stream, &running));
    if let Err(error) = spawned {
        warn!(
            target: LISTENER_TARGET,
            peer = %peer,
            error = %error,
            "failed to spawn connection thread; dropping connection"
        );
    }
}

fn accept_connection(listener: &TcpListener) -> io::Result<Option<(TcpStream, SocketAddr)>> {
    match listener.accept() {
        Ok((stream, peer)) => {
            stream.set_nonblocking(false)?;
            stream.set_read_timeout(Some(READ_POLL_INTERVAL))?;
            Ok(Some((stream, peer)))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}
