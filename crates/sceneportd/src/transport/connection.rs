//! Per-connection read, frame, dispatch and respond loop.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::{debug, warn};

use sceneport_protocol::{MessageFramer, Response};

use super::{LISTENER_TARGET, RunFlag};
use crate::dispatch::Dispatcher;

const READ_BUFFER_BYTES: usize = 8192;

/// Handles accepted connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Serves one connection until the peer leaves or `running` clears.
    /// Implementations must not panic.
    fn handle(&self, stream: TcpStream, running: &RunFlag);
}

/// Why a connection loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionEnd {
    PeerClosed,
    Stopped,
    Oversized,
}

/// Handler that frames JSON commands and answers each with an envelope.
pub(crate) struct CommandConnectionHandler<D> {
    dispatcher: Dispatcher<D>,
}

impl<D: Send + 'static> CommandConnectionHandler<D> {
    pub(crate) const fn new(dispatcher: Dispatcher<D>) -> Self {
        Self { dispatcher }
    }

    /// Runs the command loop over any byte stream.
    pub(crate) fn serve<S: Read + Write>(
        &self,
        stream: &mut S,
        running: &RunFlag,
        peer: &str,
    ) -> io::Result<ConnectionEnd> {
        let mut framer = MessageFramer::new();
        let mut chunk = [0_u8; READ_BUFFER_BYTES];
        while running.is_running() {
            let read = match stream.read(&mut chunk) {
                Ok(0) => return Ok(ConnectionEnd::PeerClosed),
                Ok(read) => read,
                Err(error) if is_idle(&error) => continue,
                Err(error) => return Err(error),
            };
            let bytes = chunk.get(..read).unwrap_or_default();
            if let Err(error) = framer.push(bytes) {
                warn!(
                    target: LISTENER_TARGET,
                    peer,
                    error = %error,
                    "closing oversized connection"
                );
                write_response(stream, &Response::error(error.to_string()))?;
                return Ok(ConnectionEnd::Oversized);
            }
            while let Some(message) = framer.next_message() {
                let response = match message {
                    Ok(value) => self.dispatcher.dispatch_value(value),
                    Err(error) => {
                        debug!(
                            target: LISTENER_TARGET,
                            peer,
                            error = %error,
                            "discarding malformed input"
                        );
                        Response::error(error.to_string())
                    }
                };
                write_response(stream, &response)?;
            }
        }
        Ok(ConnectionEnd::Stopped)
    }
}

impl<D: Send + 'static> ConnectionHandler for CommandConnectionHandler<D> {
    fn handle(&self, mut stream: TcpStream, running: &RunFlag) {
        let peer = stream
            .peer_addr()
            .map_or_else(|_| "unknown".to_owned(), |addr| addr.to_string());
        debug!(target: LISTENER_TARGET, peer, "client connected");
        match self.serve(&mut stream, running, &peer) {
            Ok(end) => debug!(target: LISTENER_TARGET, peer, ?end, "client disconnected"),
            Err(error) => warn!(
                target: LISTENER_TARGET,
                peer,
                error = %error,
                "connection handler error"
            ),
        }
        drop(stream.shutdown(Shutdown::Both));
    }
}

/// Read timeouts surface as either kind depending on the platform.
fn is_idle(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

fn write_response<W: Write>(stream: &mut W, response: &Response) -> io::Result<()> {
    let bytes = response.to_bytes().map_err(io::Error::other)?;
    stream.write_all(&bytes)?;
    stream.flush()
}
