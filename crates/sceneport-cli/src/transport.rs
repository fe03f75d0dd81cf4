//! TCP transport for the client: connect, send one command, read one
//! response.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use sceneport_config::ListenEndpoint;
use sceneport_protocol::{Command, MessageFramer, Response};

use crate::errors::AppError;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
const READ_CHUNK: usize = 8192;

pub(crate) fn connect(endpoint: &ListenEndpoint) -> Result<TcpStream, AppError> {
    let address = resolve(endpoint)?;
    TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT).map_err(|source| AppError::Connect {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn resolve(endpoint: &ListenEndpoint) -> Result<SocketAddr, AppError> {
    let mut addresses = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|source| AppError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?;
    addresses.next().ok_or_else(|| AppError::ResolveEmpty {
        endpoint: endpoint.to_string(),
    })
}

/// Writes `command` and blocks until the framer yields one response.
pub(crate) fn exchange<S: Read + Write>(
    stream: &mut S,
    command: &Command,
) -> Result<Response, AppError> {
    let bytes = command.to_bytes().map_err(AppError::SerialiseRequest)?;
    stream.write_all(&bytes).map_err(AppError::SendRequest)?;
    stream.flush().map_err(AppError::SendRequest)?;

    let mut framer = MessageFramer::new();
    let mut chunk = [0_u8; READ_CHUNK];
    loop {
        if let Some(message) = framer.next_message() {
            let value = message.map_err(AppError::Protocol)?;
            return Response::from_value(value).map_err(AppError::ParseResponse);
        }
        let read = match stream.read(&mut chunk) {
            Ok(0) => return Err(AppError::MissingResponse),
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(AppError::ReadResponse(error)),
        };
        framer
            .push(chunk.get(..read).unwrap_or_default())
            .map_err(AppError::Protocol)?;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::{Map, json};

    use super::*;

    /// In-memory duplex: reads come from `input`, writes land in `output`.
    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
        chunk: usize,
    }

    impl Duplex {
        fn new(input: &[u8], chunk: usize) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
                chunk,
            }
        }
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let limit = self.chunk.min(buf.len());
            self.input.read(&mut buf[..limit])
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn command() -> Command {
        Command::new("get_document_info", Map::new())
    }

    #[test]
    fn writes_the_command_and_reads_a_split_response() {
        let mut duplex = Duplex::new(br#"{"status":"success","result":{"n":1}}"#, 3);

        let response = exchange(&mut duplex, &command()).expect("exchange");

        assert_eq!(response, Response::success(json!({"n": 1})));
        let sent: serde_json::Value = serde_json::from_slice(&duplex.output).expect("sent JSON");
        assert_eq!(sent, json!({"type": "get_document_info", "params": {}}));
    }

    #[test]
    fn trailing_bytes_after_the_response_are_ignored() {
        let mut duplex = Duplex::new(
            br#"{"status":"error","message":"nope"}{"status":"success","result":1}"#,
            READ_CHUNK,
        );

        let response = exchange(&mut duplex, &command()).expect("exchange");

        assert_eq!(response, Response::error("nope"));
    }

    #[test]
    fn early_close_is_a_missing_response() {
        let mut duplex = Duplex::new(br#"{"status":"succ"#, READ_CHUNK);
        assert!(matches!(
            exchange(&mut duplex, &command()),
            Err(AppError::MissingResponse)
        ));
    }

    #[test]
    fn garbage_is_a_protocol_error() {
        let mut duplex = Duplex::new(b"<html>", READ_CHUNK);
        assert!(matches!(
            exchange(&mut duplex, &command()),
            Err(AppError::Protocol(_))
        ));
    }

    #[test]
    fn non_envelope_json_is_rejected() {
        let mut duplex = Duplex::new(br#"{"ok":true}"#, READ_CHUNK);
        assert!(matches!(
            exchange(&mut duplex, &command()),
            Err(AppError::ParseResponse(_))
        ));
    }

    #[test]
    fn refused_connections_report_the_endpoint() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("ephemeral port")
            .port();

        let error = connect(&ListenEndpoint::new("127.0.0.1", port)).expect_err("refused");

        assert!(
            error
                .to_string()
                .contains(&format!("tcp://127.0.0.1:{port}")),
            "{error}"
        );
    }
}
