//! Error types for the client runtime.

use std::io;

use thiserror::Error;

use sceneport_protocol::ProtocolError;

/// Failures that stop the client before a response is printed.
#[derive(Debug, Error)]
pub enum AppError {
    /// The parameters argument is not valid JSON.
    #[error("failed to parse command parameters: {0}")]
    ParseParams(#[source] serde_json::Error),
    /// The parameters argument is valid JSON but not an object.
    #[error("command parameters must be a JSON object")]
    ParamsNotObject,
    /// The server host could not be resolved.
    #[error("failed to resolve server address {endpoint}: {source}")]
    Resolve {
        /// Endpoint being resolved.
        endpoint: String,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// Resolution succeeded but produced no addresses.
    #[error("server address {endpoint} resolved to no addresses")]
    ResolveEmpty {
        /// Endpoint being resolved.
        endpoint: String,
    },
    /// The TCP connection could not be established.
    #[error("failed to connect to server at {endpoint}: {source}")]
    Connect {
        /// Endpoint being contacted.
        endpoint: String,
        /// Socket error.
        #[source]
        source: io::Error,
    },
    /// The command could not be serialized.
    #[error("failed to serialise command: {0}")]
    SerialiseRequest(#[source] serde_json::Error),
    /// Writing the command failed.
    #[error("failed to send command to server: {0}")]
    SendRequest(#[source] io::Error),
    /// Reading the response failed.
    #[error("failed to read response from server: {0}")]
    ReadResponse(#[source] io::Error),
    /// The server sent bytes that cannot be framed as JSON.
    #[error("server sent an unreadable response: {0}")]
    Protocol(#[source] ProtocolError),
    /// The framed JSON is not a response envelope.
    #[error("server response is not a status envelope: {0}")]
    ParseResponse(#[source] serde_json::Error),
    /// The server closed the connection before a full response arrived.
    #[error("server closed the connection without a response")]
    MissingResponse,
    /// The response could not be rendered as JSON.
    #[error("failed to render response: {0}")]
    RenderResponse(#[source] serde_json::Error),
    /// Writing to stdout failed.
    #[error("failed to write response: {0}")]
    WriteOutput(#[source] io::Error),
}
