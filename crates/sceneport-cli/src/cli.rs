//! CLI argument definitions for the sceneport client.

use clap::Parser;
use serde_json::{Map, Value};

use sceneport_config::{DEFAULT_PORT, ListenEndpoint};
use sceneport_protocol::Command;

use crate::errors::AppError;

/// Host the client connects to when `--host` is absent.
pub const DEFAULT_CLIENT_HOST: &str = "127.0.0.1";

/// Sends one command to a sceneport server and prints the response.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "sceneport", disable_help_subcommand = true)]
pub struct Cli {
    /// Server host name or IP address.
    #[arg(long, default_value = DEFAULT_CLIENT_HOST)]
    pub host: String,
    /// Server TCP port.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Command type, for example `get_document_info`.
    #[arg(value_name = "COMMAND_TYPE")]
    pub command_type: String,
    /// Command parameters as a JSON object.
    #[arg(value_name = "PARAMS_JSON")]
    pub params: Option<String>,
}

impl Cli {
    /// Endpoint named by `--host` and `--port`.
    #[must_use]
    pub fn endpoint(&self) -> ListenEndpoint {
        ListenEndpoint::new(self.host.clone(), self.port)
    }

    /// Builds the command to send. Absent parameters become `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ParseParams`] for invalid JSON and
    /// [`AppError::ParamsNotObject`] when the JSON is not an object.
    pub fn command(&self) -> Result<Command, AppError> {
        let params = match self.params.as_deref() {
            None => Map::new(),
            Some(raw) => match serde_json::from_str(raw).map_err(AppError::ParseParams)? {
                Value::Object(params) => params,
                _ => return Err(AppError::ParamsNotObject),
            },
        };
        Ok(Command::new(self.command_type.clone(), params))
    }
}
