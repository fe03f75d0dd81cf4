use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const TCP_SCHEME: &str = "tcp://";

/// TCP endpoint the command server binds to or a client connects to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListenEndpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port. Zero asks the operating system for an ephemeral port.
    pub port: u16,
}

impl ListenEndpoint {
    /// Builds an endpoint from a host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns a copy with the host replaced when an override is supplied.
    #[must_use]
    pub fn with_overrides(&self, host: Option<&str>, port: Option<u16>) -> Self {
        Self {
            host: host.map_or_else(|| self.host.clone(), str::to_owned),
            port: port.unwrap_or(self.port),
        }
    }
}

impl fmt::Display for ListenEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{TCP_SCHEME}{}:{}", self.host, self.port)
    }
}

impl FromStr for ListenEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let address = input.strip_prefix(TCP_SCHEME).unwrap_or(input);
        if let Some((scheme, _)) = address.split_once("://") {
            return Err(EndpointParseError::UnsupportedScheme(scheme.to_owned()));
        }
        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(input.to_owned()))?;
        if host.is_empty() {
            return Err(EndpointParseError::MissingHost(input.to_owned()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| EndpointParseError::InvalidPort(input.to_owned()))?;
        Ok(Self::new(
            host.trim_start_matches('[').trim_end_matches(']'),
            port,
        ))
    }
}

/// Errors encountered while parsing a [`ListenEndpoint`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointParseError {
    /// Scheme was not `tcp`.
    #[error("unsupported endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    /// Host name was missing.
    #[error("missing TCP host in '{0}'")]
    MissingHost(String),
    /// Port was missing from the address.
    #[error("missing TCP port in '{0}'")]
    MissingPort(String),
    /// Port was not a valid `u16`.
    #[error("invalid TCP port in '{0}'")]
    InvalidPort(String),
}
