//! Command-line client for the sceneport command server.
//!
//! The runtime parses `sceneport [--host H] [--port P] <command_type>
//! [params-json]`, sends one command, waits for its response and prints the
//! envelope as pretty JSON. The interface takes its IO streams as parameters
//! so tests can capture output without spawning the binary.
//!
//! Exit codes: `0` for a `success` envelope, `1` for an `error` envelope and
//! `2` for usage or transport failures.

mod cli;
mod errors;
mod transport;

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use sceneport_protocol::Response;

pub use cli::{Cli, DEFAULT_CLIENT_HOST};
pub use errors::AppError;

/// Exit status when the server reports an `error` envelope.
pub const EXIT_COMMAND_ERROR: u8 = 1;
/// Exit status for usage and transport failures.
pub const EXIT_USAGE_OR_TRANSPORT: u8 = 2;

/// Runs the client with the given arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    match send(&cli).and_then(|response| emit(&response, stdout).map(|()| response)) {
        Ok(response) => exit_code_for(&response),
        Err(error) => {
            drop(writeln!(stderr, "sceneport: {error}"));
            ExitCode::from(EXIT_USAGE_OR_TRANSPORT)
        }
    }
}

/// Sends the command described by `cli` and returns the server's response.
///
/// # Errors
///
/// Returns an [`AppError`] when the parameters are invalid, the server
/// cannot be reached, or the reply is not a response envelope.
pub fn send(cli: &Cli) -> Result<Response, AppError> {
    let command = cli.command()?;
    let mut stream = transport::connect(&cli.endpoint())?;
    transport::exchange(&mut stream, &command)
}

fn emit<W: Write>(response: &Response, stdout: &mut W) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(response).map_err(AppError::RenderResponse)?;
    writeln!(stdout, "{rendered}").map_err(AppError::WriteOutput)?;
    stdout.flush().map_err(AppError::WriteOutput)
}

fn exit_code_for(response: &Response) -> ExitCode {
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_COMMAND_ERROR)
    }
}

fn report_usage<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render();
    if matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        drop(write!(stdout, "{rendered}"));
        return ExitCode::SUCCESS;
    }
    drop(write!(stderr, "{rendered}"));
    ExitCode::from(EXIT_USAGE_OR_TRANSPORT)
}
