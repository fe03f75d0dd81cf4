//! CLI entrypoint for the sceneport client.
//!
//! The binary delegates to [`sceneport_cli::run`], which parses arguments,
//! sends one command to the server and prints the response.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    sceneport_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
