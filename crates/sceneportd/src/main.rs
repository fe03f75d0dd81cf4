//! Server entrypoint: runs [`sceneportd::run_daemon`] in the foreground and
//! exits non-zero when it fails.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match sceneportd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed yet, so report on stderr directly.
            drop(writeln!(io::stderr().lock(), "sceneportd: {error}"));
            ExitCode::FAILURE
        }
    }
}
