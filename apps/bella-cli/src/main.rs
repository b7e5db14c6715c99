//! Bella command-line entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    bella_cli::run()
}
