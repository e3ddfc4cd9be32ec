//! Skyburst - cursor-triggered fireworks overlay for truecolor terminals

use std::process::ExitCode;

use skyburst::cli;

fn main() -> ExitCode {
    cli::run()
}
