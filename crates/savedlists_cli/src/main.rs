//! `savedlists` terminal front-end.
//!
//! # Responsibility
//! - Drive the core list workflows from a shell.
//! - Keep stdout machine-readable; prompts and notices go to stderr.

mod app;
mod console;

use std::process::ExitCode;

fn main() -> ExitCode {
    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
