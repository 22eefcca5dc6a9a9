//! Task: a task runner driven by a YAML Taskfile.
//!
//! This is the entry point for the `task` CLI. It parses arguments, hands
//! the invocation to the dispatcher and turns errors into exit codes.

mod args;
mod cli;
mod commands;
mod engine;
pub mod error;
pub mod exit_codes;
mod flags;
mod mode;
#[cfg(test)]
mod test_support;
mod version;

use cli::Cli;
use engine::Executor;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let invocation = Cli::parse_args().into_invocation();
    init_tracing(invocation.flags.verbose);

    match commands::dispatch(&invocation, Executor::new, &mut io::stdout()) {
        Ok(()) => ExitCode::from(exit_codes::to_status_byte(exit_codes::SUCCESS)),
        Err(err) => {
            if !err.is_reported() {
                eprintln!("{}", err);
            }
            ExitCode::from(exit_codes::to_status_byte(err.exit_code()))
        }
    }
}
