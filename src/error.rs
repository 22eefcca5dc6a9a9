//! Error types for the `task` CLI.
//!
//! Every failure the front controller can hit is a [`TaskError`] variant.
//! Errors propagate up to `main`, which is the only place that turns them
//! into a process exit status.

use crate::engine::EngineError;
use crate::exit_codes;
use thiserror::Error;

/// Main error type for the front controller.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Flags were combined in a way that makes no sense.
    #[error("task: {0}")]
    Config(String),

    /// A pass-through argument could not be quoted for the shell.
    #[error("task: failed to quote CLI argument: {0}")]
    Quote(#[from] shlex::QuoteError),

    /// The Taskfile could not be found, parsed, or its version resolved.
    #[error("{0}")]
    Setup(#[source] EngineError),

    /// Creating a new Taskfile failed.
    #[error("{0}")]
    Init(#[source] EngineError),

    /// The current directory could not be determined.
    #[error("task: failed to get the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    /// Writing to standard output failed.
    #[error("task: failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// Listing found nothing to show. The engine already told the user.
    #[error("task: no tasks found")]
    NoTasksFound,

    /// Listing failed.
    #[error("{0}")]
    List(#[source] EngineError),

    /// A task is not up to date, or checking its status failed.
    #[error("{0}")]
    Status(#[source] EngineError),

    /// Running the requested tasks failed.
    ///
    /// `exit_code` is only set when `--exit-code` was given and the failure
    /// came from a task command exiting non-zero.
    #[error("{source}")]
    Run {
        #[source]
        source: EngineError,
        exit_code: Option<i32>,
    },
}

impl TaskError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::Run {
                exit_code: Some(code),
                ..
            } => *code,
            _ => exit_codes::FAILURE,
        }
    }

    /// Whether the error was already shown to the user by the time it
    /// reaches `main`.
    pub fn is_reported(&self) -> bool {
        matches!(self, TaskError::NoTasksFound | TaskError::Run { .. })
    }
}

/// Result type alias for front controller operations.
pub type Result<T> = std::result::Result<T, TaskError>;
