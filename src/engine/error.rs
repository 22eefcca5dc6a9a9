//! Errors reported by the task engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("task: No Taskfile found in \"{}\". Use \"task --init\" to create a new one", .0.display())]
    TaskfileNotFound(PathBuf),

    #[error("task: A Taskfile already exists at \"{}\"", .0.display())]
    TaskfileExists(PathBuf),

    #[error("task: Taskfile was not loaded")]
    NotLoaded,

    #[error("task: failed to read \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("task: failed to parse \"{}\": {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("task: Taskfile option \"version\" is required")]
    MissingVersion,

    #[error("task: could not parse Taskfile version \"{0}\"")]
    InvalidVersion(String),

    #[error("task: Taskfile version \"{0}\" is not supported, use version 2 or later")]
    UnsupportedVersion(String),

    #[error("task: Task \"{0}\" does not exist")]
    TaskNotFound(String),

    #[error("task: Cyclic dependency of task \"{0}\" detected")]
    CyclicDependency(String),

    /// A dependency already failed for another task of the same run.
    #[error("task: Dependency \"{0}\" failed")]
    DependencyFailed(String),

    #[error("task: invalid sources pattern \"{pattern}\": {source}")]
    InvalidSources {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A task command exited with a non-zero status.
    #[error("task: Failed to run task \"{task}\": exit status {code}")]
    TaskRun { task: String, code: i32 },

    #[error("task: Task \"{0}\" is not up-to-date")]
    NotUpToDate(String),

    #[error("task: failed to start command \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("task: interrupted")]
    Interrupted,

    #[error("task: failed to encode task list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("task: {0}")]
    Io(#[from] io::Error),
}

impl EngineError {
    /// The failing command's exit status, for structured task-run failures.
    pub fn task_exit_code(&self) -> Option<i32> {
        match self {
            EngineError::TaskRun { code, .. } => Some(*code),
            _ => None,
        }
    }
}
