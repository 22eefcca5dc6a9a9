//! The task engine behind the front controller.
//!
//! [`Engine`] is everything the dispatcher needs from an engine: loading
//! the Taskfile, listing, checking status, running tasks and creating a new
//! Taskfile. [`Executor`] is the implementation the binary uses.

mod config;
mod error;
mod executor;
mod logger;
pub mod taskfile;

use crate::args::{Call, Vars};
use crate::mode::ListQuery;
use std::io::Write;
use std::path::Path;

pub use config::EngineConfig;
pub use error::EngineError;
pub use executor::Executor;
pub use logger::Logger;

/// Operations the dispatcher invokes on a task engine.
pub trait Engine {
    /// Locate, read and validate the Taskfile.
    fn setup(&mut self) -> Result<(), EngineError>;

    /// Version declared by the loaded Taskfile, e.g. `3.0`.
    fn parsed_version(&self) -> Result<f64, EngineError>;

    /// Print bare task names, one per line, without a full setup.
    fn list_task_names(&mut self, include_all: bool) -> Result<(), EngineError>;

    /// Print the task listing. Returns whether any task matched.
    fn list_tasks(&mut self, query: &ListQuery) -> Result<bool, EngineError>;

    /// Fail unless every called task is up to date.
    fn status(&mut self, calls: &[Call]) -> Result<(), EngineError>;

    /// Run the called tasks, or keep re-running them in watch mode.
    fn run(&mut self, calls: &[Call]) -> Result<(), EngineError>;

    /// Create a new Taskfile in `dir`, reporting to `out`.
    fn init_taskfile(&mut self, out: &mut dyn Write, dir: &Path) -> Result<(), EngineError>;

    /// Merge command-line variables over the Taskfile's variables.
    fn merge_globals(&mut self, globals: Vars);

    /// Let running commands wind down when the user hits Ctrl-C.
    fn intercept_interrupt_signals(&mut self);

    /// Show an error to the user through the engine's logger.
    fn report_error(&self, err: &EngineError);
}
