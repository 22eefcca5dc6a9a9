//! Dispatching an invocation to the task engine.
//!
//! [`dispatch`] selects the mode, builds the engine configuration and drives
//! the engine through the selected branch. It never exits the process:
//! every failure comes back as a [`TaskError`] for `main` to turn into an
//! exit status.

mod list;
mod run;

use crate::engine::{Engine, EngineConfig};
use crate::error::{Result, TaskError};
use crate::flags::Invocation;
use crate::mode::{Mode, select_mode};
use crate::version;
use std::io::Write;

/// Dispatch an invocation.
///
/// `build` creates the engine from its configuration. It is not called at
/// all for `--version`.
pub fn dispatch<E, F>(invocation: &Invocation, build: F, out: &mut dyn Write) -> Result<()>
where
    E: Engine,
    F: FnOnce(EngineConfig) -> E,
{
    let flags = &invocation.flags;
    let mode = select_mode(flags)?;
    tracing::debug!(?mode, "selected mode");

    let config = EngineConfig::from(flags);

    match mode {
        Mode::ShowVersion => show_version(out),
        Mode::InitTaskfile => init_taskfile(build(config), out),
        Mode::ListTasks(query) => list::list_tasks(build(config), &query, flags.silent),
        Mode::ShowStatus => run::show_status(build(config), invocation),
        Mode::RunTasks { watch } => run::run_tasks(build(config), invocation, watch),
    }
}

fn show_version(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Task version: {}", version::version()).map_err(TaskError::Output)
}

fn init_taskfile<E: Engine>(mut engine: E, out: &mut dyn Write) -> Result<()> {
    let dir = std::env::current_dir().map_err(TaskError::WorkingDir)?;
    engine.init_taskfile(out, &dir).map_err(TaskError::Init)
}
