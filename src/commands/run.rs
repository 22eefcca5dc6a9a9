//! Running tasks and checking their status.

use crate::args::{Call, ExecutionRequest};
use crate::engine::Engine;
use crate::error::{Result, TaskError};
use crate::flags::Invocation;

/// Load the Taskfile and turn the positional arguments into calls.
///
/// The Taskfile's version decides how `NAME=VALUE` arguments are read, so
/// this can only happen after setup.
fn prepare<E: Engine>(engine: &mut E, invocation: &Invocation) -> Result<Vec<Call>> {
    engine.setup().map_err(TaskError::Setup)?;
    let version = engine.parsed_version().map_err(TaskError::Setup)?;

    let request = ExecutionRequest::build(&invocation.args, invocation.dash, version)?;
    tracing::debug!(
        version,
        calls = request.calls.len(),
        cli_args = %request.cli_args,
        "built execution request"
    );

    engine.merge_globals(request.globals);
    Ok(request.calls)
}

pub(super) fn show_status<E: Engine>(mut engine: E, invocation: &Invocation) -> Result<()> {
    let calls = prepare(&mut engine, invocation)?;
    if !invocation.flags.watch {
        engine.intercept_interrupt_signals();
    }
    engine.status(&calls).map_err(TaskError::Status)
}

pub(super) fn run_tasks<E: Engine>(mut engine: E, invocation: &Invocation, watch: bool) -> Result<()> {
    let calls = prepare(&mut engine, invocation)?;

    // The watch loop handles interrupts itself.
    if !watch {
        engine.intercept_interrupt_signals();
    }

    engine.run(&calls).map_err(|source| {
        engine.report_error(&source);
        let exit_code = if invocation.flags.exit_code {
            source.task_exit_code()
        } else {
            None
        };
        TaskError::Run { source, exit_code }
    })
}
