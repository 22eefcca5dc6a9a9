//! `--list`, `--list-all` and `--json`.

use crate::engine::Engine;
use crate::error::{Result, TaskError};
use crate::mode::ListQuery;

/// List tasks.
///
/// With `--silent` only bare names are printed and the Taskfile is not
/// validated, so shell completion keeps working with broken Taskfiles.
pub(super) fn list_tasks<E: Engine>(mut engine: E, query: &ListQuery, silent: bool) -> Result<()> {
    if silent {
        return engine
            .list_task_names(query.include_all)
            .map_err(TaskError::List);
    }

    engine.setup().map_err(TaskError::Setup)?;
    engine.parsed_version().map_err(TaskError::Setup)?;

    match engine.list_tasks(query) {
        Ok(true) => Ok(()),
        Ok(false) => Err(TaskError::NoTasksFound),
        Err(e) => Err(TaskError::List(e)),
    }
}
