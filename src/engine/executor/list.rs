//! Task listings for `--list` and `--list-all`.

use super::Executor;
use crate::args::Vars;
use crate::engine::EngineError;
use crate::mode::ListQuery;
use colored::Color;
use serde::Serialize;
use std::io::{self, Write};

/// One entry of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct ListedTask {
    pub name: String,
    pub desc: String,
    pub summary: String,
    pub up_to_date: bool,
}

/// JSON document printed by `--list --json`.
#[derive(Debug, Serialize)]
pub(super) struct TaskList {
    pub tasks: Vec<ListedTask>,
    pub location: String,
}

impl Executor {
    pub(super) fn list(&self, query: &ListQuery) -> Result<bool, EngineError> {
        let loaded = self.loaded()?;
        let no_vars = Vars::new();

        let mut tasks = Vec::new();
        for name in loaded.taskfile.task_names(query.include_all) {
            let task = self.task(name)?;
            let up_to_date = query.as_json && self.is_up_to_date(name, task, &no_vars)?;
            tasks.push(ListedTask {
                name: name.to_string(),
                desc: task.desc.clone(),
                summary: task.summary.clone(),
                up_to_date,
            });
        }
        let found = !tasks.is_empty();

        if query.as_json {
            let list = TaskList {
                tasks,
                location: self
                    .taskfile_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            };
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &list)?;
            writeln!(stdout)?;
            return Ok(found);
        }

        if !found {
            let notice = if query.include_all {
                "task: No tasks available"
            } else {
                "task: No tasks with description available. Try --list-all to list all tasks"
            };
            self.logger.outf(Color::Yellow, notice);
            return Ok(false);
        }

        self.logger
            .outf(Color::White, "task: Available tasks for this project:");
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", render_list(&tasks))?;
        Ok(true)
    }
}

/// Aligned `* name: desc` lines.
pub(super) fn render_list(tasks: &[ListedTask]) -> String {
    let width = tasks.iter().map(|t| t.name.len() + 1).max().unwrap_or(0);

    let mut out = String::new();
    for task in tasks {
        let label = format!("{}:", task.name);
        let line = format!("* {:<width$} {}", label, task.desc.replace('\n', " "));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
