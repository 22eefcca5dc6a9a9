//! Choosing what a `task` invocation does.
//!
//! [`select_mode`] validates flag combinations and then walks a fixed
//! precedence table. The first entry whose flags are set wins, no matter
//! which later flags are also present.

use crate::error::{Result, TaskError};
use crate::flags::InvocationFlags;

/// The operating mode of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ShowVersion,
    InitTaskfile,
    ListTasks(ListQuery),
    ShowStatus,
    /// Run the requested tasks, re-running on changes when `watch` is set.
    RunTasks { watch: bool },
}

/// A validated request to list tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// Include tasks without a description (`--list-all`).
    pub include_all: bool,
    /// Render as JSON instead of text.
    pub as_json: bool,
}

impl ListQuery {
    /// Build a query from `--list`, `--list-all` and `--json`.
    pub fn new(list: bool, list_all: bool, json: bool) -> Result<Self> {
        if list && list_all {
            return Err(TaskError::Config(
                "cannot use --list and --list-all at the same time".to_string(),
            ));
        }
        if json && !list && !list_all {
            return Err(TaskError::Config(
                "--json only applies to --list or --list-all".to_string(),
            ));
        }
        Ok(Self {
            include_all: list_all,
            as_json: json,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Branch {
    Version,
    Init,
    List,
    Status,
}

type Guard = fn(&InvocationFlags) -> bool;

/// Mode precedence, highest first. Anything unmatched runs tasks.
const PRECEDENCE: [(Branch, Guard); 4] = [
    (Branch::Version, |f| f.show_version),
    (Branch::Init, |f| f.init),
    (Branch::List, |f| f.list || f.list_all || f.list_json),
    (Branch::Status, |f| f.status),
];

/// Validate `flags` and decide which mode applies.
pub fn select_mode(flags: &InvocationFlags) -> Result<Mode> {
    validate(flags)?;

    let branch = PRECEDENCE
        .iter()
        .find(|(_, applies)| applies(flags))
        .map(|(branch, _)| *branch);

    let mode = match branch {
        Some(Branch::Version) => Mode::ShowVersion,
        Some(Branch::Init) => Mode::InitTaskfile,
        Some(Branch::List) => {
            Mode::ListTasks(ListQuery::new(flags.list, flags.list_all, flags.list_json)?)
        }
        Some(Branch::Status) => Mode::ShowStatus,
        None => Mode::RunTasks { watch: flags.watch },
    };
    Ok(mode)
}

/// Reject flag combinations that can never be meaningful.
fn validate(flags: &InvocationFlags) -> Result<()> {
    if !flags.dir.is_empty() && !flags.entrypoint.is_empty() {
        return Err(TaskError::Config(
            "you can't set both --dir and --taskfile".to_string(),
        ));
    }

    // An unset style is not "group" either.
    if !flags.output.is_group() {
        if !flags.output.group_begin.is_empty() {
            return Err(TaskError::Config(
                "you can't set --output-group-begin without --output=group".to_string(),
            ));
        }
        if !flags.output.group_end.is_empty() {
            return Err(TaskError::Config(
                "you can't set --output-group-end without --output=group".to_string(),
            ));
        }
    }

    Ok(())
}
