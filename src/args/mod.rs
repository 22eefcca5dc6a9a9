//! Positional argument handling.
//!
//! Positional arguments are task names and `NAME=VALUE` assignments, then
//! optionally `--` followed by arguments forwarded to the task commands as
//! the `CLI_ARGS` variable.

mod parse;
mod split;

use std::collections::BTreeMap;

pub use parse::{parse_v2, parse_v3};
pub use split::split_args;

/// Variable name under which pass-through arguments reach the templates.
pub const CLI_ARGS: &str = "CLI_ARGS";

/// Static variables by name.
pub type Vars = BTreeMap<String, String>;

/// A request to run one task with call-specific variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Call {
    pub task: String,
    pub vars: Vars,
}

impl Call {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            vars: Vars::new(),
        }
    }
}

/// Everything handed to the engine to run or check tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub calls: Vec<Call>,
    /// Global variables, always including [`CLI_ARGS`].
    pub globals: Vars,
    pub cli_args: String,
}

impl ExecutionRequest {
    /// Build a request from positional arguments.
    ///
    /// `taskfile_version` picks the assignment grammar: 3.0 and later use
    /// [`parse_v3`], anything older uses [`parse_v2`].
    pub fn build(
        args: &[String],
        dash: Option<usize>,
        taskfile_version: f64,
    ) -> Result<Self, shlex::QuoteError> {
        let (tasks_and_vars, cli_args) = split_args(args, dash)?;

        let (calls, mut globals) = if taskfile_version >= 3.0 {
            parse_v3(&tasks_and_vars)
        } else {
            parse_v2(&tasks_and_vars)
        };
        globals.insert(CLI_ARGS.to_string(), cli_args.clone());

        Ok(Self {
            calls,
            globals,
            cli_args,
        })
    }
}
