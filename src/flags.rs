//! The immutable record of everything the user asked for on the command line.
//!
//! [`InvocationFlags`] is built once from the parsed [`crate::cli::Cli`] and
//! then only read. Mode selection and dispatch take it by reference, so tests
//! can construct one literally.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// How the output of concurrently running commands is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Output is written as it arrives.
    #[default]
    Interleaved,
    /// Output is buffered per task and printed in one block.
    Group,
    /// Every line is prefixed with the task name.
    Prefixed,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputKind::Interleaved => "interleaved",
            OutputKind::Group => "group",
            OutputKind::Prefixed => "prefixed",
        };
        f.write_str(name)
    }
}

/// Output style requested with `--output` and its group templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputStyle {
    /// Style name, `None` when `--output` was not given.
    pub name: Option<OutputKind>,
    /// Template printed before a task's grouped output.
    pub group_begin: String,
    /// Template printed after a task's grouped output.
    pub group_end: String,
}

impl OutputStyle {
    pub fn is_group(&self) -> bool {
        self.name == Some(OutputKind::Group)
    }
}

/// Every option of one `task` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationFlags {
    pub show_version: bool,
    pub init: bool,
    pub list: bool,
    pub list_all: bool,
    pub list_json: bool,
    pub status: bool,
    pub force: bool,
    pub watch: bool,
    pub verbose: bool,
    pub silent: bool,
    pub dry: bool,
    pub summary: bool,
    /// Pass the failing command's exit code through as our own.
    pub exit_code: bool,
    pub parallel: bool,
    /// Maximum number of tasks running at once, 0 means unlimited.
    pub concurrency: usize,
    /// Directory to run in. Mutually exclusive with `entrypoint`.
    pub dir: String,
    /// Taskfile to use. Mutually exclusive with `dir`.
    pub entrypoint: String,
    pub output: OutputStyle,
    pub color: bool,
    /// Watch polling interval, engine default when `None`.
    pub interval: Option<Duration>,
}

impl Default for InvocationFlags {
    fn default() -> Self {
        Self {
            show_version: false,
            init: false,
            list: false,
            list_all: false,
            list_json: false,
            status: false,
            force: false,
            watch: false,
            verbose: false,
            silent: false,
            dry: false,
            summary: false,
            exit_code: false,
            parallel: false,
            concurrency: 0,
            dir: String::new(),
            entrypoint: String::new(),
            output: OutputStyle::default(),
            color: true,
            interval: None,
        }
    }
}

/// Flags plus the positional arguments of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub flags: InvocationFlags,
    /// Positional arguments, including those after `--`.
    pub args: Vec<String>,
    /// Position of the `--` delimiter within `args`, if one was given.
    pub dash: Option<usize>,
}
