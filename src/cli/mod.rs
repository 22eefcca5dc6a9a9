//! CLI argument parsing for `task`.
//!
//! Uses clap derive macros for declarative argument definitions. The parsed
//! [`Cli`] is turned into an [`Invocation`] right away; nothing downstream
//! sees clap types.

mod duration;

use crate::flags::{Invocation, InvocationFlags, OutputKind, OutputStyle};
use clap::{ArgAction, Parser};
use std::time::Duration;

pub use duration::parse_duration;

/// Task is a task runner / build tool that aims to be simpler and easier to
/// use than, for example, GNU Make.
///
/// Runs the specified task(s). Falls back to the "default" task if no task
/// name was specified. Arguments after `--` are available to commands as
/// `{{.CLI_ARGS}}`.
#[derive(Parser, Debug)]
#[command(name = "task")]
#[command(author, about, long_about = None)]
pub struct Cli {
    /// Show Task version.
    #[arg(long = "version")]
    pub show_version: bool,

    /// Create a new Taskfile.yml in the current folder.
    #[arg(short, long)]
    pub init: bool,

    /// List tasks with description of current Taskfile.
    #[arg(short, long)]
    pub list: bool,

    /// List tasks with or without a description.
    #[arg(short = 'a', long)]
    pub list_all: bool,

    /// Format task list as JSON.
    #[arg(short, long)]
    pub json: bool,

    /// Exit with non-zero exit code if any of the given tasks is not up-to-date.
    #[arg(long)]
    pub status: bool,

    /// Force execution even when the task is up-to-date.
    #[arg(short, long)]
    pub force: bool,

    /// Enable watch of the given task.
    #[arg(short, long)]
    pub watch: bool,

    /// Enable verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable echoing.
    #[arg(short, long)]
    pub silent: bool,

    /// Execute tasks provided on command line in parallel.
    #[arg(short, long)]
    pub parallel: bool,

    /// Compile and print tasks in the order that they would be run, without executing them.
    #[arg(short = 'n', long)]
    pub dry: bool,

    /// Show summary about a task.
    #[arg(long)]
    pub summary: bool,

    /// Pass-through the exit code of the task command.
    #[arg(short = 'x', long)]
    pub exit_code: bool,

    /// Set directory of execution.
    #[arg(short, long, default_value = "")]
    pub dir: String,

    /// Choose which Taskfile to run. Defaults to "Taskfile.yml".
    #[arg(short = 't', long = "taskfile", default_value = "")]
    pub entrypoint: String,

    /// Set output style.
    #[arg(short, long, value_enum)]
    pub output: Option<OutputKind>,

    /// Message template to print before a task's grouped output.
    #[arg(long, default_value = "")]
    pub output_group_begin: String,

    /// Message template to print after a task's grouped output.
    #[arg(long, default_value = "")]
    pub output_group_end: String,

    /// Colored output. Set to false or use NO_COLOR=1 to disable.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub color: bool,

    /// Limit number of tasks to run concurrently.
    #[arg(short = 'C', long, default_value_t = 0)]
    pub concurrency: usize,

    /// Interval to watch for changes (e.g. 500ms, 5s, 1m).
    #[arg(short = 'I', long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Task names and NAME=VALUE variables.
    pub tasks: Vec<String>,

    /// Arguments passed to commands as CLI_ARGS.
    #[arg(last = true)]
    pub cli_args: Vec<String>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Freeze the parsed arguments into an [`Invocation`].
    pub fn into_invocation(self) -> Invocation {
        let flags = InvocationFlags {
            show_version: self.show_version,
            init: self.init,
            list: self.list,
            list_all: self.list_all,
            list_json: self.json,
            status: self.status,
            force: self.force,
            watch: self.watch,
            verbose: self.verbose,
            silent: self.silent,
            dry: self.dry,
            summary: self.summary,
            exit_code: self.exit_code,
            parallel: self.parallel,
            concurrency: self.concurrency,
            dir: self.dir,
            entrypoint: self.entrypoint,
            output: OutputStyle {
                name: self.output,
                group_begin: self.output_group_begin,
                group_end: self.output_group_end,
            },
            color: self.color,
            interval: self.interval,
        };

        let dash = (!self.cli_args.is_empty()).then_some(self.tasks.len());
        let mut args = self.tasks;
        args.extend(self.cli_args);

        Invocation { flags, args, dash }
    }
}
