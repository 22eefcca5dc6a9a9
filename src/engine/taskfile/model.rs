//! Taskfile data model.
//!
//! Tasks may be written in three shapes, all normalized into [`Task`]:
//!
//! ```yaml
//! tasks:
//!   short: echo one command
//!   list: [echo a, echo b]
//!   full:
//!     desc: Build everything
//!     cmds:
//!       - cargo build
//! ```

use crate::flags::OutputKind;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A parsed Taskfile.
///
/// Unknown keys are ignored so newer Taskfiles still load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Taskfile {
    pub version: Option<serde_yaml::Value>,
    pub output: Option<OutputKind>,
    pub vars: BTreeMap<String, serde_yaml::Value>,
    pub env: BTreeMap<String, serde_yaml::Value>,
    pub tasks: BTreeMap<String, Task>,
}

/// One task definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "TaskDef")]
pub struct Task {
    pub desc: String,
    pub summary: String,
    pub cmds: Vec<Cmd>,
    pub deps: Vec<String>,
    /// Commands that all exit 0 when the task is up to date.
    pub status: Vec<String>,
    /// Globs, relative to the task directory, that `--watch` observes.
    pub sources: Vec<String>,
    pub dir: String,
    pub vars: BTreeMap<String, serde_yaml::Value>,
    pub env: BTreeMap<String, serde_yaml::Value>,
    pub silent: bool,
    /// Hidden from listings and not callable from the command line.
    pub internal: bool,
}

/// A command of a task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Cmd {
    Plain(String),
    Detailed {
        cmd: String,
        #[serde(default)]
        silent: bool,
    },
}

impl Cmd {
    pub fn command(&self) -> &str {
        match self {
            Cmd::Plain(cmd) | Cmd::Detailed { cmd, .. } => cmd,
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Cmd::Detailed { silent: true, .. })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskDef {
    Command(String),
    Commands(Vec<Cmd>),
    Full(Box<FullTask>),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct FullTask {
    desc: String,
    summary: String,
    cmds: Vec<Cmd>,
    deps: Vec<Dep>,
    status: Vec<String>,
    sources: Vec<String>,
    dir: String,
    vars: BTreeMap<String, serde_yaml::Value>,
    env: BTreeMap<String, serde_yaml::Value>,
    silent: bool,
    internal: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Dep {
    Name(String),
    Call { task: String },
}

impl From<TaskDef> for Task {
    fn from(def: TaskDef) -> Self {
        match def {
            TaskDef::Command(cmd) => Task {
                cmds: vec![Cmd::Plain(cmd)],
                ..Task::default()
            },
            TaskDef::Commands(cmds) => Task {
                cmds,
                ..Task::default()
            },
            TaskDef::Full(full) => {
                let full = *full;
                Task {
                    desc: full.desc,
                    summary: full.summary,
                    cmds: full.cmds,
                    deps: full
                        .deps
                        .into_iter()
                        .map(|dep| match dep {
                            Dep::Name(task) | Dep::Call { task } => task,
                        })
                        .collect(),
                    status: full.status,
                    sources: full.sources,
                    dir: full.dir,
                    vars: full.vars,
                    env: full.env,
                    silent: full.silent,
                    internal: full.internal,
                }
            }
        }
    }
}

/// Render a scalar YAML value the way it reads in the file.
pub fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
