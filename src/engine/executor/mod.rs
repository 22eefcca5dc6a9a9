//! The bundled task engine.
//!
//! Runs task commands with `sh -c` from the Taskfile's directory. Supports
//! dependencies, `status` up-to-date checks, `--dry`, `--summary`,
//! `--parallel`, the three output styles and polling `--watch`.

mod init;
mod list;
mod run;
mod signals;
mod template;
mod watch;

use crate::args::{Call, Vars};
use crate::engine::taskfile::{Task, Taskfile, find_taskfile, resolve_location, scalar_to_string};
use crate::engine::{Engine, EngineConfig, EngineError, Logger};
use crate::flags::OutputKind;
use crate::mode::ListQuery;
use colored::Color;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use signals::Interrupts;
pub use template::{Scope, render};

/// A Taskfile that passed setup.
#[derive(Debug)]
struct Loaded {
    path: PathBuf,
    root: PathBuf,
    taskfile: Taskfile,
    vars: Vars,
}

/// Engine running tasks from a local Taskfile.
#[derive(Debug)]
pub struct Executor {
    config: EngineConfig,
    logger: Logger,
    interrupts: Interrupts,
    globals: Vars,
    loaded: Option<Loaded>,
}

impl Executor {
    pub fn new(config: EngineConfig) -> Self {
        let logger = Logger::new(config.verbose, config.color);
        Self {
            config,
            logger,
            interrupts: Interrupts::default(),
            globals: Vars::new(),
            loaded: None,
        }
    }

    /// Directory tasks run in and the Taskfile path, without reading it.
    fn locate(&self) -> Result<(PathBuf, PathBuf), EngineError> {
        let (dir, file) = resolve_location(&self.config.dir, &self.config.entrypoint);
        let root = std::env::current_dir()?.join(dir);
        let path = find_taskfile(&root, file.as_deref())?;
        Ok((root, path))
    }

    fn loaded(&self) -> Result<&Loaded, EngineError> {
        self.loaded.as_ref().ok_or(EngineError::NotLoaded)
    }

    /// Look up a task callable from the command line.
    fn task(&self, name: &str) -> Result<&Task, EngineError> {
        self.loaded()?
            .taskfile
            .tasks
            .get(name)
            .ok_or_else(|| EngineError::TaskNotFound(name.to_string()))
    }

    fn check_calls(&self, calls: &[Call]) -> Result<(), EngineError> {
        for call in calls {
            let task = self.task(&call.task)?;
            if task.internal {
                return Err(EngineError::TaskNotFound(call.task.clone()));
            }
        }
        Ok(())
    }

    fn output_kind(&self) -> OutputKind {
        self.config
            .output
            .name
            .or_else(|| self.loaded.as_ref().and_then(|l| l.taskfile.output))
            .unwrap_or_default()
    }

    /// Variables visible to `task` when called with `call_vars`.
    fn task_vars(&self, name: &str, task: &Task, call_vars: &Vars) -> Result<Vars, EngineError> {
        let loaded = self.loaded()?;
        let own: Vars = task
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), scalar_to_string(v)))
            .collect();
        let builtin = Vars::from([("TASK".to_string(), name.to_string())]);

        let scope = Scope::new()
            .with(call_vars)
            .with(&own)
            .with(&self.globals)
            .with(&loaded.vars)
            .with(&builtin);
        Ok(scope.flatten())
    }

    /// Environment for commands of `task`, rendered with `vars`.
    fn task_env(&self, task: &Task, vars: &Vars) -> Result<Vars, EngineError> {
        let loaded = self.loaded()?;
        let scope = Scope::new().with(vars);
        Ok(loaded
            .taskfile
            .env
            .iter()
            .chain(task.env.iter())
            .map(|(k, v)| (k.clone(), render(&scalar_to_string(v), &scope)))
            .collect())
    }

    fn task_dir(&self, task: &Task, vars: &Vars) -> Result<PathBuf, EngineError> {
        let root = &self.loaded()?.root;
        if task.dir.is_empty() {
            return Ok(root.clone());
        }
        let dir = render(&task.dir, &Scope::new().with(vars));
        Ok(root.join(dir))
    }

    fn taskfile_path(&self) -> Option<&Path> {
        self.loaded.as_ref().map(|l| l.path.as_path())
    }
}

impl Engine for Executor {
    fn setup(&mut self) -> Result<(), EngineError> {
        let (root, path) = self.locate()?;
        let taskfile = Taskfile::load(&path)?;
        let version = taskfile.validate()?;
        tracing::debug!(path = %path.display(), version, "loaded Taskfile");

        let vars = taskfile.vars();
        self.loaded = Some(Loaded {
            path,
            root,
            taskfile,
            vars,
        });
        Ok(())
    }

    fn parsed_version(&self) -> Result<f64, EngineError> {
        self.loaded()?.taskfile.parsed_version()
    }

    fn list_task_names(&mut self, include_all: bool) -> Result<(), EngineError> {
        let (_, path) = self.locate()?;
        let taskfile = Taskfile::load(&path)?;

        let mut stdout = std::io::stdout().lock();
        for name in taskfile.task_names(include_all) {
            writeln!(stdout, "{}", name)?;
        }
        Ok(())
    }

    fn list_tasks(&mut self, query: &ListQuery) -> Result<bool, EngineError> {
        self.list(query)
    }

    fn status(&mut self, calls: &[Call]) -> Result<(), EngineError> {
        self.check_calls(calls)?;
        for call in calls {
            let task = self.task(&call.task)?;
            if !self.is_up_to_date(&call.task, task, &call.vars)? {
                return Err(EngineError::NotUpToDate(call.task.clone()));
            }
        }
        Ok(())
    }

    fn run(&mut self, calls: &[Call]) -> Result<(), EngineError> {
        self.check_calls(calls)?;

        if self.config.summary {
            return self.print_summaries(calls);
        }
        if self.config.watch {
            return self.watch(calls);
        }
        self.run_calls(calls)
    }

    fn init_taskfile(&mut self, out: &mut dyn Write, dir: &Path) -> Result<(), EngineError> {
        init::init_taskfile(out, dir)
    }

    fn merge_globals(&mut self, globals: Vars) {
        self.globals.extend(globals);
    }

    fn intercept_interrupt_signals(&mut self) {
        self.interrupts.install(self.logger);
    }

    fn report_error(&self, err: &EngineError) {
        self.logger.errf(Color::Red, &err.to_string());
    }
}

#[cfg(test)]
mod tests;
