//! Running tasks and their commands.

use super::{Executor, Scope, render};
use crate::args::{Call, Vars};
use crate::engine::EngineError;
use crate::engine::taskfile::Task;
use crate::exit_codes;
use crate::flags::OutputKind;
use colored::Color;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, OnceLock};

/// How a dependency finished. A failure keeps the command's exit code, if any.
type DepOutcome = Result<(), Option<i32>>;

/// Completion of every dependency reached during one `run` call.
///
/// The first caller of a dependency runs it. Everyone else blocks on the
/// same slot until it has finished and then sees its outcome.
#[derive(Debug, Default)]
pub(super) struct RunState {
    deps: Mutex<BTreeMap<String, Arc<OnceLock<DepOutcome>>>>,
}

impl RunState {
    fn slot(&self, task: &str) -> Arc<OnceLock<DepOutcome>> {
        let mut deps = self.deps.lock().unwrap_or_else(|poison| poison.into_inner());
        Arc::clone(deps.entry(task.to_string()).or_default())
    }
}

/// A rendered command ready to run.
struct Prepared<'a> {
    task: &'a str,
    command: String,
    dir: &'a Path,
    env: &'a Vars,
    vars: &'a Vars,
}

impl Executor {
    /// Run every call once, in order or concurrently with `--parallel`.
    pub(super) fn run_calls(&self, calls: &[Call]) -> Result<(), EngineError> {
        let mut checked = BTreeSet::new();
        for call in calls {
            self.check_deps(&call.task, &mut Vec::new(), &mut checked)?;
        }
        let state = &RunState::default();

        if !self.config.parallel || calls.len() < 2 {
            for call in calls {
                self.run_task(call, state, &[])?;
            }
            return Ok(());
        }

        let batch = match self.config.concurrency {
            0 => calls.len(),
            limit => limit,
        };
        for chunk in calls.chunks(batch) {
            let results: Vec<Result<(), EngineError>> = std::thread::scope(|s| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|call| s.spawn(move || self.run_task(call, state, &[])))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect()
            });
            results.into_iter().collect::<Result<Vec<()>, _>>()?;
        }
        Ok(())
    }

    fn run_task(&self, call: &Call, state: &RunState, stack: &[&str]) -> Result<(), EngineError> {
        let name = call.task.as_str();
        if stack.contains(&name) {
            return Err(EngineError::CyclicDependency(name.to_string()));
        }
        let task = self.task(name)?;

        let mut path = stack.to_vec();
        path.push(name);
        for dep in &task.deps {
            if path.contains(&dep.as_str()) {
                return Err(EngineError::CyclicDependency(dep.clone()));
            }
            self.run_dep(dep, state, &path)?;
        }

        if !self.config.force && self.is_up_to_date(name, task, &call.vars)? {
            if !self.config.silent {
                self.logger
                    .errf(Color::Magenta, &format!("task: Task \"{}\" is up to date", name));
            }
            return Ok(());
        }
        self.logger
            .verbose_errf(Color::Magenta, &format!("task: \"{}\" started", name));

        let vars = self.task_vars(name, task, &call.vars)?;
        let env = self.task_env(task, &vars)?;
        let dir = self.task_dir(task, &vars)?;
        let scope = Scope::new().with(&vars);

        for cmd in &task.cmds {
            if self.interrupts.received() {
                return Err(EngineError::Interrupted);
            }

            let command = render(cmd.command(), &scope);
            let silent = self.config.silent || task.silent || cmd.is_silent();
            if !silent || self.config.dry {
                self.logger
                    .errf(Color::Green, &format!("task: [{}] {}", name, command));
            }
            if self.config.dry {
                continue;
            }

            self.exec(&Prepared {
                task: name,
                command,
                dir: &dir,
                env: &env,
                vars: &vars,
            })?;
        }

        self.logger
            .verbose_errf(Color::Magenta, &format!("task: \"{}\" finished", name));
        Ok(())
    }

    /// Run `dep` unless another caller already has, waiting for it to finish.
    fn run_dep(&self, dep: &str, state: &RunState, stack: &[&str]) -> Result<(), EngineError> {
        let slot = state.slot(dep);
        let mut failure = None;
        let outcome = *slot.get_or_init(|| {
            let result = self.run_task(&Call::new(dep), state, stack);
            let outcome = result.as_ref().map(|_| ()).map_err(EngineError::task_exit_code);
            failure = result.err();
            outcome
        });

        if let Some(err) = failure {
            return Err(err);
        }
        match outcome {
            Ok(()) => Ok(()),
            Err(Some(code)) => Err(EngineError::TaskRun {
                task: dep.to_string(),
                code,
            }),
            Err(None) => Err(EngineError::DependencyFailed(dep.to_string())),
        }
    }

    /// Walk the dependency graph below `name` before anything runs.
    ///
    /// Dependents wait on each other's completion, so a cycle that slipped
    /// through would block forever instead of failing.
    fn check_deps(
        &self,
        name: &str,
        stack: &mut Vec<String>,
        checked: &mut BTreeSet<String>,
    ) -> Result<(), EngineError> {
        if stack.iter().any(|t| t == name) {
            return Err(EngineError::CyclicDependency(name.to_string()));
        }
        if checked.contains(name) {
            return Ok(());
        }

        let task = self.task(name)?;
        stack.push(name.to_string());
        for dep in &task.deps {
            self.check_deps(dep, stack, checked)?;
        }
        stack.pop();
        checked.insert(name.to_string());
        Ok(())
    }

    fn exec(&self, prepared: &Prepared<'_>) -> Result<(), EngineError> {
        tracing::debug!(task = prepared.task, command = %prepared.command, "running command");

        let mut command = shell(&prepared.command, prepared.dir, prepared.env);
        let status = match self.output_kind() {
            OutputKind::Interleaved => command.status(),
            OutputKind::Group => self.exec_grouped(&mut command, prepared),
            OutputKind::Prefixed => exec_prefixed(&mut command, prepared.task),
        }
        .map_err(|source| EngineError::Spawn {
            command: prepared.command.clone(),
            source,
        })?;

        if status.success() {
            return Ok(());
        }
        if self.interrupts.received() {
            return Err(EngineError::Interrupted);
        }
        Err(EngineError::TaskRun {
            task: prepared.task.to_string(),
            code: status.code().unwrap_or(exit_codes::FAILURE),
        })
    }

    /// Buffer all output and print it between the group templates.
    fn exec_grouped(&self, command: &mut Command, prepared: &Prepared<'_>) -> io::Result<ExitStatus> {
        let output = command.output()?;
        let scope = Scope::new().with(prepared.vars);
        let style = &self.config.output;

        let mut stdout = io::stdout().lock();
        if !style.group_begin.is_empty() {
            writeln!(stdout, "{}", render(&style.group_begin, &scope))?;
        }
        stdout.write_all(&output.stdout)?;
        io::stderr().lock().write_all(&output.stderr)?;
        if !style.group_end.is_empty() {
            writeln!(stdout, "{}", render(&style.group_end, &scope))?;
        }
        stdout.flush()?;
        Ok(output.status)
    }

    /// Whether every `status` command of the task exits 0.
    ///
    /// A task without status commands is never up to date.
    pub(super) fn is_up_to_date(
        &self,
        name: &str,
        task: &Task,
        call_vars: &Vars,
    ) -> Result<bool, EngineError> {
        if task.status.is_empty() {
            return Ok(false);
        }

        let vars = self.task_vars(name, task, call_vars)?;
        let env = self.task_env(task, &vars)?;
        let dir = self.task_dir(task, &vars)?;
        let scope = Scope::new().with(&vars);

        for check in &task.status {
            let check = render(check, &scope);
            let status = shell(&check, &dir, &env)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map_err(|source| EngineError::Spawn {
                    command: check.clone(),
                    source,
                })?;
            if !status.success() {
                tracing::debug!(task = name, check = %check, "status command exited non-zero");
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(super) fn print_summaries(&self, calls: &[Call]) -> Result<(), EngineError> {
        let mut stdout = io::stdout().lock();
        for (i, call) in calls.iter().enumerate() {
            if i > 0 {
                writeln!(stdout)?;
            }
            let task = self.task(&call.task)?;
            write!(stdout, "{}", render_summary(&call.task, task))?;
        }
        Ok(())
    }
}

fn shell(command: &str, dir: &Path, env: &Vars) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).current_dir(dir).envs(env);
    cmd
}

fn exec_prefixed(command: &mut Command, task: &str) -> io::Result<ExitStatus> {
    let mut child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let prefix = format!("[{}] ", task);

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    std::thread::scope(|s| {
        if let Some(out) = stdout {
            s.spawn(|| prefix_lines(out, io::stdout(), &prefix));
        }
        if let Some(err) = stderr {
            s.spawn(|| prefix_lines(err, io::stderr(), &prefix));
        }
    });

    child.wait()
}

/// Copy `reader` to `writer`, prefixing every line.
fn prefix_lines<R: Read, W: Write>(reader: R, mut writer: W, prefix: &str) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return writer.flush();
        }
        writer.write_all(prefix.as_bytes())?;
        writer.write_all(&line)?;
        if !line.ends_with(b"\n") {
            writer.write_all(b"\n")?;
        }
    }
}

/// The `--summary` text of a task.
pub(super) fn render_summary(name: &str, task: &Task) -> String {
    let mut out = format!("task: {}\n\n", name);

    let text = if !task.summary.is_empty() {
        task.summary.trim_end()
    } else if !task.desc.is_empty() {
        task.desc.trim_end()
    } else {
        "(task does not have description or summary)"
    };
    out.push_str(text);
    out.push('\n');

    if !task.deps.is_empty() {
        out.push_str("\ndependencies:\n");
        for dep in &task.deps {
            out.push_str(&format!(" - {}\n", dep));
        }
    }

    if !task.cmds.is_empty() {
        out.push_str("\ncommands:\n");
        for cmd in &task.cmds {
            out.push_str(&format!(" - {}\n", cmd.command()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::taskfile::Cmd;

    #[test]
    fn prefixes_every_line() {
        let mut out = Vec::new();
        prefix_lines(&b"one\ntwo"[..], &mut out, "[build] ").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[build] one\n[build] two\n");
    }

    #[test]
    fn summary_prefers_summary_over_desc() {
        let task = Task {
            desc: "short".to_string(),
            summary: "long text\n".to_string(),
            cmds: vec![Cmd::Plain("cargo build".to_string())],
            deps: vec!["fmt".to_string()],
            ..Task::default()
        };
        assert_eq!(
            render_summary("build", &task),
            "task: build\n\nlong text\n\ndependencies:\n - fmt\n\ncommands:\n - cargo build\n"
        );
    }

    #[test]
    fn summary_without_text() {
        let text = render_summary("x", &Task::default());
        assert!(text.contains("(task does not have description or summary)"));
        assert!(!text.contains("commands:"));
    }

    #[test]
    fn dependencies_share_one_completion_slot() {
        let state = RunState::default();
        let first = state.slot("fmt");
        assert!(Arc::ptr_eq(&first, &state.slot("fmt")));
        assert!(!Arc::ptr_eq(&first, &state.slot("lint")));

        first.set(Err(Some(2))).unwrap();
        assert_eq!(state.slot("fmt").get(), Some(&Err(Some(2))));
    }
}
