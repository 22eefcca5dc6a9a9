//! `--watch`: re-run tasks when their sources change.
//!
//! Sources are polled. Every interval the modification times of all files
//! matching the called tasks' `sources` globs are compared with the previous
//! snapshot. The loop ends on Ctrl-C.

use super::Executor;
use crate::args::Call;
use crate::engine::EngineError;
use colored::Color;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into while looking for sources.
const IGNORED_DIRS: [&str; 3] = [".git", ".task", "node_modules"];

const POLL_STEP: Duration = Duration::from_millis(100);

type Snapshot = BTreeMap<PathBuf, Option<SystemTime>>;

/// Glob set matching paths relative to `dir`.
#[derive(Debug)]
struct Watched {
    dir: PathBuf,
    globs: GlobSet,
}

impl Executor {
    pub(super) fn watch(&self, calls: &[Call]) -> Result<(), EngineError> {
        let watched = self.watched_sources(calls)?;
        self.interrupts.install(self.logger);

        let names: Vec<&str> = calls.iter().map(|c| c.task.as_str()).collect();
        self.logger.errf(
            Color::Green,
            &format!("task: Started watching for tasks: {}", names.join(", ")),
        );
        if watched.is_empty() {
            self.logger
                .errf(Color::Yellow, "task: No sources declared, nothing will trigger a re-run");
        }

        let interval = self.config.watch_interval();
        let mut snapshot = take_snapshot(&watched);
        loop {
            match self.run_calls(calls) {
                Err(EngineError::Interrupted) => return Ok(()),
                Err(e) => self.logger.errf(Color::Red, &e.to_string()),
                Ok(()) => {}
            }

            loop {
                if !self.sleep(interval) {
                    return Ok(());
                }
                let next = take_snapshot(&watched);
                if next != snapshot {
                    tracing::debug!("sources changed, re-running");
                    snapshot = next;
                    break;
                }
            }
        }
    }

    /// Sleep for `interval`. Returns false if interrupted meanwhile.
    fn sleep(&self, interval: Duration) -> bool {
        let deadline = Instant::now() + interval;
        while Instant::now() < deadline {
            if self.interrupts.received() {
                return false;
            }
            std::thread::sleep(POLL_STEP.min(deadline.saturating_duration_since(Instant::now())));
        }
        !self.interrupts.received()
    }

    /// Sources of the called tasks and, transitively, their dependencies.
    fn watched_sources(&self, calls: &[Call]) -> Result<Vec<Watched>, EngineError> {
        let mut seen = BTreeSet::new();
        let mut pending: Vec<String> = calls.iter().map(|c| c.task.clone()).collect();
        let mut watched = Vec::new();

        while let Some(name) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let task = self.task(&name)?;
            pending.extend(task.deps.iter().cloned());
            if task.sources.is_empty() {
                continue;
            }

            let vars = self.task_vars(&name, task, &Default::default())?;
            watched.push(Watched {
                dir: self.task_dir(task, &vars)?,
                globs: build_globset(&task.sources)?,
            });
        }
        Ok(watched)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, EngineError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| EngineError::InvalidSources {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| EngineError::InvalidSources {
        pattern: patterns.join(", "),
        source,
    })
}

fn take_snapshot(watched: &[Watched]) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for w in watched {
        collect(w, &mut snapshot);
    }
    snapshot
}

fn collect(watched: &Watched, snapshot: &mut Snapshot) {
    let walker = WalkDir::new(&watched.dir)
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable path while watching");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&watched.dir).unwrap_or(path);
        if watched.globs.is_match(relative) {
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            snapshot.insert(path.to_path_buf(), modified);
        }
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && IGNORED_DIRS
            .iter()
            .any(|name| entry.file_name() == OsStr::new(name))
}
