//! Engine configuration derived from the command line.

use crate::flags::{InvocationFlags, OutputStyle};
use std::time::Duration;

/// Polling interval used by `--watch` when `--interval` is not given.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Settings an engine is created with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub force: bool,
    pub watch: bool,
    pub verbose: bool,
    pub silent: bool,
    pub dir: String,
    pub dry: bool,
    pub entrypoint: String,
    pub summary: bool,
    pub parallel: bool,
    pub color: bool,
    pub concurrency: usize,
    pub interval: Option<Duration>,
    pub output: OutputStyle,
}

impl From<&InvocationFlags> for EngineConfig {
    fn from(flags: &InvocationFlags) -> Self {
        Self {
            force: flags.force,
            watch: flags.watch,
            verbose: flags.verbose,
            silent: flags.silent,
            dir: flags.dir.clone(),
            dry: flags.dry,
            entrypoint: flags.entrypoint.clone(),
            summary: flags.summary,
            parallel: flags.parallel,
            color: flags.color,
            concurrency: flags.concurrency,
            interval: flags.interval,
            output: flags.output.clone(),
        }
    }
}

impl EngineConfig {
    pub fn watch_interval(&self) -> Duration {
        self.interval.unwrap_or(DEFAULT_WATCH_INTERVAL)
    }
}
