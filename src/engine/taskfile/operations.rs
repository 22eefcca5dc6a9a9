//! Locating, loading and validating Taskfiles.

use super::model::{Taskfile, scalar_to_string};
use crate::engine::EngineError;
use std::path::{Path, PathBuf};

/// File names tried, in order, when no Taskfile was named explicitly.
pub const DEFAULT_TASKFILES: [&str; 4] = [
    "Taskfile.yml",
    "Taskfile.yaml",
    "Taskfile.dist.yml",
    "Taskfile.dist.yaml",
];

/// Directory to run in and Taskfile name chosen with `--dir`/`--taskfile`.
///
/// A `--taskfile` path is split into its directory and file name, so tasks
/// run next to the file they are declared in.
pub fn resolve_location(dir: &str, entrypoint: &str) -> (PathBuf, Option<String>) {
    if entrypoint.is_empty() {
        return (PathBuf::from(dir), None);
    }

    let path = Path::new(entrypoint);
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    (parent, file)
}

/// Find the Taskfile to use in `dir`.
pub fn find_taskfile(dir: &Path, file: Option<&str>) -> Result<PathBuf, EngineError> {
    if let Some(file) = file {
        let path = dir.join(file);
        return if path.is_file() {
            Ok(path)
        } else {
            Err(EngineError::TaskfileNotFound(path))
        };
    }

    DEFAULT_TASKFILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| EngineError::TaskfileNotFound(dir.to_path_buf()))
}

impl Taskfile {
    /// Load a Taskfile from disk.
    ///
    /// This only parses the file; [`Taskfile::validate`] checks its version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|source| EngineError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content).map_err(|source| EngineError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a Taskfile from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Major and minor of the declared `version`, as a number.
    ///
    /// `3`, `"3"`, `"3.0"` and `"3.0.1"` all yield `3.0`.
    pub fn parsed_version(&self) -> Result<f64, EngineError> {
        let raw = match &self.version {
            None | Some(serde_yaml::Value::Null) => return Err(EngineError::MissingVersion),
            Some(value) => scalar_to_string(value),
        };

        let mut parts = raw.trim().trim_start_matches('v').split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().unwrap_or("0");

        let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !is_number(major) || !is_number(minor) {
            return Err(EngineError::InvalidVersion(raw));
        }

        format!("{}.{}", major, minor)
            .parse::<f64>()
            .map_err(|_| EngineError::InvalidVersion(raw))
    }

    /// Check the Taskfile can be run by this engine.
    pub fn validate(&self) -> Result<f64, EngineError> {
        let version = self.parsed_version()?;
        if version < 2.0 {
            return Err(EngineError::UnsupportedVersion(version.to_string()));
        }
        Ok(version)
    }

    /// Static taskfile-level variables as strings.
    pub fn vars(&self) -> crate::args::Vars {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), scalar_to_string(v)))
            .collect()
    }

    /// Task names, sorted, without internal tasks.
    ///
    /// With `include_all` unset only tasks with a description are returned.
    pub fn task_names(&self, include_all: bool) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|(_, task)| !task.internal)
            .filter(|(_, task)| include_all || !task.desc.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
