//! Creating a starter Taskfile for `task --init`.

use crate::engine::EngineError;
use crate::engine::taskfile::DEFAULT_TASKFILES;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_TASKFILE_NAME: &str = "Taskfile.yml";

pub const DEFAULT_TASKFILE: &str = r#"# https://taskfile.dev

version: '3'

vars:
  GREETING: Hello, World!

tasks:
  default:
    cmds:
      - echo "{{.GREETING}}"
    silent: true
"#;

/// Write the starter Taskfile into `dir` unless one already exists.
pub fn init_taskfile(out: &mut dyn Write, dir: &Path) -> Result<(), EngineError> {
    if let Some(existing) = DEFAULT_TASKFILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
    {
        return Err(EngineError::TaskfileExists(existing));
    }

    let path = dir.join(DEFAULT_TASKFILE_NAME);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => EngineError::TaskfileExists(path.clone()),
            _ => EngineError::Io(e),
        })?;
    file.write_all(DEFAULT_TASKFILE.as_bytes())?;
    file.sync_all()?;

    writeln!(out, "{} created in the current directory", DEFAULT_TASKFILE_NAME)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::taskfile::Taskfile;
    use tempfile::TempDir;

    #[test]
    fn creates_a_loadable_taskfile() {
        let temp = TempDir::new().unwrap();
        let mut out = Vec::new();

        init_taskfile(&mut out, temp.path()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Taskfile.yml created in the current directory\n"
        );
        let tf = Taskfile::load(temp.path().join("Taskfile.yml")).unwrap();
        assert_eq!(tf.validate().unwrap(), 3.0);
        assert!(tf.tasks.contains_key("default"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Taskfile.yaml"), "version: '3'\n").unwrap();
        let mut out = Vec::new();

        let err = init_taskfile(&mut out, temp.path()).unwrap_err();
        assert!(matches!(err, EngineError::TaskfileExists(_)));
        assert!(out.is_empty());
        assert!(!temp.path().join("Taskfile.yml").exists());
    }
}
