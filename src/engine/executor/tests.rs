//! Tests for the bundled engine, running real commands through `sh`.

use super::*;
use crate::args::CLI_ARGS;
use std::fs;
use tempfile::TempDir;

fn project(taskfile: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Taskfile.yml"), taskfile).unwrap();
    temp
}

fn executor(dir: &Path) -> Executor {
    executor_with(dir, |_| {})
}

fn executor_with(dir: &Path, tweak: impl FnOnce(&mut EngineConfig)) -> Executor {
    let mut config = EngineConfig {
        dir: dir.display().to_string(),
        silent: true,
        color: false,
        ..EngineConfig::default()
    };
    tweak(&mut config);
    let mut exec = Executor::new(config);
    exec.setup().unwrap();
    exec
}

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_default()
}

fn calls(names: &[&str]) -> Vec<Call> {
    names.iter().map(|n| Call::new(*n)).collect()
}

#[test]
fn setup_without_taskfile_fails() {
    let temp = TempDir::new().unwrap();
    let mut exec = Executor::new(EngineConfig {
        dir: temp.path().display().to_string(),
        ..EngineConfig::default()
    });
    assert!(matches!(exec.setup(), Err(EngineError::TaskfileNotFound(_))));
    assert!(matches!(exec.parsed_version(), Err(EngineError::NotLoaded)));
}

#[test]
fn setup_with_entrypoint() {
    let temp = project("version: '2'\ntasks: {}\n");
    fs::rename(temp.path().join("Taskfile.yml"), temp.path().join("Custom.yml")).unwrap();

    let mut exec = Executor::new(EngineConfig {
        entrypoint: temp.path().join("Custom.yml").display().to_string(),
        ..EngineConfig::default()
    });
    exec.setup().unwrap();
    assert_eq!(exec.parsed_version().unwrap(), 2.0);
}

#[test]
fn run_passes_cli_args_through_the_shell() {
    let temp = project(
        r#"
version: '3'
tasks:
  args:
    cmds:
      - printf '%s\n' {{.CLI_ARGS}} > out.txt
"#,
    );
    let mut exec = executor(temp.path());
    exec.merge_globals(Vars::from([(CLI_ARGS.to_string(), "'a b' c".to_string())]));

    exec.run(&calls(&["args"])).unwrap();
    assert_eq!(read(temp.path(), "out.txt"), "a b\nc\n");
}

#[test]
fn failing_command_reports_its_exit_code() {
    let temp = project("version: '3'\ntasks:\n  fail: exit 3\n");
    let mut exec = executor(temp.path());

    let err = exec.run(&calls(&["fail"])).unwrap_err();
    assert!(matches!(err, EngineError::TaskRun { ref task, code: 3 } if task == "fail"));
    assert_eq!(err.task_exit_code(), Some(3));
}

#[test]
fn commands_stop_at_first_failure() {
    let temp = project(
        r#"
version: '3'
tasks:
  steps:
    cmds:
      - echo one >> log.txt
      - "false"
      - echo three >> log.txt
"#,
    );
    let mut exec = executor(temp.path());
    assert!(exec.run(&calls(&["steps"])).is_err());
    assert_eq!(read(temp.path(), "log.txt"), "one\n");
}

#[test]
fn shared_dependencies_run_once() {
    let temp = project(
        r#"
version: '3'
tasks:
  a: echo a >> log.txt
  b:
    deps: [a]
    cmds: [echo b >> log.txt]
  all:
    deps: [a, b]
    cmds: [echo all >> log.txt]
"#,
    );
    let mut exec = executor(temp.path());
    exec.run(&calls(&["all"])).unwrap();
    assert_eq!(read(temp.path(), "log.txt"), "a\nb\nall\n");
}

#[test]
fn cyclic_dependencies_are_detected() {
    let temp = project(
        r#"
version: '3'
tasks:
  a: {deps: [b], cmds: [echo a]}
  b: {deps: [a], cmds: [echo b]}
"#,
    );
    let mut exec = executor(temp.path());
    assert!(matches!(
        exec.run(&calls(&["a"])),
        Err(EngineError::CyclicDependency(_))
    ));
}

#[test]
fn unknown_and_internal_tasks_cannot_be_called() {
    let temp = project(
        r#"
version: '3'
tasks:
  hidden: {internal: true, cmds: [echo h]}
"#,
    );
    let mut exec = executor(temp.path());
    assert!(matches!(
        exec.run(&calls(&["missing"])),
        Err(EngineError::TaskNotFound(_))
    ));
    assert!(matches!(
        exec.run(&calls(&["hidden"])),
        Err(EngineError::TaskNotFound(_))
    ));
}

#[test]
fn status_reports_tasks_that_are_not_up_to_date() {
    let temp = project(
        r#"
version: '3'
tasks:
  gen:
    cmds: [touch done.txt]
    status: [test -f done.txt]
  plain: echo plain
"#,
    );
    let mut exec = executor(temp.path());

    assert!(matches!(
        exec.status(&calls(&["gen"])),
        Err(EngineError::NotUpToDate(ref t)) if t == "gen"
    ));
    assert!(exec.status(&calls(&["plain"])).is_err());

    fs::write(temp.path().join("done.txt"), "").unwrap();
    exec.status(&calls(&["gen"])).unwrap();
}

#[test]
fn up_to_date_tasks_are_skipped_unless_forced() {
    let yaml = r#"
version: '3'
tasks:
  gen:
    cmds: [echo ran >> log.txt]
    status: ["true"]
"#;
    let temp = project(yaml);
    executor(temp.path()).run(&calls(&["gen"])).unwrap();
    assert_eq!(read(temp.path(), "log.txt"), "");

    executor_with(temp.path(), |c| c.force = true)
        .run(&calls(&["gen"]))
        .unwrap();
    assert_eq!(read(temp.path(), "log.txt"), "ran\n");
}

#[test]
fn dry_run_executes_nothing() {
    let temp = project("version: '3'\ntasks:\n  touch: touch made.txt\n");
    executor_with(temp.path(), |c| c.dry = true)
        .run(&calls(&["touch"]))
        .unwrap();
    assert!(!temp.path().join("made.txt").exists());
}

#[test]
fn summary_executes_nothing() {
    let temp = project("version: '3'\ntasks:\n  touch: touch made.txt\n");
    executor_with(temp.path(), |c| c.summary = true)
        .run(&calls(&["touch"]))
        .unwrap();
    assert!(!temp.path().join("made.txt").exists());
}

#[test]
fn variable_precedence() {
    let temp = project(
        r#"
version: '3'
vars:
  WHO: file
  WHAT: file
  WHERE: file
tasks:
  show:
    vars:
      WHERE: task
    cmds:
      - echo "{{.WHO}} {{.WHAT}} {{.WHERE}} {{.TASK}}" > out.txt
"#,
    );
    let mut exec = executor(temp.path());
    exec.merge_globals(Vars::from([
        ("WHO".to_string(), "cli".to_string()),
        ("WHERE".to_string(), "cli".to_string()),
    ]));

    let mut call = Call::new("show");
    call.vars.insert("WHAT".to_string(), "call".to_string());
    exec.run(&[call]).unwrap();

    assert_eq!(read(temp.path(), "out.txt"), "cli call task show\n");
}

#[test]
fn env_and_dir_apply_to_commands() {
    let temp = project(
        r#"
version: '3'
env:
  GREETING: hello
tasks:
  nested:
    dir: sub
    env:
      NAME: "{{.TASK}}"
    cmds:
      - echo "$GREETING $NAME" > out.txt
"#,
    );
    fs::create_dir(temp.path().join("sub")).unwrap();
    executor(temp.path()).run(&calls(&["nested"])).unwrap();
    assert_eq!(read(&temp.path().join("sub"), "out.txt"), "hello nested\n");
}

#[test]
fn parallel_calls_all_run() {
    let temp = project(
        r#"
version: '3'
tasks:
  one: touch one.txt
  two: touch two.txt
  three: touch three.txt
"#,
    );
    executor_with(temp.path(), |c| {
        c.parallel = true;
        c.concurrency = 2;
    })
    .run(&calls(&["one", "two", "three"]))
    .unwrap();

    for file in ["one.txt", "two.txt", "three.txt"] {
        assert!(temp.path().join(file).exists(), "{} missing", file);
    }
}

#[test]
fn parallel_failure_is_reported() {
    let temp = project("version: '3'\ntasks:\n  ok: 'true'\n  bad: exit 4\n");
    let err = executor_with(temp.path(), |c| c.parallel = true)
        .run(&calls(&["ok", "bad"]))
        .unwrap_err();
    assert_eq!(err.task_exit_code(), Some(4));
}

#[test]
fn listing_filters_by_description() {
    let temp = project("version: '3'\ntasks:\n  plain: echo plain\n");
    let mut exec = executor(temp.path());

    let described = ListQuery {
        include_all: false,
        as_json: false,
    };
    assert!(!exec.list_tasks(&described).unwrap());

    let all = ListQuery {
        include_all: true,
        as_json: false,
    };
    assert!(exec.list_tasks(&all).unwrap());
}

#[test]
fn list_task_names_does_not_need_setup() {
    let temp = project("tasks:\n  plain: echo plain\n");
    let mut exec = Executor::new(EngineConfig {
        dir: temp.path().display().to_string(),
        ..EngineConfig::default()
    });
    // No version, so a full setup would fail.
    assert!(exec.setup().is_err());
    exec.list_task_names(true).unwrap();
}

#[test]
fn output_styles_still_run_commands() {
    for kind in [OutputKind::Group, OutputKind::Prefixed] {
        let temp = project("version: '3'\ntasks:\n  out: echo hi && touch made.txt\n");
        executor_with(temp.path(), |c| {
            c.output.name = Some(kind);
            c.output.group_begin = "begin {{.TASK}}".to_string();
        })
        .run(&calls(&["out"]))
        .unwrap();
        assert!(temp.path().join("made.txt").exists(), "{} style", kind);
    }
}

#[test]
fn interrupted_executor_starts_no_commands() {
    let temp = project("version: '3'\ntasks:\n  touch: touch made.txt\n");
    let mut exec = executor(temp.path());
    exec.interrupts.record();

    assert!(matches!(
        exec.run(&calls(&["touch"])),
        Err(EngineError::Interrupted)
    ));
    assert!(!temp.path().join("made.txt").exists());
}

#[test]
#[serial_test::serial]
fn setup_searches_the_working_directory() {
    let temp = project("version: '3'\ntasks:\n  hi: echo hi\n");
    fs::rename(temp.path().join("Taskfile.yml"), temp.path().join("Taskfile.dist.yaml")).unwrap();
    let _guard = crate::test_support::DirGuard::new(temp.path());

    let mut exec = Executor::new(EngineConfig::default());
    exec.setup().unwrap();
    assert_eq!(
        exec.taskfile_path().and_then(|p| p.file_name()),
        Some(std::ffi::OsStr::new("Taskfile.dist.yaml"))
    );
}

#[test]
fn parallel_dependents_wait_for_a_shared_dependency() {
    let temp = project(
        r#"
version: '3'
tasks:
  gen:
    cmds:
      - echo gen >> log.txt
      - sleep 1 && touch gen.txt
  a:
    deps: [gen]
    cmds: [test -f gen.txt]
  b:
    deps: [gen]
    cmds: [test -f gen.txt]
"#,
    );
    executor_with(temp.path(), |c| c.parallel = true)
        .run(&calls(&["a", "b"]))
        .unwrap();
    assert_eq!(read(temp.path(), "log.txt"), "gen\n");
}

#[test]
fn parallel_dependents_see_a_failed_dependency() {
    let temp = project(
        r#"
version: '3'
tasks:
  bad: sleep 1 && exit 5
  a:
    deps: [bad]
    cmds: [touch a.txt]
  b:
    deps: [bad]
    cmds: [touch b.txt]
"#,
    );
    let err = executor_with(temp.path(), |c| c.parallel = true)
        .run(&calls(&["a", "b"]))
        .unwrap_err();

    assert!(matches!(err, EngineError::TaskRun { ref task, code: 5 } if task == "bad"));
    assert!(!temp.path().join("a.txt").exists());
    assert!(!temp.path().join("b.txt").exists());
}

#[test]
fn cycle_behind_a_finished_dependency_is_detected() {
    let temp = project(
        r#"
version: '3'
tasks:
  x:
    deps: [y, z]
    cmds: [echo x >> log.txt]
  y:
    deps: [z]
    cmds: [echo y >> log.txt]
  z:
    deps: [y]
    cmds: [echo z >> log.txt]
"#,
    );
    let mut exec = executor(temp.path());

    assert!(matches!(
        exec.run(&calls(&["x"])),
        Err(EngineError::CyclicDependency(_))
    ));
    assert_eq!(read(temp.path(), "log.txt"), "");
}

#[test]
fn missing_dependency_fails_before_anything_runs() {
    let temp = project(
        r#"
version: '3'
tasks:
  first: echo first >> log.txt
  second:
    deps: [nope]
    cmds: [echo second >> log.txt]
"#,
    );
    let mut exec = executor(temp.path());

    assert!(matches!(
        exec.run(&calls(&["first", "second"])),
        Err(EngineError::TaskNotFound(ref t)) if t == "nope"
    ));
    assert_eq!(read(temp.path(), "log.txt"), "");
}
