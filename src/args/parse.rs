//! Task-call grammars for positional arguments.
//!
//! Taskfiles declaring version 3 or later treat every `NAME=VALUE` argument
//! as a global variable. Older Taskfiles attach an assignment to the task
//! named right before it and only treat leading assignments as globals.

use super::{Call, Vars};

/// Task name used when no task was named on the command line.
pub const DEFAULT_TASK: &str = "default";

/// Parse arguments using the version 3 grammar.
pub fn parse_v3(args: &[String]) -> (Vec<Call>, Vars) {
    let mut calls = Vec::new();
    let mut globals = Vars::new();

    for arg in args {
        match split_var(arg) {
            Some((name, value)) => {
                globals.insert(name.to_string(), value.to_string());
            }
            None => calls.push(Call::new(arg)),
        }
    }

    if calls.is_empty() {
        calls.push(Call::new(DEFAULT_TASK));
    }

    (calls, globals)
}

/// Parse arguments using the legacy grammar of version 2 Taskfiles.
pub fn parse_v2(args: &[String]) -> (Vec<Call>, Vars) {
    let mut calls: Vec<Call> = Vec::new();
    let mut globals = Vars::new();

    for arg in args {
        let Some((name, value)) = split_var(arg) else {
            calls.push(Call::new(arg));
            continue;
        };

        let vars = match calls.last_mut() {
            Some(call) => &mut call.vars,
            None => &mut globals,
        };
        vars.insert(name.to_string(), value.to_string());
    }

    if calls.is_empty() {
        calls.push(Call::new(DEFAULT_TASK));
    }

    (calls, globals)
}

fn split_var(arg: &str) -> Option<(&str, &str)> {
    arg.split_once('=')
}
