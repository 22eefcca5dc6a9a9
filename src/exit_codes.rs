//! Exit code constants for the `task` CLI.
//!
//! - 0: Success
//! - 1: Any tool-level failure (bad flags, missing Taskfile, no tasks found,
//!   task not up to date, failed task without `--exit-code`)
//!
//! With `--exit-code`, a failed task command's own exit status is used
//! instead of [`FAILURE`].

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Generic failure.
pub const FAILURE: i32 = 1;

/// Convert an exit status into the byte the OS reports.
///
/// Statuses outside `0..=255` are truncated the same way a POSIX shell
/// reports them.
pub fn to_status_byte(code: i32) -> u8 {
    (code & 0xff) as u8
}
