//! Taskfile model.
//!
//! Covers the subset of the Taskfile format the bundled engine understands:
//! version, output style, static variables, environment and tasks with
//! commands, dependencies, status checks and watched sources. Unknown keys
//! are ignored so newer Taskfiles still load.

mod model;
mod operations;


pub use model::{Cmd, Task, Taskfile, scalar_to_string};
pub use operations::{DEFAULT_TASKFILES, find_taskfile, resolve_location};
