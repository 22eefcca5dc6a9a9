//! Splitting positional arguments at the `--` delimiter.

use shlex::QuoteError;

/// Split `args` at `dash` into tool arguments and a shell-quoted string.
///
/// Everything before the delimiter is returned untouched. Everything after
/// it is quoted one argument at a time and joined with single spaces, so a
/// POSIX shell evaluating the string sees exactly the original arguments.
/// An argument containing a NUL byte cannot be represented and fails the
/// whole split.
pub fn split_args(args: &[String], dash: Option<usize>) -> Result<(Vec<String>, String), QuoteError> {
    let Some(dash) = dash else {
        return Ok((args.to_vec(), String::new()));
    };
    let dash = dash.min(args.len());

    let mut quoted = Vec::with_capacity(args.len() - dash);
    for arg in &args[dash..] {
        quoted.push(shlex::try_quote(arg)?.into_owned());
    }

    Ok((args[..dash].to_vec(), quoted.join(" ")))
}
