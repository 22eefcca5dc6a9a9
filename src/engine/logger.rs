//! User-facing messages of the engine.
//!
//! Diagnostics go through `tracing`. What the user is meant to read (command
//! echo, notices, failures) goes through [`Logger`], optionally coloured.

use colored::{Color, Colorize};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy)]
pub struct Logger {
    verbose: bool,
    color: bool,
}

impl Logger {
    /// Create a logger. Colour is also disabled when `NO_COLOR` is set.
    pub fn new(verbose: bool, color: bool) -> Self {
        Self {
            verbose,
            color: color && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Write a line to standard output.
    pub fn outf(&self, color: Color, msg: &str) {
        let _ = writeln!(io::stdout().lock(), "{}", self.paint(msg, color));
    }

    /// Write a line to standard error.
    pub fn errf(&self, color: Color, msg: &str) {
        let _ = writeln!(io::stderr().lock(), "{}", self.paint(msg, color));
    }

    /// Write a line to standard error in verbose mode only.
    pub fn verbose_errf(&self, color: Color, msg: &str) {
        if self.verbose {
            self.errf(color, msg);
        }
    }

    pub fn paint(&self, msg: &str, color: Color) -> String {
        if self.color {
            msg.color(color).to_string()
        } else {
            msg.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_leaves_text_untouched() {
        let logger = Logger::new(false, false);
        assert_eq!(logger.paint("task: hi", Color::Red), "task: hi");
    }
}
