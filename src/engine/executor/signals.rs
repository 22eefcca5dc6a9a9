//! Interrupt handling while tasks run.
//!
//! Child processes share our process group, so Ctrl-C already reaches them.
//! The handler only records the signal so the executor stops starting new
//! commands. A third signal gives up on cooperative shutdown.

use colored::Color;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::Logger;
use crate::exit_codes;

/// Signals received before exiting without waiting for running commands.
pub const MAX_INTERRUPTS: usize = 3;

/// Shared count of interrupts received.
#[derive(Debug, Clone, Default)]
pub struct Interrupts {
    count: Arc<AtomicUsize>,
}

impl Interrupts {
    pub fn received(&self) -> bool {
        self.count.load(Ordering::SeqCst) > 0
    }

    /// Record one signal and return how many were seen so far.
    pub fn record(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install the process-wide Ctrl-C handler feeding this counter.
    pub fn install(&self, logger: Logger) {
        let interrupts = self.clone();
        let result = ctrlc::set_handler(move || {
            let seen = interrupts.record();
            if seen >= MAX_INTERRUPTS {
                logger.errf(
                    Color::Red,
                    &format!("task: Received {} interrupts, exiting", seen),
                );
                std::process::exit(exit_codes::FAILURE);
            }
            logger.errf(
                Color::Yellow,
                "task: Signal received: interrupt, waiting for running commands",
            );
        });

        if let Err(e) = result {
            tracing::warn!("failed to install interrupt handler: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_shared_between_clones() {
        let interrupts = Interrupts::default();
        let clone = interrupts.clone();
        assert!(!interrupts.received());

        assert_eq!(clone.record(), 1);
        assert!(interrupts.received());
        assert_eq!(interrupts.record(), 2);
    }
}
