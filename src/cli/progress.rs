//! Terminal spinner for long-running commands
//!
//! Drawn on stderr and hidden automatically when stderr isn't a terminal.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["◢ ", "◣ ", "◤ ", "◥ ", ""];

/// A message with a rotating glyph in front of it
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start spinning with an initial message
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(TICKS)
                .template("{spinner}{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Replace the message and advance the glyph
    pub fn message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
        self.bar.tick();
    }

    /// Clear the spinner line
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
