//! CLI command implementations

pub mod push;
pub mod style;

use async_trait::async_trait;
use indicatif::ProgressBar;
use mr_push::push::{Phase, ProgressCallback};
use std::time::Duration;
use style::{Stylize, spinner_style};

/// Spinner-based progress reporter for interactive runs
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start a spinner on stderr
    pub fn spinner() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Stop and clear the spinner
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        self.spinner.set_message(format!("{phase}..."));
    }

    async fn on_message(&self, message: &str) {
        self.spinner.println(format!("  {}", message.muted()));
    }
}
