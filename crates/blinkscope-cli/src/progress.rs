//! Spinner helpers for the bootstrap steps.

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a bootstrap step runs.
pub fn step_spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(message.into());
    pb
}
