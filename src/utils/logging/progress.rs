//! Progress reporting for a report run
//!
//! One bar with a tick per pipeline stage, built on indicatif.

use indicatif::{ProgressBar, ProgressStyle};

use crate::report::{Stage, StageObserver};

/// Template of the stage progress bar
pub const STAGE_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Create a progress bar for `length` steps with the stage template
#[must_use]
pub fn create_stage_progress_bar(length: u64) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(STAGE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Progress bar that advances once per finished stage
#[derive(Debug, Clone)]
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    /// Progress bar covering every pipeline stage
    #[must_use]
    pub fn new() -> Self {
        Self {
            bar: create_stage_progress_bar(Stage::ALL.len() as u64),
        }
    }

    /// Progress bar that draws nothing
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Finish the bar with a completion message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Clear the bar, e.g. after a failed run
    pub fn abandon(&self) {
        self.bar.abandon();
    }

    /// Finished stages
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for StageProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl StageObserver for StageProgress {
    fn stage_started(&self, stage: Stage) {
        self.bar.set_message(stage.label());
    }

    fn stage_finished(&self, stage: Stage, rows: usize) {
        self.bar.set_message(format!("{stage}: {rows} rows"));
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_per_finished_stage() {
        let progress = StageProgress::hidden();
        progress.stage_started(Stage::Load);
        assert_eq!(progress.position(), 0);
        progress.stage_finished(Stage::Load, 10);
        progress.stage_finished(Stage::CohortFilter, 4);
        assert_eq!(progress.position(), 2);
    }
}
