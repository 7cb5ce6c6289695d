//! Progress notification port
//!
//! Defines the interface for reporting progress during forecast execution.

use forecast_domain::{QuestionId, QuestionSpec};

/// Callback for progress updates during forecasting
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a question's runs are about to be issued
    fn on_question_start(&self, question: &QuestionSpec, total_runs: usize);

    /// Called when one run finishes, validated or not
    fn on_run_complete(&self, question_id: QuestionId, run_index: usize, success: bool);

    /// Called when a question has a consensus or has failed
    fn on_question_complete(&self, question_id: QuestionId, success: bool);

    /// Called after a submission attempt
    fn on_submission(&self, _question_id: QuestionId, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_question_start(&self, _question: &QuestionSpec, _total_runs: usize) {}
    fn on_run_complete(&self, _question_id: QuestionId, _run_index: usize, _success: bool) {}
    fn on_question_complete(&self, _question_id: QuestionId, _success: bool) {}
}
