//! Forecast parameters: run fan-out control.
//!
//! [`ForecastParams`] groups the static parameters that control how many
//! runs are elicited per question and how many calls are in flight.

use forecast_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};

/// Run fan-out parameters.
///
/// | Field                  | Bounds                              |
/// |------------------------|-------------------------------------|
/// | `runs_per_question`    | runs elicited for each question     |
/// | `run_concurrency`      | LLM calls in flight per question    |
/// | `question_concurrency` | questions in flight per batch       |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Model used for every run.
    pub model: Model,
    /// Number of repeated elicitation runs per question.
    pub runs_per_question: usize,
    /// Maximum questions forecast at the same time.
    pub question_concurrency: usize,
    /// Maximum concurrent LLM calls within one question.
    pub run_concurrency: usize,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            runs_per_question: 5,
            question_concurrency: 2,
            run_concurrency: 5,
        }
    }
}

impl ForecastParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_runs_per_question(mut self, runs: usize) -> Self {
        self.runs_per_question = runs;
        self
    }

    pub fn with_question_concurrency(mut self, limit: usize) -> Self {
        self.question_concurrency = limit;
        self
    }

    pub fn with_run_concurrency(mut self, limit: usize) -> Self {
        self.run_concurrency = limit;
        self
    }

    // ==================== Validation ====================

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.runs_per_question == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRuns,
                "runs_per_question must be at least 1",
            ));
        }
        if self.question_concurrency == 0 || self.run_concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrency,
                "question_concurrency and run_concurrency must be at least 1",
            ));
        }
        if self.model.is_custom() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownModel,
                format!(
                    "model '{}' is not a built-in model; usage is priced as {}",
                    self.model,
                    Model::default()
                ),
            ));
        }
        issues
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(ConfigIssue::is_error)
    }
}
