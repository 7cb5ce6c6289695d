//! Forecast configuration from TOML (`[forecast]` section)

use forecast_application::{BehaviorConfig, ForecastParams};
use forecast_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};

/// Raw forecast configuration from TOML
///
/// # Example
///
/// ```toml
/// [forecast]
/// model = "anthropic/claude-opus-4.5"
/// runs_per_question = 5
/// question_concurrency = 2
/// run_concurrency = 5
/// timeout_seconds = 180
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileForecastConfig {
    /// Model for every elicitation run
    pub model: Option<String>,
    /// Repeated runs per question
    pub runs_per_question: usize,
    /// Questions forecast at the same time
    pub question_concurrency: usize,
    /// LLM calls in flight per question
    pub run_concurrency: usize,
    /// Per-call timeout; `None` waits indefinitely
    pub timeout_seconds: Option<u64>,
}

impl Default for FileForecastConfig {
    fn default() -> Self {
        let params = ForecastParams::default();
        Self {
            model: None,
            runs_per_question: params.runs_per_question,
            question_concurrency: params.question_concurrency,
            run_concurrency: params.run_concurrency,
            timeout_seconds: Some(180),
        }
    }
}

impl FileForecastConfig {
    /// Parse the model name, collecting an issue for an empty name.
    pub fn parse_model(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        match &self.model {
            None => (None, issues),
            Some(s) if s.trim().is_empty() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName,
                    "forecast.model: model name cannot be empty",
                ));
                (None, issues)
            }
            Some(s) => {
                // Model::from_str is infallible; unknown names become Custom(...)
                let Ok(model) = s.trim().parse::<Model>();
                (Some(model), issues)
            }
        }
    }

    /// Convert to application parameters; an unusable model falls back to the default.
    pub fn to_params(&self) -> ForecastParams {
        let params = ForecastParams::default()
            .with_runs_per_question(self.runs_per_question)
            .with_question_concurrency(self.question_concurrency)
            .with_run_concurrency(self.run_concurrency);
        match self.parse_model().0 {
            Some(model) => params.with_model(model),
            None => params,
        }
    }

    pub fn to_behavior(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(self.timeout_seconds)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_model().1;
        issues.extend(self.to_params().validate());
        if self.timeout_seconds == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "forecast.timeout_seconds cannot be 0",
            ));
        }
        issues
    }
}
