//! Submission port
//!
//! Hands serialized payloads to the forecasting platform.

use async_trait::async_trait;
use forecast_domain::{ForecastPayload, QuestionId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("Platform rejected forecast for question {question_id}: {reason}")]
    Rejected { question_id: QuestionId, reason: String },

    #[error("Submission failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait ForecastSubmitter: Send + Sync {
    async fn submit(&self, question_id: QuestionId, payload: &ForecastPayload) -> Result<(), SubmissionError>;
}
