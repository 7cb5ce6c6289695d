//! Research port
//!
//! Supplies background text injected into the elicitation prompt.

use async_trait::async_trait;
use forecast_domain::QuestionSpec;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResearchError {
    #[error("Research unavailable: {0}")]
    Unavailable(String),

    #[error("Research request failed: {0}")]
    RequestFailed(String),
}

/// Source of research text for a question
///
/// A failing provider never fails the forecast; the prompt falls back to a
/// "no research" placeholder.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    async fn research(&self, question: &QuestionSpec) -> Result<String, ResearchError>;
}

/// Provider that never has research
pub struct NoResearch;

#[async_trait]
impl ResearchProvider for NoResearch {
    async fn research(&self, _question: &QuestionSpec) -> Result<String, ResearchError> {
        Ok(String::new())
    }
}
