//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use forecast_domain::{Model, QuestionId};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One elicitation call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Question being forecast
    pub question_id: QuestionId,
    /// Zero-based run number within the question
    pub run_index: usize,
    pub system_prompt: String,
    pub prompt: String,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one prompt and return the raw response text
    async fn complete(&self, model: &Model, request: &CompletionRequest) -> Result<String, GatewayError>;
}
