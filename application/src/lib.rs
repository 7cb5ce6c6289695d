//! Application layer for forecast-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BehaviorConfig, ForecastParams};
pub use ports::{
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    research::{NoResearch, ResearchError, ResearchProvider},
    submission::{ForecastSubmitter, SubmissionError},
};
pub use use_cases::forecast_batch::{ForecastBatchInput, ForecastBatchUseCase, QuestionReport};
pub use use_cases::forecast_question::{
    ForecastOutcome, ForecastQuestionError, ForecastQuestionInput, ForecastQuestionUseCase,
    RunFailure, RunReport, RunStatus,
};
