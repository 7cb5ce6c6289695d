//! Forecast Question use case
//!
//! Elicits N runs for one question, extracts an answer from each, and
//! combines the survivors into a consensus payload.
//!
//! ```text
//! research ─▶ prompt ─▶ N × LLM (bounded) ─▶ extract ─▶ aggregate ─▶ payload
//! ```
//!
//! A run that fails at the gateway, times out, or yields no usable answer
//! is recorded and dropped. The question fails only when no run survives.

use crate::config::{BehaviorConfig, ForecastParams};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::research::ResearchProvider;
use chrono::{DateTime, Utc};
use forecast_domain::{
    AggregationError, ConsensusAnswer, ForecastPayload, Model, NO_RESEARCH, PromptTemplate,
    QuestionId, QuestionSpec, QuestionType, RawResponse, RunError, SerializationError, TokenUsage,
    UsageSummary, ValidatedAnswer, aggregate, extract, serialize_consensus,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a single run was excluded from the consensus
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunFailure {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Extraction(#[from] RunError),
}

/// Errors that end a question without a forecast
#[derive(Error, Debug)]
pub enum ForecastQuestionError {
    #[error("runs_per_question is 0")]
    NoRuns,

    #[error("All {} runs failed", failures.len())]
    AllRunsFailed { failures: Vec<RunReport> },

    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Cancelled")]
    Cancelled,
}

/// Result of one run as shown to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Validated { answer: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub index: usize,
    #[serde(flatten)]
    pub status: RunStatus,
}

impl RunReport {
    pub fn validated(index: usize, answer: &ValidatedAnswer) -> Self {
        Self {
            index,
            status: RunStatus::Validated {
                answer: answer.summary(),
            },
        }
    }

    pub fn failed(index: usize, failure: &RunFailure) -> Self {
        Self {
            index,
            status: RunStatus::Failed {
                reason: failure.to_string(),
            },
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self.status, RunStatus::Validated { .. })
    }
}

/// Everything produced for one forecast question
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutcome {
    pub question_id: QuestionId,
    pub title: String,
    pub question_type: QuestionType,
    pub model: Model,
    pub runs_requested: usize,
    pub runs: Vec<RunReport>,
    pub consensus: ConsensusAnswer,
    pub payload: ForecastPayload,
    pub usage: UsageSummary,
    pub created_at: DateTime<Utc>,
}

impl ForecastOutcome {
    pub fn runs_validated(&self) -> usize {
        self.runs.iter().filter(|r| r.is_validated()).count()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Input for the ForecastQuestion use case
#[derive(Debug, Clone)]
pub struct ForecastQuestionInput {
    pub question: QuestionSpec,
    pub params: ForecastParams,
}

impl ForecastQuestionInput {
    pub fn new(question: QuestionSpec, params: ForecastParams) -> Self {
        Self { question, params }
    }
}

/// Use case for forecasting a single question
pub struct ForecastQuestionUseCase<G: LlmGateway + 'static, R: ResearchProvider + 'static> {
    gateway: Arc<G>,
    research: Arc<R>,
    behavior: BehaviorConfig,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static, R: ResearchProvider + 'static> ForecastQuestionUseCase<G, R> {
    pub fn new(gateway: Arc<G>, research: Arc<R>) -> Self {
        Self {
            gateway,
            research,
            behavior: BehaviorConfig::default(),
            cancellation_token: None,
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: ForecastQuestionInput,
    ) -> Result<ForecastOutcome, ForecastQuestionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ForecastQuestionInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ForecastOutcome, ForecastQuestionError> {
        let ForecastQuestionInput { question, params } = input;
        if params.runs_per_question == 0 {
            return Err(ForecastQuestionError::NoRuns);
        }

        info!(
            "Forecasting question {} ({}) with {} runs of {}",
            question.id,
            question.question_type(),
            params.runs_per_question,
            params.model
        );
        progress.on_question_start(&question, params.runs_per_question);

        let research = self.gather_research(&question).await;
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let prompt = PromptTemplate::for_question(&question, &research, &today);

        let responses = match self.elicit(&question, &params, &prompt).await {
            Ok(responses) => responses,
            Err(e) => {
                progress.on_question_complete(question.id, false);
                return Err(e);
            }
        };

        let mut usage = TokenUsage::default();
        let mut reports = Vec::with_capacity(responses.len());
        let mut answers = Vec::new();

        for (index, response) in responses {
            let outcome = response.and_then(|text| {
                usage.record(&prompt, &text);
                extract(&RawResponse::new(&question, text)).map_err(RunFailure::from)
            });
            match outcome {
                Ok(answer) => {
                    debug!("Question {} run {}: {}", question.id, index, answer.summary());
                    progress.on_run_complete(question.id, index, true);
                    reports.push(RunReport::validated(index, &answer));
                    answers.push(answer);
                }
                Err(failure) => {
                    warn!("Question {} run {} excluded: {}", question.id, index, failure);
                    progress.on_run_complete(question.id, index, false);
                    reports.push(RunReport::failed(index, &failure));
                }
            }
        }

        if answers.is_empty() {
            warn!("Question {}: all runs failed", question.id);
            progress.on_question_complete(question.id, false);
            return Err(ForecastQuestionError::AllRunsFailed { failures: reports });
        }

        let result = aggregate(&answers)
            .map_err(ForecastQuestionError::from)
            .and_then(|consensus| {
                let payload = serialize_consensus(&consensus, &question)?;
                Ok((consensus, payload))
            });
        let (consensus, payload) = match result {
            Ok(pair) => pair,
            Err(e) => {
                progress.on_question_complete(question.id, false);
                return Err(e);
            }
        };

        info!(
            "Question {}: consensus from {}/{} runs",
            question.id,
            answers.len(),
            params.runs_per_question
        );
        progress.on_question_complete(question.id, true);

        Ok(ForecastOutcome {
            question_id: question.id,
            title: question.title.clone(),
            question_type: question.question_type(),
            usage: usage.summary(&params.model),
            model: params.model,
            runs_requested: params.runs_per_question,
            runs: reports,
            consensus,
            payload,
            created_at: Utc::now(),
        })
    }

    /// Research text for the prompt; failures degrade to the placeholder
    async fn gather_research(&self, question: &QuestionSpec) -> String {
        match self.research.research(question).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Research for question {} failed: {}", question.id, e);
                NO_RESEARCH.to_string()
            }
        }
    }

    /// Issue all runs with bounded concurrency, sorted by run index
    async fn elicit(
        &self,
        question: &QuestionSpec,
        params: &ForecastParams,
        prompt: &str,
    ) -> Result<Vec<(usize, Result<String, RunFailure>)>, ForecastQuestionError> {
        let semaphore = Arc::new(Semaphore::new(params.run_concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for run_index in 0..params.runs_per_question {
            let gateway = Arc::clone(&self.gateway);
            let semaphore = Arc::clone(&semaphore);
            let model = params.model.clone();
            let timeout = self.behavior.timeout;
            let request = CompletionRequest {
                question_id: question.id,
                run_index,
                system_prompt: PromptTemplate::system().to_string(),
                prompt: prompt.to_string(),
            };

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let call = gateway.complete(&model, &request);
                // Wrap with timeout if configured
                let result = if let Some(timeout) = timeout {
                    match tokio::time::timeout(timeout, call).await {
                        Ok(r) => r.map_err(RunFailure::from),
                        Err(_) => Err(RunFailure::Timeout(timeout)),
                    }
                } else {
                    call.await.map_err(RunFailure::from)
                };
                (run_index, result)
            });
        }

        let mut responses = Vec::with_capacity(params.runs_per_question);
        loop {
            let joined = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        info!("Question {} cancelled", question.id);
                        return Err(ForecastQuestionError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                }
            } else {
                join_set.join_next().await
            };

            match joined {
                Some(Ok(response)) => responses.push(response),
                Some(Err(e)) => {
                    warn!("Task join error: {}", e);
                }
                None => break,
            }
        }

        responses.sort_by_key(|(index, _)| *index);
        Ok(responses)
    }
}
