//! Forecast Batch use case
//!
//! Forecasts many questions with bounded question concurrency and, when
//! asked to, submits each payload. Every input question gets exactly one
//! report, in input order, whether it succeeded, failed or was cancelled.

use crate::config::ForecastParams;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::research::ResearchProvider;
use crate::ports::submission::{ForecastSubmitter, SubmissionError};
use crate::use_cases::forecast_question::{
    ForecastOutcome, ForecastQuestionError, ForecastQuestionInput, ForecastQuestionUseCase,
};
use forecast_domain::{QuestionId, QuestionSpec};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Input for the ForecastBatch use case
#[derive(Debug, Clone)]
pub struct ForecastBatchInput {
    pub questions: Vec<QuestionSpec>,
    pub params: ForecastParams,
    /// Submit every successful payload
    pub submit: bool,
}

impl ForecastBatchInput {
    pub fn new(questions: Vec<QuestionSpec>, params: ForecastParams) -> Self {
        Self {
            questions,
            params,
            submit: false,
        }
    }

    pub fn with_submit(mut self, submit: bool) -> Self {
        self.submit = submit;
        self
    }
}

/// Outcome of one question within a batch
#[derive(Debug)]
pub struct QuestionReport {
    pub question_id: QuestionId,
    pub title: String,
    pub result: Result<ForecastOutcome, ForecastQuestionError>,
    /// `None` when submission was not requested or the forecast failed
    pub submission: Option<Result<(), SubmissionError>>,
}

impl QuestionReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok() && !matches!(self.submission, Some(Err(_)))
    }
}

/// Use case for forecasting a batch of questions
pub struct ForecastBatchUseCase<G, R, S>
where
    G: LlmGateway + 'static,
    R: ResearchProvider + 'static,
    S: ForecastSubmitter + 'static,
{
    forecaster: ForecastQuestionUseCase<G, R>,
    submitter: Arc<S>,
    cancellation_token: Option<CancellationToken>,
}

impl<G, R, S> ForecastBatchUseCase<G, R, S>
where
    G: LlmGateway + 'static,
    R: ResearchProvider + 'static,
    S: ForecastSubmitter + 'static,
{
    pub fn new(forecaster: ForecastQuestionUseCase<G, R>, submitter: Arc<S>) -> Self {
        Self {
            forecaster,
            submitter,
            cancellation_token: None,
        }
    }

    /// Questions not yet started when the token fires are reported as cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.forecaster = self.forecaster.with_cancellation(token.clone());
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: ForecastBatchInput) -> Vec<QuestionReport> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ForecastBatchInput,
        progress: &dyn ProgressNotifier,
    ) -> Vec<QuestionReport> {
        let ForecastBatchInput {
            questions,
            params,
            submit,
        } = input;
        let limit = params.question_concurrency.max(1);
        info!(
            "Forecasting {} questions, {} at a time",
            questions.len(),
            limit
        );

        let mut reports: Vec<(usize, QuestionReport)> = stream::iter(questions.into_iter().enumerate())
            .map(|(position, question)| {
                let params = params.clone();
                async move {
                    let report = self.forecast_one(question, params, submit, progress).await;
                    (position, report)
                }
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        reports.sort_by_key(|(position, _)| *position);
        let reports: Vec<QuestionReport> = reports.into_iter().map(|(_, r)| r).collect();

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        info!(
            "Batch complete: {} succeeded, {} failed",
            reports.len() - failed,
            failed
        );
        reports
    }

    async fn forecast_one(
        &self,
        question: QuestionSpec,
        params: ForecastParams,
        submit: bool,
        progress: &dyn ProgressNotifier,
    ) -> QuestionReport {
        let question_id = question.id;
        let title = question.title.clone();

        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return QuestionReport {
                question_id,
                title,
                result: Err(ForecastQuestionError::Cancelled),
                submission: None,
            };
        }

        let result = self
            .forecaster
            .execute_with_progress(ForecastQuestionInput::new(question, params), progress)
            .await;
        if let Err(e) = &result {
            warn!("Question {} failed: {}", question_id, e);
        }

        let submission = match (&result, submit) {
            (Ok(outcome), true) => {
                let submitted = self.submitter.submit(question_id, &outcome.payload).await;
                match &submitted {
                    Ok(()) => info!("Submitted forecast for question {}", question_id),
                    Err(e) => warn!("Submission for question {} failed: {}", question_id, e),
                }
                progress.on_submission(question_id, submitted.is_ok());
                Some(submitted)
            }
            _ => None,
        };

        QuestionReport {
            question_id,
            title,
            result,
            submission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{CompletionRequest, GatewayError};
    use crate::ports::research::NoResearch;
    use async_trait::async_trait;
    use forecast_domain::{ForecastPayload, Model};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    /// Answers every run of a question with the same text
    struct PerQuestionGateway {
        texts: HashMap<QuestionId, String>,
    }

    #[async_trait]
    impl LlmGateway for PerQuestionGateway {
        async fn complete(
            &self,
            _model: &Model,
            request: &CompletionRequest,
        ) -> Result<String, GatewayError> {
            self.texts
                .get(&request.question_id)
                .cloned()
                .ok_or_else(|| GatewayError::RequestFailed("no script".to_string()))
        }
    }

    struct RecordingSubmitter {
        submitted: Mutex<Vec<(QuestionId, String)>>,
        reject: Option<QuestionId>,
    }

    impl RecordingSubmitter {
        fn new(reject: Option<QuestionId>) -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                reject,
            }
        }
    }

    #[async_trait]
    impl ForecastSubmitter for RecordingSubmitter {
        async fn submit(
            &self,
            question_id: QuestionId,
            payload: &ForecastPayload,
        ) -> Result<(), SubmissionError> {
            if self.reject == Some(question_id) {
                return Err(SubmissionError::Rejected {
                    question_id,
                    reason: "closed".to_string(),
                });
            }
            self.submitted
                .lock()
                .unwrap()
                .push((question_id, payload.to_json().unwrap()));
            Ok(())
        }
    }

    fn batch(
        texts: &[(u64, &str)],
        submitter: Arc<RecordingSubmitter>,
    ) -> ForecastBatchUseCase<PerQuestionGateway, NoResearch, RecordingSubmitter> {
        let gateway = PerQuestionGateway {
            texts: texts
                .iter()
                .map(|(id, t)| (QuestionId(*id), t.to_string()))
                .collect(),
        };
        let forecaster = ForecastQuestionUseCase::new(Arc::new(gateway), Arc::new(NoResearch));
        ForecastBatchUseCase::new(forecaster, submitter)
    }

    fn questions() -> Vec<QuestionSpec> {
        vec![
            QuestionSpec::binary(1, "first"),
            QuestionSpec::binary(2, "second"),
            QuestionSpec::binary(3, "third"),
        ]
    }

    fn params() -> ForecastParams {
        ForecastParams::default()
            .with_runs_per_question(2)
            .with_question_concurrency(2)
    }

    #[tokio::test]
    async fn test_reports_in_input_order_with_failures() {
        let submitter = Arc::new(RecordingSubmitter::new(None));
        let use_case = batch(&[(1, "Probability: 20%"), (3, "Probability: 70%")], submitter);
        let reports = use_case
            .execute(ForecastBatchInput::new(questions(), params()))
            .await;

        let ids: Vec<u64> = reports.iter().map(|r| r.question_id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(reports[0].is_success());
        assert!(matches!(
            reports[1].result,
            Err(ForecastQuestionError::AllRunsFailed { .. })
        ));
        assert!(reports[2].is_success());
        assert!(reports.iter().all(|r| r.submission.is_none()));
    }

    #[tokio::test]
    async fn test_submit_successful_payloads() {
        let submitter = Arc::new(RecordingSubmitter::new(Some(QuestionId(3))));
        let use_case = batch(
            &[(1, "Probability: 20%"), (3, "Probability: 70%")],
            Arc::clone(&submitter),
        );
        let reports = use_case
            .execute(ForecastBatchInput::new(questions(), params()).with_submit(true))
            .await;

        let submitted = submitter.submitted.lock().unwrap();
        assert_eq!(submitted.as_slice(), &[(QuestionId(1), r#"{"probability":0.2}"#.to_string())]);
        assert!(matches!(reports[0].submission, Some(Ok(()))));
        assert!(reports[1].submission.is_none());
        assert!(matches!(reports[2].submission, Some(Err(SubmissionError::Rejected { .. }))));
        assert!(!reports[2].is_success());
    }

    #[tokio::test]
    async fn test_cancelled_batch_reports_every_question() {
        let token = CancellationToken::new();
        token.cancel();
        let submitter = Arc::new(RecordingSubmitter::new(None));
        let use_case = batch(&[(1, "Probability: 20%")], submitter).with_cancellation(token);
        let reports = use_case
            .execute(ForecastBatchInput::new(questions(), params()))
            .await;

        assert_eq!(reports.len(), 3);
        assert!(reports
            .iter()
            .all(|r| matches!(r.result, Err(ForecastQuestionError::Cancelled))));
    }
}
