use async_trait::async_trait;
use forecast_application::ports::submission::{ForecastSubmitter, SubmissionError};
use forecast_domain::{ForecastPayload, QuestionId};
use tracing::info;

/// Submitter that logs the payload instead of posting it
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSubmitter;

#[async_trait]
impl ForecastSubmitter for DryRunSubmitter {
    async fn submit(
        &self,
        question_id: QuestionId,
        payload: &ForecastPayload,
    ) -> Result<(), SubmissionError> {
        let body = payload
            .to_json()
            .map_err(|e| SubmissionError::Failed(e.to_string()))?;
        info!("Dry run: would submit to question {}: {}", question_id, body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_accepts() {
        let payload = ForecastPayload::Binary { probability: 0.4 };
        assert!(DryRunSubmitter.submit(QuestionId(3), &payload).await.is_ok());
    }
}
