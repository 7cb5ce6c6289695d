//! Replay gateway backed by a JSON responses file

use async_trait::async_trait;
use forecast_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use forecast_domain::{Model, QuestionId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read responses file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid responses file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid question id key '{0}' in responses file")]
    InvalidKey(String),
}

/// Gateway that answers run `i` of a question with the `i`-th recorded text.
///
/// The file maps question ids to run texts:
///
/// ```json
/// { "42": ["Probability: 35%", null, "Probability: 40%"] }
/// ```
///
/// A `null` entry replays a failed call.
#[derive(Debug, Default)]
pub struct ReplayLlmGateway {
    responses: HashMap<QuestionId, Vec<Option<String>>>,
}

impl ReplayLlmGateway {
    pub fn from_file(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: HashMap<String, Vec<Option<String>>> =
            serde_json::from_str(&content).map_err(|source| ReplayError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let gateway = Self::from_raw(raw)?;
        info!(
            "Loaded recorded responses for {} questions from {}",
            gateway.responses.len(),
            path.display()
        );
        Ok(gateway)
    }

    pub fn from_map(responses: HashMap<QuestionId, Vec<Option<String>>>) -> Self {
        Self { responses }
    }

    fn from_raw(raw: HashMap<String, Vec<Option<String>>>) -> Result<Self, ReplayError> {
        let responses = raw
            .into_iter()
            .map(|(key, texts)| {
                key.trim()
                    .parse::<u64>()
                    .map(|id| (QuestionId(id), texts))
                    .map_err(|_| ReplayError::InvalidKey(key))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { responses })
    }

    /// Number of recorded runs for a question
    pub fn recorded_runs(&self, question_id: QuestionId) -> usize {
        self.responses.get(&question_id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl LlmGateway for ReplayLlmGateway {
    async fn complete(
        &self,
        model: &Model,
        request: &CompletionRequest,
    ) -> Result<String, GatewayError> {
        let texts = self.responses.get(&request.question_id).ok_or_else(|| {
            GatewayError::RequestFailed(format!(
                "no recorded responses for question {}",
                request.question_id
            ))
        })?;

        debug!(
            "Replaying run {} of question {} as {}",
            request.run_index, request.question_id, model
        );

        match texts.get(request.run_index) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(GatewayError::RequestFailed(format!(
                "recorded failure for run {}",
                request.run_index
            ))),
            None => Err(GatewayError::RequestFailed(format!(
                "recorded responses exhausted: question {} has {} runs, run {} requested",
                request.question_id,
                texts.len(),
                request.run_index
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question_id: u64, run_index: usize) -> CompletionRequest {
        CompletionRequest {
            question_id: QuestionId(question_id),
            run_index,
            system_prompt: String::new(),
            prompt: "prompt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_replays_by_run_index() {
        let gateway = ReplayLlmGateway::from_map(HashMap::from([(
            QuestionId(1),
            vec![Some("first".to_string()), None, Some("third".to_string())],
        )]));
        let model = Model::default();

        assert_eq!(gateway.complete(&model, &request(1, 2)).await.unwrap(), "third");
        assert_eq!(gateway.complete(&model, &request(1, 0)).await.unwrap(), "first");
        assert!(matches!(
            gateway.complete(&model, &request(1, 1)).await,
            Err(GatewayError::RequestFailed(_))
        ));
        assert!(gateway.complete(&model, &request(1, 3)).await.is_err());
        assert!(gateway.complete(&model, &request(2, 0)).await.is_err());
        assert_eq!(gateway.recorded_runs(QuestionId(1)), 3);
        assert_eq!(gateway.recorded_runs(QuestionId(2)), 0);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        std::fs::write(&path, r#"{"42": ["Probability: 35%", null], " 7 ": []}"#).unwrap();

        let gateway = ReplayLlmGateway::from_file(&path).unwrap();
        assert_eq!(gateway.recorded_runs(QuestionId(42)), 2);
        assert_eq!(gateway.recorded_runs(QuestionId(7)), 0);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bad_key = dir.path().join("bad_key.json");
        std::fs::write(&bad_key, r#"{"abc": ["x"]}"#).unwrap();
        assert!(matches!(
            ReplayLlmGateway::from_file(&bad_key),
            Err(ReplayError::InvalidKey(k)) if k == "abc"
        ));

        let bad_json = dir.path().join("bad.json");
        std::fs::write(&bad_json, "[1, 2]").unwrap();
        assert!(matches!(
            ReplayLlmGateway::from_file(&bad_json),
            Err(ReplayError::Json { .. })
        ));

        assert!(matches!(
            ReplayLlmGateway::from_file(&dir.path().join("missing.json")),
            Err(ReplayError::Io { .. })
        ));
    }
}
