use async_trait::async_trait;
use forecast_application::ports::research::{ResearchError, ResearchProvider};
use forecast_domain::{NO_RESEARCH, QuestionSpec};

/// Research provider that hands every question the same text
#[derive(Debug, Clone)]
pub struct StaticResearch {
    text: String,
}

impl StaticResearch {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for StaticResearch {
    fn default() -> Self {
        Self::new(NO_RESEARCH)
    }
}

#[async_trait]
impl ResearchProvider for StaticResearch {
    async fn research(&self, _question: &QuestionSpec) -> Result<String, ResearchError> {
        Ok(self.text.clone())
    }
}
