//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-million-token prices in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

/// LLM models used for forecast elicitation (Value Object)
///
/// Identifiers are OpenRouter-style `provider/model` strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    ClaudeOpus45,
    ClaudeSonnet45,
    ClaudeHaiku45,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::ClaudeOpus45 => "anthropic/claude-opus-4.5",
            Model::ClaudeSonnet45 => "anthropic/claude-sonnet-4.5",
            Model::ClaudeHaiku45 => "anthropic/claude-haiku-4.5",
            Model::Custom(s) => s,
        }
    }

    /// All built-in models
    pub fn known_models() -> Vec<Model> {
        vec![Model::ClaudeOpus45, Model::ClaudeSonnet45, Model::ClaudeHaiku45]
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Model::Custom(_))
    }

    /// Pricing for usage estimates.
    ///
    /// Custom models have no published table and are priced as opus-4.5.
    pub fn pricing(&self) -> ModelPricing {
        match self {
            Model::ClaudeOpus45 | Model::Custom(_) => ModelPricing {
                input_per_million: 15.00,
                output_per_million: 75.00,
            },
            Model::ClaudeSonnet45 => ModelPricing {
                input_per_million: 3.00,
                output_per_million: 15.00,
            },
            Model::ClaudeHaiku45 => ModelPricing {
                input_per_million: 0.80,
                output_per_million: 4.00,
            },
        }
    }
}

impl Default for Model {
    /// Returns the default model (claude-opus-4.5)
    fn default() -> Self {
        Model::ClaudeOpus45
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "anthropic/claude-opus-4.5" | "claude-opus-4.5" => Model::ClaudeOpus45,
            "anthropic/claude-sonnet-4.5" | "claude-sonnet-4.5" => Model::ClaudeSonnet45,
            "anthropic/claude-haiku-4.5" | "claude-haiku-4.5" => Model::ClaudeHaiku45,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
