//! Token and cost estimates for LLM calls

use crate::core::model::Model;
use serde::Serialize;

/// Rough token count at four characters per token
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() / 4) as u64
}

/// Running token counts for one question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub api_calls: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Usage of a single completed call
    pub fn for_call(prompt: &str, response: &str) -> Self {
        Self {
            api_calls: 1,
            input_tokens: estimate_tokens(prompt),
            output_tokens: estimate_tokens(response),
        }
    }

    pub fn record(&mut self, prompt: &str, response: &str) {
        self.merge(Self::for_call(prompt, response));
    }

    pub fn merge(&mut self, other: TokenUsage) {
        self.api_calls += other.api_calls;
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Price the usage with the model's per-million-token rates
    pub fn summary(&self, model: &Model) -> UsageSummary {
        let pricing = model.pricing();
        let input_cost = self.input_tokens as f64 / 1_000_000.0 * pricing.input_per_million;
        let output_cost = self.output_tokens as f64 / 1_000_000.0 * pricing.output_per_million;
        UsageSummary {
            model: model.clone(),
            api_calls: self.api_calls,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            total_tokens: self.total_tokens(),
            input_cost_usd: round_cents(input_cost),
            output_cost_usd: round_cents(output_cost),
            total_cost_usd: round_cents(input_cost + output_cost),
        }
    }
}

/// Priced usage, reported with each question outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub model: Model,
    pub api_calls: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub input_cost_usd: f64,
    pub output_cost_usd: f64,
    pub total_cost_usd: f64,
}

/// Four decimal places
fn round_cents(usd: f64) -> f64 {
    (usd * 10_000.0).round() / 10_000.0
}
