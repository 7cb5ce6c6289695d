//! Output format value object

use serde::{Deserialize, Serialize};

/// How forecast outcomes are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable block per question (default)
    #[default]
    Summary,
    /// Full outcome record as JSON
    Json,
    /// Only the platform payload
    Payload,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            "payload" => Ok(OutputFormat::Payload),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}
