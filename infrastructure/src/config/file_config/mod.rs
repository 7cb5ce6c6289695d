//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod forecast;
mod output;

pub use forecast::FileForecastConfig;
pub use output::{FileOutputConfig, FileOutputFormat};

use forecast_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Run fan-out and model settings
    pub forecast: FileForecastConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.forecast.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_domain::{Model, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[forecast]
model = "anthropic/claude-haiku-4.5"
runs_per_question = 3
question_concurrency = 1
run_concurrency = 2
timeout_seconds = 60

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.forecast.to_params();
        assert_eq!(params.model, Model::ClaudeHaiku45);
        assert_eq!(params.runs_per_question, 3);
        assert_eq!(params.question_concurrency, 1);
        assert_eq!(params.run_concurrency, 2);
        assert_eq!(config.forecast.timeout_seconds, Some(60));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[forecast]
runs_per_question = 7
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.forecast.runs_per_question, 7);
        // Defaults should apply
        assert_eq!(config.forecast.run_concurrency, 5);
        assert!(config.forecast.model.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_zero_runs() {
        let toml_str = r#"
[forecast]
runs_per_question = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().iter().any(|i| i.is_error()));
    }
}
