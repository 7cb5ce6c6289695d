//! `[output]` section: how batch results are printed

use forecast_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Format name accepted in `[output] format`
pub use forecast_domain::OutputFormat as FileOutputFormat;

/// Printing preferences; `-o` on the command line takes precedence over `format`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `summary`, `json` or `payload`; unset means summary
    pub format: Option<OutputFormat>,
    /// `false` strips ANSI colours from summaries and progress lines
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Format to print with, preferring an explicit command-line choice
    pub fn resolve_format(&self, cli_choice: Option<OutputFormat>) -> OutputFormat {
        cli_choice.or(self.format).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    #[test]
    fn test_payload_format_without_color() {
        let config: FileConfig = toml::from_str(
            r#"
[output]
format = "payload"
color = false
"#,
        )
        .unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Payload));
        assert!(!config.output.color);
    }

    #[test]
    fn test_resolve_format() {
        let unset = FileOutputConfig::default();
        assert_eq!(unset.resolve_format(None), OutputFormat::Summary);

        let json = FileOutputConfig {
            format: Some(OutputFormat::Json),
            ..Default::default()
        };
        assert_eq!(json.resolve_format(None), OutputFormat::Json);
        assert_eq!(
            json.resolve_format(Some(OutputFormat::Payload)),
            OutputFormat::Payload
        );
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[output]\nformat = \"xml\"\n");
        assert!(result.is_err());
    }
}
