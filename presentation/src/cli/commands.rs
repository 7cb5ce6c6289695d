//! CLI command definitions

use clap::Parser;
use forecast_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for forecast-quorum
#[derive(Parser, Debug)]
#[command(name = "forecast-quorum")]
#[command(author, version, about = "Ensemble LLM forecasts for prediction-market questions")]
#[command(long_about = r#"
Forecast Quorum asks an LLM the same question several times and combines the
runs into one platform-ready forecast.

Each run goes through four stages:
1. Parse: pull a probability, percentiles or option weights out of the text
2. Validate: repair the answer into platform-legal values
3. Aggregate: take the median across the runs that survived
4. Serialize: build the submission payload

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./forecast.toml     Project-level config
3. ~/.config/forecast-quorum/config.toml   Global config

Example:
  forecast-quorum question.json --responses recorded.json
  forecast-quorum q1.json q2.json --responses recorded.json --runs 3 -o payload
"#)]
pub struct Cli {
    /// Question files (platform question JSON)
    #[arg(value_name = "QUESTION_FILE", required_unless_present = "show_config")]
    pub questions: Vec<PathBuf>,

    /// Recorded LLM responses to replay, keyed by question id
    #[arg(short, long, value_name = "FILE", required_unless_present = "show_config")]
    pub responses: Option<PathBuf>,

    /// Model to price and label the runs with
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Runs per question
    #[arg(long, value_name = "N")]
    pub runs: Option<usize>,

    /// Research text handed to every prompt
    #[arg(long, value_name = "TEXT")]
    pub research: Option<String>,

    /// Submit each payload (dry run: the payload is logged)
    #[arg(long)]
    pub submit: bool,

    /// Append one JSON line per question to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Output format: summary, json or payload
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "forecast-quorum",
            "a.json",
            "b.json",
            "--responses",
            "r.json",
            "--runs",
            "3",
            "-o",
            "payload",
            "-vv",
            "--submit",
        ])
        .unwrap();
        assert_eq!(cli.questions.len(), 2);
        assert_eq!(cli.responses, Some(PathBuf::from("r.json")));
        assert_eq!(cli.runs, Some(3));
        assert_eq!(cli.output, Some(OutputFormat::Payload));
        assert_eq!(cli.verbose, 2);
        assert!(cli.submit);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_requires_questions_and_responses() {
        assert!(Cli::try_parse_from(["forecast-quorum", "--responses", "r.json"]).is_err());
        assert!(Cli::try_parse_from(["forecast-quorum", "a.json"]).is_err());
        assert!(
            Cli::try_parse_from(["forecast-quorum", "a.json", "-r", "r.json", "-o", "xml"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["forecast-quorum", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.questions.is_empty());
    }
}
