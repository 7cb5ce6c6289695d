//! Console output formatter for forecast results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use forecast_application::{ForecastOutcome, ForecastQuestionError, QuestionReport, RunStatus};
use forecast_domain::{Cdf, ConsensusAnswer, QuestionId, UsageSummary};
use serde_json::{Map, Value, json};

/// Quantiles shown for a numeric consensus
const SUMMARY_QUANTILES: [(&str, f64); 3] = [("P10", 0.1), ("P50", 0.5), ("P90", 0.9)];

/// Formats forecast results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every report followed by the batch totals
    pub fn format_summary(reports: &[QuestionReport]) -> String {
        let mut output = String::new();
        for report in reports {
            output.push_str(&Self::format_report(report));
            output.push('\n');
        }
        output.push_str(&Self::format_totals(reports));
        output
    }

    /// Format one question
    pub fn format_report(report: &QuestionReport) -> String {
        let mut output = Self::header(report.question_id, &report.title);
        output.push('\n');

        match &report.result {
            Ok(outcome) => output.push_str(&Self::format_outcome(outcome)),
            Err(e) => {
                output.push_str(&format!("{} {}\n", "Failed:".red().bold(), e));
                if let ForecastQuestionError::AllRunsFailed { failures } = e {
                    for run in failures {
                        if let RunStatus::Failed { reason } = &run.status {
                            output.push_str(&format!("  {} run {}: {}\n", "x".red(), run.index, reason));
                        }
                    }
                }
            }
        }

        match &report.submission {
            Some(Ok(())) => output.push_str(&format!("{} accepted\n", "Submission:".cyan().bold())),
            Some(Err(e)) => output.push_str(&format!("{} {}\n", "Submission:".red().bold(), e)),
            None => {}
        }
        output
    }

    fn format_outcome(outcome: &ForecastOutcome) -> String {
        let mut output = format!(
            "{} {} ({}), {}/{} runs validated\n",
            "Model:".cyan().bold(),
            outcome.model,
            outcome.question_type,
            outcome.runs_validated(),
            outcome.runs_requested
        );

        for run in &outcome.runs {
            match &run.status {
                RunStatus::Validated { answer } => {
                    output.push_str(&format!("  {} run {}: {}\n", "v".green(), run.index, answer))
                }
                RunStatus::Failed { reason } => {
                    output.push_str(&format!("  {} run {}: {}\n", "x".red(), run.index, reason))
                }
            }
        }

        output.push_str(&format!(
            "{} {}\n",
            "Consensus:".green().bold(),
            Self::consensus_line(&outcome.consensus)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Usage:".dimmed(),
            Self::usage_line(&outcome.usage)
        ));
        output
    }

    /// One-line rendering of a consensus
    pub fn consensus_line(consensus: &ConsensusAnswer) -> String {
        match consensus {
            ConsensusAnswer::Binary(p) => format!("{:.1}%", p.value() * 100.0),
            ConsensusAnswer::Numeric(cdf) => SUMMARY_QUANTILES
                .iter()
                .filter_map(|&(label, q)| {
                    cdf_quantile(cdf, q).map(|x| format!("{} ~ {}", label, round_sig(x)))
                })
                .collect::<Vec<_>>()
                .join(", "),
            ConsensusAnswer::MultipleChoice(probs) => probs
                .entries()
                .iter()
                .map(|(label, p)| format!("{}: {:.1}%", label, p * 100.0))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn usage_line(usage: &UsageSummary) -> String {
        format!(
            "{} calls, {} tokens, ${:.4}",
            usage.api_calls, usage.total_tokens, usage.total_cost_usd
        )
    }

    fn format_totals(reports: &[QuestionReport]) -> String {
        let succeeded = reports.iter().filter(|r| r.is_success()).count();
        let failed = reports.len() - succeeded;
        let (calls, tokens, cost) = reports
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .fold((0, 0, 0.0), |(calls, tokens, cost), o| {
                (
                    calls + o.usage.api_calls,
                    tokens + o.usage.total_tokens,
                    cost + o.usage.total_cost_usd,
                )
            });

        let status = if failed == 0 {
            format!("{} succeeded", succeeded).green().bold()
        } else {
            format!("{} succeeded, {} failed", succeeded, failed).yellow().bold()
        };
        format!(
            "{}\n{} {}\n{} {} calls, {} tokens, ${:.4}\n",
            "=".repeat(60).cyan(),
            "Total:".bold(),
            status,
            "Usage:".dimmed(),
            calls,
            tokens,
            cost
        )
    }

    /// Format as a JSON array, one element per question
    pub fn format_json(reports: &[QuestionReport]) -> String {
        let values: Vec<Value> = reports.iter().map(report_json).collect();
        serde_json::to_string_pretty(&values).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format successful payloads as a JSON object keyed by question id
    pub fn format_payloads(reports: &[QuestionReport]) -> String {
        let mut payloads = Map::new();
        for report in reports {
            if let Ok(outcome) = &report.result
                && let Ok(value) = serde_json::to_value(&outcome.payload)
            {
                payloads.insert(report.question_id.to_string(), value);
            }
        }
        serde_json::to_string_pretty(&Value::Object(payloads)).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(question_id: QuestionId, title: &str) -> String {
        format!(
            "{}\n{} {}",
            "-".repeat(60).cyan(),
            format!("[{}]", question_id).yellow().bold(),
            title.bold()
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_summary(&self, reports: &[QuestionReport]) -> String {
        Self::format_summary(reports)
    }

    fn format_json(&self, reports: &[QuestionReport]) -> String {
        Self::format_json(reports)
    }

    fn format_payloads(&self, reports: &[QuestionReport]) -> String {
        Self::format_payloads(reports)
    }
}

fn report_json(report: &QuestionReport) -> Value {
    let mut value = match &report.result {
        Ok(outcome) => serde_json::to_value(outcome).unwrap_or(Value::Null),
        Err(e) => json!({
            "question_id": report.question_id,
            "title": report.title,
            "error": e.to_string(),
        }),
    };
    if let (Some(submission), Value::Object(map)) = (&report.submission, &mut value) {
        let submitted = match submission {
            Ok(()) => json!({ "accepted": true }),
            Err(e) => json!({ "accepted": false, "error": e.to_string() }),
        };
        map.insert("submission".to_string(), submitted);
    }
    value
}

/// Smallest grid position whose cumulative probability reaches `q`
fn cdf_quantile(cdf: &Cdf, q: f64) -> Option<f64> {
    cdf.points().iter().find(|p| p.y >= q).map(|p| p.x)
}

/// Four significant digits
fn round_sig(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(3 - x.abs().log10().floor() as i32);
    (x * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forecast_application::{
        CompletionRequest, ForecastParams, ForecastQuestionInput, ForecastQuestionUseCase,
        GatewayError, LlmGateway, NoResearch, SubmissionError,
    };
    use forecast_domain::{Model, NumericRange, QuestionSpec};
    use std::sync::Arc;

    /// Returns the run's scripted text, or fails when the slot is `None`
    struct ScriptedGateway(Vec<Option<&'static str>>);

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(
            &self,
            _model: &Model,
            request: &CompletionRequest,
        ) -> Result<String, GatewayError> {
            self.0
                .get(request.run_index)
                .copied()
                .flatten()
                .map(str::to_string)
                .ok_or_else(|| GatewayError::RequestFailed("scripted failure".to_string()))
        }
    }

    async fn report(question: QuestionSpec, script: Vec<Option<&'static str>>) -> QuestionReport {
        let runs = script.len();
        let use_case =
            ForecastQuestionUseCase::new(Arc::new(ScriptedGateway(script)), Arc::new(NoResearch));
        let result = use_case
            .execute(ForecastQuestionInput::new(
                question.clone(),
                ForecastParams::default().with_runs_per_question(runs),
            ))
            .await;
        QuestionReport {
            question_id: question.id,
            title: question.title,
            result,
            submission: None,
        }
    }

    // ==================== Summary Tests ====================

    #[tokio::test]
    async fn test_summary_binary() {
        colored::control::set_override(false);
        let report = report(
            QuestionSpec::binary(7, "Will it rain?"),
            vec![Some("Probability: 30%"), None, Some("Probability: 50%")],
        )
        .await;

        let text = ConsoleFormatter::format_report(&report);
        assert!(text.contains("[7] Will it rain?"));
        assert!(text.contains("2/3 runs validated"));
        assert!(text.contains("v run 0: 30.0%"));
        assert!(text.contains("x run 1:"));
        assert!(text.contains("Consensus: 40.0%"));
    }

    #[tokio::test]
    async fn test_summary_failure_lists_runs() {
        colored::control::set_override(false);
        let report = report(
            QuestionSpec::binary(8, "Will it snow?"),
            vec![Some("no idea"), None],
        )
        .await;
        assert!(matches!(
            report.result,
            Err(ForecastQuestionError::AllRunsFailed { .. })
        ));

        let text = ConsoleFormatter::format_summary(std::slice::from_ref(&report));
        assert!(text.contains("Failed: All 2 runs failed"));
        assert!(text.contains("x run 0:"));
        assert!(text.contains("0 succeeded, 1 failed"));
    }

    #[tokio::test]
    async fn test_summary_multiple_choice_and_submission() {
        colored::control::set_override(false);
        let mut report = report(
            QuestionSpec::multiple_choice(3, "Which colour?", ["Red", "Blue"]),
            vec![Some("Red: 60%\nBlue: 40%")],
        )
        .await;
        report.submission = Some(Err(SubmissionError::Failed("offline".to_string())));

        let text = ConsoleFormatter::format_report(&report);
        assert!(text.contains("Consensus: Red: 60.0%, Blue: 40.0%"));
        assert!(text.contains("Submission: Submission failed: offline"));
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_consensus_line_numeric() {
        let report = report(
            QuestionSpec::numeric(4, "How many?", NumericRange::closed(0.0, 100.0)),
            vec![Some(
                "Percentile 10: 10\nPercentile 20: 20\nPercentile 40: 40\n\
                 Percentile 60: 60\nPercentile 80: 80\nPercentile 90: 90",
            )],
        )
        .await;
        let outcome = report.result.as_ref().unwrap();
        let line = ConsoleFormatter::consensus_line(&outcome.consensus);
        assert!(line.starts_with("P10 ~ 10"), "{line}");
        assert!(line.contains("P50 ~ 50"), "{line}");
        assert!(line.contains("P90 ~ 90"), "{line}");
    }

    // ==================== Machine Output Tests ====================

    #[tokio::test]
    async fn test_json_and_payload_output() {
        let ok = report(QuestionSpec::binary(1, "yes?"), vec![Some("Probability: 25%")]).await;
        let failed = report(QuestionSpec::binary(2, "no?"), vec![None]).await;
        let reports = vec![ok, failed];

        let json: Value = serde_json::from_str(&ConsoleFormatter::format_json(&reports)).unwrap();
        assert_eq!(json[0]["question_id"], 1);
        assert_eq!(json[0]["payload"]["probability"], 0.25);
        assert_eq!(json[1]["question_id"], 2);
        assert!(json[1]["error"].as_str().unwrap().contains("failed"));

        let payloads: Value =
            serde_json::from_str(&ConsoleFormatter.render(forecast_domain::OutputFormat::Payload, &reports))
                .unwrap();
        assert_eq!(payloads, json!({ "1": { "probability": 0.25 } }));
    }

    #[test]
    fn test_round_sig() {
        assert_eq!(round_sig(12345.678), 12350.0);
        assert_eq!(round_sig(0.0012344), 0.001234);
        assert_eq!(round_sig(0.0), 0.0);
    }
}
