//! Output formatter trait

use forecast_application::QuestionReport;
use forecast_domain::OutputFormat;

/// Trait for formatting batch results
pub trait OutputFormatter {
    /// Human-readable block per question
    fn format_summary(&self, reports: &[QuestionReport]) -> String;

    /// Full outcome records as JSON
    fn format_json(&self, reports: &[QuestionReport]) -> String;

    /// Payloads only, keyed by question id
    fn format_payloads(&self, reports: &[QuestionReport]) -> String;

    fn render(&self, format: OutputFormat, reports: &[QuestionReport]) -> String {
        match format {
            OutputFormat::Summary => self.format_summary(reports),
            OutputFormat::Json => self.format_json(reports),
            OutputFormat::Payload => self.format_payloads(reports),
        }
    }
}
