//! Progress reporting for forecast execution

use colored::Colorize;
use forecast_application::ports::progress::ProgressNotifier;
use forecast_domain::{QuestionId, QuestionSpec};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports progress with one bar per question in flight
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<QuestionId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn question_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn prefix(question: &QuestionSpec) -> String {
        let mut title: String = question.title.chars().take(40).collect();
        if title.len() < question.title.len() {
            title.push_str("...");
        }
        format!("[{}] {}", question.id, title)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_question_start(&self, question: &QuestionSpec, total_runs: usize) {
        let pb = self.multi.add(ProgressBar::new(total_runs as u64));
        pb.set_style(Self::question_style());
        pb.set_prefix(Self::prefix(question));
        pb.set_message("Starting...");

        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(question.id, pb);
        }
    }

    fn on_run_complete(&self, question_id: QuestionId, run_index: usize, success: bool) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(&question_id)
        {
            let status = if success {
                format!("{} run {}", "v".green(), run_index)
            } else {
                format!("{} run {}", "x".red(), run_index)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_question_complete(&self, question_id: QuestionId, success: bool) {
        if let Ok(mut bars) = self.bars.lock()
            && let Some(pb) = bars.remove(&question_id)
        {
            if success {
                pb.finish_with_message(format!("{}", "done".green()));
            } else {
                pb.abandon_with_message(format!("{}", "failed".red()));
            }
        }
    }

    fn on_submission(&self, question_id: QuestionId, success: bool) {
        let status = if success {
            "submitted".green()
        } else {
            "submission failed".red()
        };
        let _ = self.multi.println(format!("[{}] {}", question_id, status));
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_question_start(&self, question: &QuestionSpec, total_runs: usize) {
        eprintln!(
            "{} {} ({} runs)",
            "->".cyan(),
            ProgressReporter::prefix(question).bold(),
            total_runs
        );
    }

    fn on_run_complete(&self, question_id: QuestionId, run_index: usize, success: bool) {
        if success {
            eprintln!("  {} [{}] run {}", "v".green(), question_id, run_index);
        } else {
            eprintln!("  {} [{}] run {} (failed)", "x".red(), question_id, run_index);
        }
    }

    fn on_question_complete(&self, question_id: QuestionId, success: bool) {
        if !success {
            eprintln!("  {} [{}] no consensus", "x".red(), question_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_truncates_long_titles() {
        let short = QuestionSpec::binary(1, "Short title");
        assert_eq!(ProgressReporter::prefix(&short), "[1] Short title");

        let long = QuestionSpec::binary(2, "x".repeat(60));
        assert_eq!(
            ProgressReporter::prefix(&long),
            format!("[2] {}...", "x".repeat(40))
        );
    }

    #[test]
    fn test_bars_are_tracked_per_question() {
        let reporter = ProgressReporter::new();
        reporter.multi.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        let question = QuestionSpec::binary(5, "q");

        reporter.on_question_start(&question, 3);
        reporter.on_run_complete(question.id, 0, true);
        reporter.on_run_complete(question.id, 1, false);
        {
            let bars = reporter.bars.lock().unwrap();
            assert_eq!(bars[&question.id].position(), 2);
        }

        reporter.on_question_complete(question.id, true);
        assert!(reporter.bars.lock().unwrap().is_empty());
        // Unknown questions are ignored
        reporter.on_run_complete(QuestionId(99), 0, true);
    }
}
