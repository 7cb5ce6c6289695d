//! Prompt templates for forecast elicitation
//!
//! Each template ends with the answer format the response parser reads, so
//! the two must change together.

use crate::core::question::{NumericRange, QuestionKind, QuestionSpec};

/// Placeholder used when no research could be gathered
pub const NO_RESEARCH: &str = "No research available.";

/// Templates for generating prompts for each question type
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt shared by every question type
    pub fn system() -> &'static str {
        r#"You are a professional forecaster interviewing for a job.
You reason carefully about base rates, the time left until resolution, and the status quo.
Good forecasters put extra weight on the status quo outcome since the world changes slowly.
Always finish with your answer in exactly the format requested."#
    }

    /// User prompt for any question, dispatched on its type
    pub fn for_question(question: &QuestionSpec, research: &str, today: &str) -> String {
        match &question.kind {
            QuestionKind::Binary => Self::binary(question, research, today),
            QuestionKind::Numeric { range } | QuestionKind::Discrete { range, .. } => {
                Self::numeric(question, range, research, today)
            }
            QuestionKind::MultipleChoice { options } => {
                Self::multiple_choice(question, options, research, today)
            }
        }
    }

    pub fn binary(question: &QuestionSpec, research: &str, today: &str) -> String {
        format!(
            r#"{header}
Before answering you write:
(a) The time left until the outcome to the question is known.
(b) The status quo outcome if nothing changed.
(c) A brief description of a scenario that results in a No outcome.
(d) A brief description of a scenario that results in a Yes outcome.

The last thing you write is your final answer as: "Probability: ZZ%", 0-100"#,
            header = Self::header(question, research, today),
        )
    }

    pub fn numeric(
        question: &QuestionSpec,
        range: &NumericRange,
        research: &str,
        today: &str,
    ) -> String {
        let unit = question
            .context
            .unit
            .as_deref()
            .unwrap_or("Not stated (please infer this)");
        format!(
            r#"{header}
Units for answer: {unit}

{lower}
{upper}

Formatting instructions:
- Please notice the units requested and give your answer in these units.
- Never use scientific notation.
- Always start with a smaller number (more negative if negative) and then increase from there.

Before answering you write:
(a) The time left until the outcome to the question is known.
(b) The outcome if nothing changed.
(c) The outcome if the current trend continued.
(d) The expectations of experts and markets.
(e) A brief description of an unexpected scenario that results in a low outcome.
(f) A brief description of an unexpected scenario that results in a high outcome.

You remind yourself that good forecasters are humble and set wide 90/10 confidence intervals to account for unknown unknowns.

The last thing you write is your final answer as:
"
Percentile 10: XX
Percentile 20: XX
Percentile 40: XX
Percentile 60: XX
Percentile 80: XX
Percentile 90: XX
""#,
            header = Self::header(question, research, today),
            unit = unit,
            lower = bound_message(range.lower, range.open_lower, "lower"),
            upper = bound_message(range.upper, range.open_upper, "higher"),
        )
    }

    pub fn multiple_choice(
        question: &QuestionSpec,
        options: &[String],
        research: &str,
        today: &str,
    ) -> String {
        let answer_lines = options
            .iter()
            .map(|o| format!("{}: Probability_{}", o, o))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"{header}
The options are: {options:?}

Before answering you write:
(a) The time left until the outcome to the question is known.
(b) The status quo outcome if nothing changed.
(c) A description of a scenario that results in an unexpected outcome.

You remind yourself that good forecasters leave some moderate probability on most options to account for unexpected outcomes.

The last thing you write is your final probabilities for the options in this order, as:
{answer_lines}"#,
            header = Self::header(question, research, today),
            options = options,
            answer_lines = answer_lines,
        )
    }

    fn header(question: &QuestionSpec, research: &str, today: &str) -> String {
        let research = if research.trim().is_empty() {
            NO_RESEARCH
        } else {
            research
        };
        format!(
            r#"Your interview question is:
{title}

Question background:
{description}

This question's outcome will be determined by the specific criteria below. These criteria have not yet been satisfied:
{criteria}

{fine_print}

Your research assistant says:
{research}

Today is {today}.
"#,
            title = question.title,
            description = question.context.description,
            criteria = question.context.resolution_criteria,
            fine_print = question.context.fine_print,
            research = research,
            today = today,
        )
    }
}

fn bound_message(value: f64, open: bool, side: &str) -> String {
    if open {
        format!("The question creator thinks the number is likely not {} than {}.", side, value)
    } else {
        format!("The outcome can not be {} than {}.", side, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question::QuestionContext;

    fn context() -> QuestionContext {
        QuestionContext {
            description: "Background text".to_string(),
            resolution_criteria: "Resolves Yes if it rains".to_string(),
            fine_print: String::new(),
            unit: Some("mm".to_string()),
        }
    }

    #[test]
    fn test_binary_prompt_format() {
        let question = QuestionSpec::binary(1, "Will it rain?").with_context(context());
        let prompt = PromptTemplate::for_question(&question, "Forecast: showers", "2026-10-14");
        assert!(prompt.contains("Will it rain?"));
        assert!(prompt.contains("Resolves Yes if it rains"));
        assert!(prompt.contains("Forecast: showers"));
        assert!(prompt.contains("Today is 2026-10-14."));
        assert!(prompt.ends_with("\"Probability: ZZ%\", 0-100"));
    }

    #[test]
    fn test_empty_research_uses_placeholder() {
        let question = QuestionSpec::binary(1, "Will it rain?");
        let prompt = PromptTemplate::binary(&question, "  ", "2026-10-14");
        assert!(prompt.contains(NO_RESEARCH));
    }

    #[test]
    fn test_numeric_prompt_bounds() {
        let range = NumericRange::closed(0.0, 500.0).with_open_upper(true);
        let question = QuestionSpec::numeric(2, "Rainfall?", range).with_context(context());
        let prompt = PromptTemplate::for_question(&question, "", "2026-10-14");
        assert!(prompt.contains("Units for answer: mm"));
        assert!(prompt.contains("The outcome can not be lower than 0."));
        assert!(prompt.contains("likely not higher than 500."));
        for p in [10, 20, 40, 60, 80, 90] {
            assert!(prompt.contains(&format!("Percentile {}: XX", p)));
        }
    }

    #[test]
    fn test_multiple_choice_prompt_lists_options_in_order() {
        let question = QuestionSpec::multiple_choice(3, "Who wins?", ["Red", "Blue"]);
        let prompt = PromptTemplate::for_question(&question, "", "2026-10-14");
        let red = prompt.find("Red: Probability_Red").unwrap();
        let blue = prompt.find("Blue: Probability_Blue").unwrap();
        assert!(red < blue);
    }
}
