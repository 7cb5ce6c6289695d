//! Response parsing for forecast runs.
//!
//! These functions extract candidate answers from free-form LLM responses.
//! They are pure domain logic with no I/O.
//!
//! Parsing is lenient: a run only fails here when the text carries no
//! usable signal at all. Out-of-range or incomplete values pass through to
//! the validator, which owns the repair policy.
//!
//! # Functions
//!
//! | Function | Question type | Looks for |
//! |----------|---------------|-----------|
//! | [`parse_probability`] | Binary | last `Probability: NN%` |
//! | [`parse_percentiles`] | Numeric / Discrete | `Percentile 10: X` lines |
//! | [`parse_option_weights`] | Multiple choice | `Option: W` lines |

use super::answer::{OptionWeights, ParsedAnswer, Percentile, PercentileTable, RawResponse};
use crate::core::error::ParseError;
use crate::core::question::QuestionKind;
use regex::Regex;
use std::sync::LazyLock;

static PROBABILITY_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)probability(?:\s+of\s+yes)?\W{0,8}?(-?\d+(?:\.\d+)?)")
        .expect("probability pattern is valid")
});

static PERCENTILE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:percentile\s*(\d{1,2})|(\d{1,2})(?:st|nd|rd|th)?\s*percentile|p(\d{1,2}))\b",
    )
    .expect("percentile pattern is valid")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d[\d,]*(?:\.\d+)?(?:[eE][+-]?\d+)?|-?\.\d+").expect("number pattern is valid")
});

/// Parse one response according to its question's type.
///
/// # Examples
///
/// ```
/// use forecast_domain::{ParsedAnswer, QuestionSpec, RawResponse, parse_response};
///
/// let question = QuestionSpec::binary(1, "Will it rain tomorrow?");
/// let raw = RawResponse::new(&question, "Rain is likely.\nProbability: 70%");
/// assert_eq!(parse_response(&raw), Ok(ParsedAnswer::Binary(0.7)));
/// ```
pub fn parse_response(raw: &RawResponse<'_>) -> Result<ParsedAnswer, ParseError> {
    match &raw.question.kind {
        QuestionKind::Binary => parse_probability(&raw.text).map(ParsedAnswer::Binary),
        QuestionKind::Numeric { .. } | QuestionKind::Discrete { .. } => {
            parse_percentiles(&raw.text).map(ParsedAnswer::Numeric)
        }
        QuestionKind::MultipleChoice { options } => {
            parse_option_weights(&raw.text, options).map(ParsedAnswer::MultipleChoice)
        }
    }
}

/// Extract the last labelled percentage as a fraction.
///
/// `"Probability: 83%"` yields `0.83`. Values outside 0–100 are returned
/// as-is (scaled); the validator rejects them.
pub fn parse_probability(text: &str) -> Result<f64, ParseError> {
    PROBABILITY_LABEL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .last()
        .map(|pct| pct / 100.0)
        .ok_or(ParseError::NoProbability)
}

/// Extract labelled percentile values, line by line.
///
/// Recognized labels: `Percentile 10`, `10th percentile`, `P10`. The first
/// number after the label is its value; thousands separators are ignored.
/// Only zero matches is an error: tables with a single percentile are
/// returned and rejected by the distribution builder.
pub fn parse_percentiles(text: &str) -> Result<PercentileTable, ParseError> {
    let mut table = PercentileTable::new();

    for line in text.lines() {
        for caps in PERCENTILE_LABEL.captures_iter(line) {
            let Some(label) = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .and_then(|m| m.as_str().parse::<u8>().ok())
            else {
                continue;
            };
            let Some(percentile) = Percentile::from_label(label) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if let Some(value) = first_number(&line[whole.end()..]) {
                table.push(percentile, value);
            }
        }
    }

    if table.is_empty() {
        Err(ParseError::NoPercentiles)
    } else {
        Ok(table)
    }
}

/// Extract a raw weight for every option, in option order.
///
/// Unmatched options get weight 0. When several lines mention an option,
/// the last line carrying a number wins.
pub fn parse_option_weights(text: &str, options: &[String]) -> Result<OptionWeights, ParseError> {
    if options.is_empty() {
        return Err(ParseError::NoOptions);
    }

    let needles: Vec<String> = options
        .iter()
        .map(|o| o.trim().to_ascii_lowercase())
        .collect();
    let mut weights: Vec<Option<f64>> = vec![None; options.len()];

    for line in text.lines() {
        let haystack = line.to_ascii_lowercase();
        for (i, needle) in needles.iter().enumerate() {
            if needle.is_empty() {
                continue;
            }
            let Some(end) = label_end(&haystack, needle, &needles) else {
                continue;
            };
            if let Some(value) = first_number(&line[end..]) {
                weights[i] = Some(value);
            }
        }
    }

    if weights.iter().all(Option::is_none) {
        return Err(ParseError::NoOptionWeights);
    }

    Ok(OptionWeights::from_pairs(
        options
            .iter()
            .zip(weights)
            .map(|(label, w)| (label.clone(), w.unwrap_or(0.0))),
    ))
}

/// End offset of the first standalone occurrence of `needle` in `haystack`
/// that is not part of a longer option label at the same place.
fn label_end(haystack: &str, needle: &str, all: &[String]) -> Option<usize> {
    haystack
        .match_indices(needle)
        .map(|(start, m)| (start, start + m.len()))
        .filter(|&(start, end)| is_standalone(haystack, start, end))
        .find(|&(start, end)| {
            !all.iter().any(|other| {
                other.len() > needle.len()
                    && other.contains(needle)
                    && haystack
                        .match_indices(other.as_str())
                        .any(|(s, m)| s <= start && end <= s + m.len())
            })
        })
        .map(|(_, end)| end)
}

/// The match does not start or end inside a word
fn is_standalone(haystack: &str, start: usize, end: usize) -> bool {
    let bytes = haystack.as_bytes();
    let word = |b: u8| b.is_ascii_alphanumeric();
    let left_ok = start == 0 || !word(bytes[start]) || !word(bytes[start - 1]);
    let right_ok = end == bytes.len() || !word(bytes[end - 1]) || !word(bytes[end]);
    left_ok && right_ok
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER
        .find_iter(text)
        .find_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
}
