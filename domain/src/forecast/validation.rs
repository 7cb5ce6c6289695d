//! Answer validation
//!
//! Repairs a [`ParsedAnswer`] into a value the platform accepts, or rejects
//! it when nothing usable is left. Validation is idempotent: feeding a
//! [`ValidatedAnswer`] back through [`validate_answer`] returns it unchanged.

use super::answer::{
    NumericForecast, OptionProbabilities, OptionWeights, ParsedAnswer, PercentileTable, Probability,
    ValidatedAnswer,
};
use super::distribution::DistributionBuilder;
use crate::core::error::ValidationError;
use crate::core::question::{QuestionKind, QuestionSpec};

/// Platform minimum for a binary probability
pub const MIN_BINARY_PROBABILITY: f64 = 0.01;

/// Platform maximum for a binary probability
pub const MAX_BINARY_PROBABILITY: f64 = 0.99;

/// Smallest probability a multiple-choice option may carry
pub const OPTION_PROBABILITY_FLOOR: f64 = 0.01;

/// Sums within this distance of 1 are left alone
const NORMALIZED_TOLERANCE: f64 = 1e-12;

/// Validate a parsed answer against its question.
///
/// # Example
///
/// ```
/// use forecast_domain::{ParsedAnswer, QuestionSpec, ValidatedAnswer, validate_answer};
///
/// let question = QuestionSpec::binary(1, "Will it rain?");
/// let validated = validate_answer(&question, &ParsedAnswer::Binary(1.0)).unwrap();
/// let ValidatedAnswer::Binary(p) = validated else { unreachable!() };
/// assert_eq!(p.value(), 0.99);
/// ```
pub fn validate_answer(
    question: &QuestionSpec,
    parsed: &ParsedAnswer,
) -> Result<ValidatedAnswer, ValidationError> {
    match (&question.kind, parsed) {
        (QuestionKind::Binary, ParsedAnswer::Binary(p)) => validate_probability(*p),
        (QuestionKind::Numeric { .. } | QuestionKind::Discrete { .. }, ParsedAnswer::Numeric(table)) => {
            validate_percentiles(&question.kind, table)
        }
        (QuestionKind::MultipleChoice { options }, ParsedAnswer::MultipleChoice(weights)) => {
            validate_weights(options, weights)
        }
        _ => Err(ValidationError::ShapeMismatch {
            answer: parsed.shape(),
            question: question.question_type(),
        }),
    }
}

fn validate_probability(p: f64) -> Result<ValidatedAnswer, ValidationError> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::UnusableProbability(p));
    }
    let clamped = p.clamp(MIN_BINARY_PROBABILITY, MAX_BINARY_PROBABILITY);
    Ok(ValidatedAnswer::Binary(Probability::new_unchecked(clamped)))
}

fn validate_percentiles(
    kind: &QuestionKind,
    table: &PercentileTable,
) -> Result<ValidatedAnswer, ValidationError> {
    let Some(builder) = DistributionBuilder::for_kind(kind) else {
        return Err(ValidationError::ShapeMismatch {
            answer: "numeric",
            question: kind.question_type(),
        });
    };
    let (complete, cdf) = builder.build(table)?;
    Ok(ValidatedAnswer::Numeric(NumericForecast::new(complete, cdf)))
}

fn validate_weights(
    options: &[String],
    weights: &OptionWeights,
) -> Result<ValidatedAnswer, ValidationError> {
    let mut values = Vec::with_capacity(options.len());
    for option in options {
        let w = weights.get(option).unwrap_or(0.0);
        if !w.is_finite() {
            return Err(ValidationError::NonFiniteWeight {
                option: option.clone(),
            });
        }
        values.push(w.max(0.0));
    }

    let sum: f64 = values.iter().sum();
    if sum <= 0.0 {
        return Err(ValidationError::AllWeightsZero);
    }
    normalize(&mut values, sum);

    if values.iter().any(|&v| v == 0.0) {
        for v in &mut values {
            if *v == 0.0 {
                *v = OPTION_PROBABILITY_FLOOR;
            }
        }
        let sum = values.iter().sum();
        normalize(&mut values, sum);
    }

    let entries = options.iter().cloned().zip(values).collect();
    Ok(ValidatedAnswer::MultipleChoice(OptionProbabilities::new_unchecked(entries)))
}

fn normalize(values: &mut [f64], sum: f64) {
    if (sum - 1.0).abs() <= NORMALIZED_TOLERANCE {
        return;
    }
    for v in values {
        *v /= sum;
    }
}
