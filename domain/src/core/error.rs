//! Engine error types
//!
//! One enum per pipeline stage. Parse, validation and distribution errors
//! describe input quality and exclude a single run; aggregation and
//! serialization errors are contract violations and are fatal for the
//! question.

use super::question::QuestionType;
use thiserror::Error;

/// No usable signal could be extracted from a response
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("No labelled probability found in response")]
    NoProbability,

    #[error("No percentile values found in response")]
    NoPercentiles,

    #[error("No option weights found in response")]
    NoOptionWeights,

    #[error("Question has no options to match")]
    NoOptions,
}

/// The percentile table cannot be turned into a distribution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    #[error("Need at least 2 usable percentiles, found {found}")]
    InsufficientPercentiles { found: usize },

    #[error("Invalid bounds: lower {lower} must be below upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("Invalid resolution: {0} points")]
    InvalidResolution(usize),
}

/// A parsed answer cannot be repaired into a legal value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Probability {0} is not usable")]
    UnusableProbability(f64),

    #[error("All option weights are zero")]
    AllWeightsZero,

    #[error("Weight for option '{option}' is not finite")]
    NonFiniteWeight { option: String },

    #[error("Answer shape {answer} does not match question type {question}")]
    ShapeMismatch {
        answer: &'static str,
        question: QuestionType,
    },

    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),
}

/// Why a single run produced no validated answer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("Parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// The run set cannot be combined
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("No validated runs to aggregate")]
    EmptyRuns,

    #[error("Run {index} has shape {found}, expected {expected}")]
    ShapeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Run {index} was sampled on a different grid")]
    GridMismatch { index: usize },

    #[error("Run {index} has different options")]
    OptionMismatch { index: usize },
}

/// The consensus violates a payload invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializationError {
    #[error("Consensus shape {answer} does not match question type {question}")]
    ShapeMismatch {
        answer: &'static str,
        question: QuestionType,
    },

    #[error("Probability {0} outside [0.01, 0.99]")]
    ProbabilityOutOfRange(f64),

    #[error("CDF has {found} points, expected {expected}")]
    CdfLength { expected: usize, found: usize },

    #[error("CDF is not a valid distribution: {0}")]
    InvalidCdf(String),

    #[error("Expected {expected} options, found {found}")]
    OptionCount { expected: usize, found: usize },

    #[error("Option '{found}' does not match question option '{expected}'")]
    OptionLabel { expected: String, found: String },

    #[error("Option probabilities sum to {0}")]
    ProbabilityMass(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_wraps_into_validation() {
        let err: ValidationError = DistributionError::InsufficientPercentiles { found: 1 }.into();
        assert!(matches!(err, ValidationError::Distribution(_)));
        assert_eq!(
            err.to_string(),
            "Distribution error: Need at least 2 usable percentiles, found 1"
        );
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = ValidationError::ShapeMismatch {
            answer: "binary",
            question: QuestionType::MultipleChoice,
        };
        assert_eq!(
            err.to_string(),
            "Answer shape binary does not match question type multiple_choice"
        );
    }
}
