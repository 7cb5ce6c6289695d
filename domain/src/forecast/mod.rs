//! Forecast extraction and aggregation engine
//!
//! One question at a time:
//!
//! ```text
//! raw texts ─▶ parse ─▶ validate ─▶ aggregate ─▶ serialize ─▶ payload
//! ```
//!
//! Every stage is synchronous and touches only its own question's data.

pub mod aggregation;
pub mod answer;
pub mod distribution;
pub mod parsing;
pub mod payload;
pub mod validation;

use crate::core::error::RunError;
use answer::{RawResponse, ValidatedAnswer};

/// Parse and validate one response.
///
/// A failure here excludes the run from its question but never aborts the
/// question.
pub fn extract(raw: &RawResponse<'_>) -> Result<ValidatedAnswer, RunError> {
    let parsed = parsing::parse_response(raw)?;
    Ok(validation::validate_answer(raw.question, &parsed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{DistributionError, ValidationError};
    use crate::core::question::{NumericRange, QuestionSpec};

    #[test]
    fn test_extract_binary() {
        let question = QuestionSpec::binary(1, "q");
        let answer = extract(&RawResponse::new(&question, "Probability: 100%")).unwrap();
        assert_eq!(answer.summary(), "99.0%");
    }

    #[test]
    fn test_extract_single_percentile_is_run_error() {
        let question = QuestionSpec::numeric(2, "q", NumericRange::closed(0.0, 100.0));
        let err = extract(&RawResponse::new(&question, "Percentile 40: 12")).unwrap_err();
        assert_eq!(
            err,
            RunError::Validation(ValidationError::Distribution(
                DistributionError::InsufficientPercentiles { found: 1 }
            ))
        );
    }

    #[test]
    fn test_extract_no_signal_is_parse_error() {
        let question = QuestionSpec::binary(1, "q");
        let err = extract(&RawResponse::new(&question, "I cannot say.")).unwrap_err();
        assert!(matches!(err, RunError::Parse(_)));
    }
}
