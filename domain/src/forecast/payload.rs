//! Platform submission payloads

use super::answer::{ConsensusAnswer, OptionProbabilities};
use super::validation::{MAX_BINARY_PROBABILITY, MIN_BINARY_PROBABILITY};
use crate::core::error::SerializationError;
use crate::core::question::{QuestionKind, QuestionSpec};
use serde::Serialize;

/// Allowed distance of the option mass from 1
pub const PROBABILITY_MASS_TOLERANCE: f64 = 1e-6;

/// The body the platform accepts for one question
///
/// Serializes without a tag:
/// - `{"probability": 0.83}`
/// - `{"cdf": [0.0, ..., 1.0]}`
/// - `{"option_probabilities": {"A": 0.6, "B": 0.4}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForecastPayload {
    Binary { probability: f64 },
    Continuous { cdf: Vec<f64> },
    MultipleChoice { option_probabilities: OptionProbabilities },
}

impl ForecastPayload {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Convert a consensus into the payload for its question
pub fn serialize_consensus(
    consensus: &ConsensusAnswer,
    question: &QuestionSpec,
) -> Result<ForecastPayload, SerializationError> {
    match (&question.kind, consensus) {
        (QuestionKind::Binary, ConsensusAnswer::Binary(p)) => {
            let probability = p.value();
            if !(MIN_BINARY_PROBABILITY..=MAX_BINARY_PROBABILITY).contains(&probability) {
                return Err(SerializationError::ProbabilityOutOfRange(probability));
            }
            Ok(ForecastPayload::Binary { probability })
        }
        (QuestionKind::Numeric { .. } | QuestionKind::Discrete { .. }, ConsensusAnswer::Numeric(cdf)) => {
            let expected = question.kind.cdf_size().unwrap_or_default();
            if cdf.len() != expected {
                return Err(SerializationError::CdfLength {
                    expected,
                    found: cdf.len(),
                });
            }
            cdf.check().map_err(SerializationError::InvalidCdf)?;
            Ok(ForecastPayload::Continuous { cdf: cdf.values() })
        }
        (QuestionKind::MultipleChoice { options }, ConsensusAnswer::MultipleChoice(probs)) => {
            if probs.len() != options.len() {
                return Err(SerializationError::OptionCount {
                    expected: options.len(),
                    found: probs.len(),
                });
            }
            if let Some((expected, found)) = options
                .iter()
                .zip(probs.labels())
                .find(|(expected, found)| expected.as_str() != *found)
            {
                return Err(SerializationError::OptionLabel {
                    expected: expected.clone(),
                    found: found.to_string(),
                });
            }
            let total = probs.total();
            if (total - 1.0).abs() > PROBABILITY_MASS_TOLERANCE {
                return Err(SerializationError::ProbabilityMass(total));
            }
            Ok(ForecastPayload::MultipleChoice {
                option_probabilities: probs.clone(),
            })
        }
        _ => Err(SerializationError::ShapeMismatch {
            answer: consensus.shape(),
            question: question.question_type(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question::NumericRange;
    use crate::forecast::answer::{Cdf, CdfPoint, Probability};

    fn ramp(n: usize) -> Cdf {
        let last = (n - 1) as f64;
        Cdf::from_points(
            (0..n)
                .map(|i| CdfPoint {
                    x: i as f64,
                    y: i as f64 / last,
                })
                .collect(),
        )
    }

    fn options(pairs: &[(&str, f64)]) -> ConsensusAnswer {
        ConsensusAnswer::MultipleChoice(OptionProbabilities::new_unchecked(
            pairs.iter().map(|(l, p)| (l.to_string(), *p)).collect(),
        ))
    }

    #[test]
    fn test_binary_payload() {
        let question = QuestionSpec::binary(1, "q");
        let payload =
            serialize_consensus(&ConsensusAnswer::Binary(Probability::new_unchecked(0.83)), &question)
                .unwrap();
        assert_eq!(payload.to_json().unwrap(), r#"{"probability":0.83}"#);
    }

    #[test]
    fn test_binary_out_of_range() {
        let question = QuestionSpec::binary(1, "q");
        let err = serialize_consensus(&ConsensusAnswer::Binary(Probability::new_unchecked(1.0)), &question)
            .unwrap_err();
        assert_eq!(err, SerializationError::ProbabilityOutOfRange(1.0));
    }

    #[test]
    fn test_continuous_payload_values_only() {
        let question = QuestionSpec::discrete(2, "q", NumericRange::closed(-0.5, 3.5), 4);
        let payload = serialize_consensus(&ConsensusAnswer::Numeric(ramp(5)), &question).unwrap();
        assert_eq!(payload.to_json().unwrap(), r#"{"cdf":[0.0,0.25,0.5,0.75,1.0]}"#);
    }

    #[test]
    fn test_continuous_wrong_length() {
        let question = QuestionSpec::numeric(2, "q", NumericRange::closed(0.0, 100.0));
        let err = serialize_consensus(&ConsensusAnswer::Numeric(ramp(5)), &question).unwrap_err();
        assert_eq!(
            err,
            SerializationError::CdfLength {
                expected: 201,
                found: 5
            }
        );
    }

    #[test]
    fn test_multiple_choice_payload_in_option_order() {
        let question = QuestionSpec::multiple_choice(3, "q", ["Zeta", "Alpha"]);
        let payload = serialize_consensus(&options(&[("Zeta", 0.75), ("Alpha", 0.25)]), &question).unwrap();
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"option_probabilities":{"Zeta":0.75,"Alpha":0.25}}"#
        );
    }

    #[test]
    fn test_multiple_choice_label_and_mass_checks() {
        let question = QuestionSpec::multiple_choice(3, "q", ["A", "B"]);
        assert!(matches!(
            serialize_consensus(&options(&[("B", 0.5), ("A", 0.5)]), &question),
            Err(SerializationError::OptionLabel { .. })
        ));
        assert!(matches!(
            serialize_consensus(&options(&[("A", 0.5), ("B", 0.4)]), &question),
            Err(SerializationError::ProbabilityMass(_))
        ));
        assert!(matches!(
            serialize_consensus(&options(&[("A", 1.0)]), &question),
            Err(SerializationError::OptionCount { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let question = QuestionSpec::binary(1, "q");
        let err = serialize_consensus(&options(&[("A", 1.0)]), &question).unwrap_err();
        assert!(matches!(err, SerializationError::ShapeMismatch { .. }));
    }
}
