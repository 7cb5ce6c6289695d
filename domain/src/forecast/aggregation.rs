//! Run aggregation
//!
//! Combines the validated answers of repeated runs into one consensus.
//! Every rule is order-independent: only the set of runs matters.
//!
//! | Question type   | Rule                                         |
//! |-----------------|----------------------------------------------|
//! | Binary          | median probability                           |
//! | Numeric/Discrete| pointwise median of the CDFs                 |
//! | Multiple choice | per-option mean, renormalized                |

use super::answer::{Cdf, CdfPoint, ConsensusAnswer, OptionProbabilities, Probability, ValidatedAnswer};
use crate::core::error::AggregationError;

/// Median of a non-empty slice; even counts average the two middle values.
///
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Aggregate validated runs of one question.
///
/// All runs must have the same shape; numeric runs must share one grid and
/// multiple-choice runs one option list.
///
/// # Example
///
/// ```
/// use forecast_domain::{ConsensusAnswer, ParsedAnswer, QuestionSpec, aggregate, validate_answer};
///
/// let question = QuestionSpec::binary(1, "Will it rain?");
/// let runs: Vec<_> = [0.83, 0.91, 0.77]
///     .into_iter()
///     .map(|p| validate_answer(&question, &ParsedAnswer::Binary(p)).unwrap())
///     .collect();
///
/// let ConsensusAnswer::Binary(p) = aggregate(&runs).unwrap() else { unreachable!() };
/// assert_eq!(p.value(), 0.83);
/// ```
pub fn aggregate(runs: &[ValidatedAnswer]) -> Result<ConsensusAnswer, AggregationError> {
    let first = runs.first().ok_or(AggregationError::EmptyRuns)?;
    for (index, run) in runs.iter().enumerate() {
        if run.shape() != first.shape() {
            return Err(AggregationError::ShapeMismatch {
                index,
                expected: first.shape(),
                found: run.shape(),
            });
        }
    }

    match first {
        ValidatedAnswer::Binary(_) => aggregate_binary(runs),
        ValidatedAnswer::Numeric(_) => aggregate_numeric(runs),
        ValidatedAnswer::MultipleChoice(_) => aggregate_options(runs),
    }
}

fn aggregate_binary(runs: &[ValidatedAnswer]) -> Result<ConsensusAnswer, AggregationError> {
    let values: Vec<f64> = runs
        .iter()
        .filter_map(|run| match run {
            ValidatedAnswer::Binary(p) => Some(p.value()),
            _ => None,
        })
        .collect();
    let consensus = median(&values).ok_or(AggregationError::EmptyRuns)?;
    Ok(ConsensusAnswer::Binary(Probability::new_unchecked(consensus)))
}

fn aggregate_numeric(runs: &[ValidatedAnswer]) -> Result<ConsensusAnswer, AggregationError> {
    let cdfs: Vec<&Cdf> = runs
        .iter()
        .filter_map(|run| match run {
            ValidatedAnswer::Numeric(n) => Some(n.cdf()),
            _ => None,
        })
        .collect();
    let reference = cdfs.first().ok_or(AggregationError::EmptyRuns)?;

    for (index, cdf) in cdfs.iter().enumerate() {
        if !cdf.xs().eq(reference.xs()) {
            return Err(AggregationError::GridMismatch { index });
        }
    }

    let points = reference
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let ys: Vec<f64> = cdfs.iter().map(|cdf| cdf.points()[i].y).collect();
            CdfPoint {
                x: point.x,
                y: median(&ys).unwrap_or(point.y),
            }
        })
        .collect();
    Ok(ConsensusAnswer::Numeric(Cdf::from_points(points)))
}

fn aggregate_options(runs: &[ValidatedAnswer]) -> Result<ConsensusAnswer, AggregationError> {
    let sets: Vec<&OptionProbabilities> = runs
        .iter()
        .filter_map(|run| match run {
            ValidatedAnswer::MultipleChoice(o) => Some(o),
            _ => None,
        })
        .collect();
    let reference = sets.first().ok_or(AggregationError::EmptyRuns)?;

    for (index, set) in sets.iter().enumerate() {
        if !set.labels().eq(reference.labels()) {
            return Err(AggregationError::OptionMismatch { index });
        }
    }

    let n = sets.len() as f64;
    let mut means: Vec<f64> = (0..reference.len())
        .map(|i| {
            // Sorted before summing so the float result ignores run order
            let mut column: Vec<f64> = sets.iter().map(|set| set.entries()[i].1).collect();
            column.sort_by(|a, b| a.total_cmp(b));
            column.iter().sum::<f64>() / n
        })
        .collect();

    let total: f64 = means.iter().sum();
    if total > 0.0 {
        for m in &mut means {
            *m /= total;
        }
    }

    let entries = reference.labels().map(str::to_string).zip(means).collect();
    Ok(ConsensusAnswer::MultipleChoice(OptionProbabilities::new_unchecked(entries)))
}
