//! Answer types flowing through the forecast pipeline
//!
//! ```text
//! RawResponse ──parse──▶ ParsedAnswer ──validate──▶ ValidatedAnswer ──aggregate──▶ ConsensusAnswer
//! ```
//!
//! [`ParsedAnswer`] is lenient: it holds whatever the parser found.
//! [`ValidatedAnswer`] and [`ConsensusAnswer`] wrap value types whose fields
//! are private to this crate, so they can only come out of the validator and
//! the aggregator.

use crate::core::question::QuestionSpec;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// The six percentiles a numeric answer is elicited at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Percentile {
    P10,
    P20,
    P40,
    P60,
    P80,
    P90,
}

impl Percentile {
    pub const ALL: [Percentile; 6] = [
        Percentile::P10,
        Percentile::P20,
        Percentile::P40,
        Percentile::P60,
        Percentile::P80,
        Percentile::P90,
    ];

    /// Cumulative probability at this percentile
    pub fn fraction(&self) -> f64 {
        f64::from(self.label()) / 100.0
    }

    /// The integer used in prompts and responses (10, 20, ...)
    pub fn label(&self) -> u8 {
        match self {
            Percentile::P10 => 10,
            Percentile::P20 => 20,
            Percentile::P40 => 40,
            Percentile::P60 => 60,
            Percentile::P80 => 80,
            Percentile::P90 => 90,
        }
    }

    pub fn from_label(label: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl std::fmt::Display for Percentile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.label())
    }
}

/// Sparse (percentile, value) pairs in the order they were found.
///
/// May be incomplete, out of order, or contain repeated percentiles; the
/// distribution builder resolves all of that.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PercentileTable {
    entries: Vec<(Percentile, f64)>,
}

impl PercentileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Percentile, f64)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    pub fn push(&mut self, percentile: Percentile, value: f64) {
        self.entries.push((percentile, value));
    }

    pub fn entries(&self) -> &[(Percentile, f64)] {
        &self.entries
    }

    /// Latest value recorded for a percentile
    pub fn get(&self, percentile: Percentile) -> Option<f64> {
        self.entries
            .iter()
            .rev()
            .find(|(p, _)| *p == percentile)
            .map(|(_, v)| *v)
    }

    /// Deduplicated view, last write wins, sorted by percentile
    pub fn dedup(&self) -> BTreeMap<Percentile, f64> {
        self.entries.iter().copied().collect()
    }

    pub fn distinct_count(&self) -> usize {
        self.dedup().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw per-option weights in question option order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionWeights {
    entries: Vec<(String, f64)>,
}

impl OptionWeights {
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            entries: pairs.into_iter().map(|(l, w)| (l.into(), w)).collect(),
        }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, w)| *w)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One LLM text output together with the question it answers
#[derive(Debug, Clone)]
pub struct RawResponse<'q> {
    pub question: &'q QuestionSpec,
    pub text: String,
}

impl<'q> RawResponse<'q> {
    pub fn new(question: &'q QuestionSpec, text: impl Into<String>) -> Self {
        Self {
            question,
            text: text.into(),
        }
    }
}

/// Candidate answer extracted from one response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedAnswer {
    /// Probability as a fraction; may lie outside [0, 1]
    Binary(f64),
    /// Shared by numeric and discrete questions
    Numeric(PercentileTable),
    MultipleChoice(OptionWeights),
}

impl ParsedAnswer {
    pub fn shape(&self) -> &'static str {
        match self {
            ParsedAnswer::Binary(_) => "binary",
            ParsedAnswer::Numeric(_) => "numeric",
            ParsedAnswer::MultipleChoice(_) => "multiple_choice",
        }
    }
}

/// A binary probability inside the platform range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    pub(crate) fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// A point on a cumulative distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdfPoint {
    pub x: f64,
    pub y: f64,
}

/// A CDF sampled on a fixed grid, non-decreasing in x and y
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cdf {
    points: Vec<CdfPoint>,
}

impl Cdf {
    pub(crate) fn from_points(points: Vec<CdfPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[CdfPoint] {
        &self.points
    }

    /// Cumulative values only, the way the platform receives them
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cumulative probability at grid position `x`, if `x` is on the grid
    pub fn y_at(&self, x: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| (p.x - x).abs() <= f64::EPSILON * x.abs().max(1.0))
            .map(|p| p.y)
    }

    /// Checks the CDF shape invariants
    pub fn check(&self) -> Result<(), String> {
        let Some(first) = self.points.first() else {
            return Err("empty CDF".to_string());
        };
        if !(first.y >= 0.0) {
            return Err(format!("first value {} below 0", first.y));
        }
        for (i, pair) in self.points.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if !(b.x >= a.x) {
                return Err(format!("x decreases at index {}", i + 1));
            }
            if !(b.y >= a.y) {
                return Err(format!("y decreases at index {}", i + 1));
            }
        }
        let last = self.points[self.points.len() - 1];
        if !(last.y <= 1.0) {
            return Err(format!("last value {} above 1", last.y));
        }
        Ok(())
    }
}

/// Repaired percentile table plus the CDF built from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericForecast {
    table: PercentileTable,
    cdf: Cdf,
}

impl NumericForecast {
    pub(crate) fn new(table: PercentileTable, cdf: Cdf) -> Self {
        Self { table, cdf }
    }

    /// Complete, monotonic table with all six percentiles
    pub fn table(&self) -> &PercentileTable {
        &self.table
    }

    pub fn cdf(&self) -> &Cdf {
        &self.cdf
    }
}

/// Normalized option probabilities in question option order
#[derive(Debug, Clone, PartialEq)]
pub struct OptionProbabilities {
    entries: Vec<(String, f64)>,
}

impl OptionProbabilities {
    pub(crate) fn new_unchecked(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialized as a JSON object keyed by label, in option order
impl Serialize for OptionProbabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, p) in &self.entries {
            map.serialize_entry(label, p)?;
        }
        map.end()
    }
}

/// A parsed answer that satisfies every platform invariant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatedAnswer {
    Binary(Probability),
    Numeric(NumericForecast),
    MultipleChoice(OptionProbabilities),
}

impl ValidatedAnswer {
    pub fn shape(&self) -> &'static str {
        match self {
            ValidatedAnswer::Binary(_) => "binary",
            ValidatedAnswer::Numeric(_) => "numeric",
            ValidatedAnswer::MultipleChoice(_) => "multiple_choice",
        }
    }

    /// Short human-readable form for logs and reports
    pub fn summary(&self) -> String {
        match self {
            ValidatedAnswer::Binary(p) => format!("{:.1}%", p.value() * 100.0),
            ValidatedAnswer::Numeric(n) => n
                .table()
                .dedup()
                .iter()
                .map(|(p, v)| format!("{}={}", p, v))
                .collect::<Vec<_>>()
                .join(" "),
            ValidatedAnswer::MultipleChoice(o) => o
                .entries()
                .iter()
                .map(|(l, p)| format!("{}={:.3}", l, p))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Back to a parsed answer, for re-validation
impl From<&ValidatedAnswer> for ParsedAnswer {
    fn from(answer: &ValidatedAnswer) -> Self {
        match answer {
            ValidatedAnswer::Binary(p) => ParsedAnswer::Binary(p.value()),
            ValidatedAnswer::Numeric(n) => ParsedAnswer::Numeric(n.table().clone()),
            ValidatedAnswer::MultipleChoice(o) => {
                ParsedAnswer::MultipleChoice(OptionWeights::from_pairs(o.entries().iter().cloned()))
            }
        }
    }
}

/// The single forecast combined from all validated runs of a question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusAnswer {
    Binary(Probability),
    Numeric(Cdf),
    MultipleChoice(OptionProbabilities),
}

impl ConsensusAnswer {
    pub fn shape(&self) -> &'static str {
        match self {
            ConsensusAnswer::Binary(_) => "binary",
            ConsensusAnswer::Numeric(_) => "numeric",
            ConsensusAnswer::MultipleChoice(_) => "multiple_choice",
        }
    }
}
