//! Question value objects
//!
//! A [`QuestionSpec`] is the authoritative, immutable description of one
//! platform question: its identity, its [`QuestionType`] and the
//! type-specific parameters every engine stage needs (bounds, bucket count,
//! option labels).

use serde::{Deserialize, Serialize};

/// Number of CDF points the platform expects for a continuous numeric question.
pub const NUMERIC_CDF_SIZE: usize = 201;

/// Platform question identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four question shapes the platform supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Binary,
    Numeric,
    Discrete,
    MultipleChoice,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Binary => "binary",
            QuestionType::Numeric => "numeric",
            QuestionType::Discrete => "discrete",
            QuestionType::MultipleChoice => "multiple_choice",
        }
    }

    /// Numeric and discrete questions are both answered with a CDF
    pub fn is_continuous(&self) -> bool {
        matches!(self, QuestionType::Numeric | QuestionType::Discrete)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" => Ok(QuestionType::Binary),
            "numeric" => Ok(QuestionType::Numeric),
            "discrete" => Ok(QuestionType::Discrete),
            "multiple_choice" | "multiple-choice" => Ok(QuestionType::MultipleChoice),
            other => Err(format!(
                "Unknown question type: {}. Valid: binary, numeric, discrete, multiple_choice",
                other
            )),
        }
    }
}

/// Range of a numeric or discrete question.
///
/// An open side means the true outcome may fall outside the range, so the
/// CDF is allowed to keep some mass beyond that bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub lower: f64,
    pub upper: f64,
    #[serde(default)]
    pub open_lower: bool,
    #[serde(default)]
    pub open_upper: bool,
    /// Zero point for log-scaled questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_point: Option<f64>,
}

impl NumericRange {
    /// Closed range on both sides with a linear scale
    pub fn closed(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            open_lower: false,
            open_upper: false,
            zero_point: None,
        }
    }

    pub fn with_open_lower(mut self, open: bool) -> Self {
        self.open_lower = open;
        self
    }

    pub fn with_open_upper(mut self, open: bool) -> Self {
        self.open_upper = open;
        self
    }

    pub fn with_zero_point(mut self, zero_point: Option<f64>) -> Self {
        self.zero_point = zero_point;
        self
    }

    /// Lower and upper are finite and strictly ordered
    pub fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper
    }

    /// Clamp a value against the closed sides of the range only
    pub fn clamp(&self, value: f64) -> f64 {
        let mut v = value;
        if !self.open_lower && v < self.lower {
            v = self.lower;
        }
        if !self.open_upper && v > self.upper {
            v = self.upper;
        }
        v
    }

    /// Log-scale ratio `(upper - z) / (lower - z)` when a usable zero point is set
    pub fn log_ratio(&self) -> Option<f64> {
        let z = self.zero_point?;
        let ratio = (self.upper - z) / (self.lower - z);
        (ratio.is_finite() && ratio > 0.0 && (ratio - 1.0).abs() > f64::EPSILON).then_some(ratio)
    }

    /// Map a grid location `t` in `[0, 1]` to a value in the range.
    pub fn location_to_value(&self, t: f64) -> f64 {
        let span = self.upper - self.lower;
        match self.log_ratio() {
            Some(r) => self.lower + span * (r.powf(t) - 1.0) / (r - 1.0),
            None => self.lower + span * t,
        }
    }
}

/// Type-specific parameters of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Binary,
    Numeric {
        range: NumericRange,
    },
    Discrete {
        range: NumericRange,
        /// Number of integer buckets inside the range
        outcome_count: usize,
    },
    MultipleChoice {
        /// Option labels; order is significant
        options: Vec<String>,
    },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Binary => QuestionType::Binary,
            QuestionKind::Numeric { .. } => QuestionType::Numeric,
            QuestionKind::Discrete { .. } => QuestionType::Discrete,
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
        }
    }

    pub fn range(&self) -> Option<&NumericRange> {
        match self {
            QuestionKind::Numeric { range } | QuestionKind::Discrete { range, .. } => Some(range),
            QuestionKind::Binary | QuestionKind::MultipleChoice { .. } => None,
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionKind::MultipleChoice { options } => Some(options),
            _ => None,
        }
    }

    /// Number of CDF values the platform expects, for continuous kinds
    pub fn cdf_size(&self) -> Option<usize> {
        match self {
            QuestionKind::Numeric { .. } => Some(NUMERIC_CDF_SIZE),
            QuestionKind::Discrete { outcome_count, .. } => Some(outcome_count + 1),
            QuestionKind::Binary | QuestionKind::MultipleChoice { .. } => None,
        }
    }
}

/// Free-text material used only to build prompts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionContext {
    pub description: String,
    pub resolution_criteria: String,
    pub fine_print: String,
    pub unit: Option<String>,
}

/// A platform question (Value Object)
///
/// # Example
///
/// ```
/// use forecast_domain::{NumericRange, QuestionSpec, QuestionType};
///
/// let q = QuestionSpec::numeric(42, "Peak temperature?", NumericRange::closed(0.0, 50.0));
/// assert_eq!(q.question_type(), QuestionType::Numeric);
/// assert_eq!(q.kind.cdf_size(), Some(201));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: QuestionId,
    pub title: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub context: QuestionContext,
}

impl QuestionSpec {
    pub fn new(id: u64, title: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: QuestionId(id),
            title: title.into(),
            kind,
            context: QuestionContext::default(),
        }
    }

    pub fn binary(id: u64, title: impl Into<String>) -> Self {
        Self::new(id, title, QuestionKind::Binary)
    }

    pub fn numeric(id: u64, title: impl Into<String>, range: NumericRange) -> Self {
        Self::new(id, title, QuestionKind::Numeric { range })
    }

    pub fn discrete(
        id: u64,
        title: impl Into<String>,
        range: NumericRange,
        outcome_count: usize,
    ) -> Self {
        Self::new(
            id,
            title,
            QuestionKind::Discrete {
                range,
                outcome_count,
            },
        )
    }

    pub fn multiple_choice<S: Into<String>>(
        id: u64,
        title: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            title,
            QuestionKind::MultipleChoice {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn with_context(mut self, context: QuestionContext) -> Self {
        self.context = context;
        self
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }
}
