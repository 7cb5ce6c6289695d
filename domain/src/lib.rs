//! Domain layer for forecast-quorum
//!
//! This crate contains the forecast extraction and aggregation engine.
//! It has no dependencies on infrastructure or presentation concerns,
//! performs no I/O and does not log.
//!
//! # Core Concepts
//!
//! ## Question
//!
//! A [`QuestionSpec`] is the authoritative description of one platform
//! question: binary, numeric, discrete or multiple choice.
//!
//! ## Engine
//!
//! Each LLM response for a question goes through the same stages:
//!
//! - **Parse**: lenient extraction of a candidate answer ([`parse_response`])
//! - **Validate**: repair into platform-legal values ([`validate_answer`])
//! - **Aggregate**: combine repeated runs into a consensus ([`aggregate`])
//! - **Serialize**: produce the submission body ([`serialize_consensus`])
//!
//! A run that fails to parse or validate is dropped; the question still
//! gets a consensus as long as one run survives.

pub mod config;
pub mod core;
pub mod forecast;
pub mod prompt;
pub mod usage;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::{
        AggregationError, DistributionError, ParseError, RunError, SerializationError,
        ValidationError,
    },
    model::{Model, ModelPricing},
    question::{
        NUMERIC_CDF_SIZE, NumericRange, QuestionContext, QuestionId, QuestionKind, QuestionSpec,
        QuestionType,
    },
};
pub use forecast::{
    aggregation::{aggregate, median},
    answer::{
        Cdf, CdfPoint, ConsensusAnswer, NumericForecast, OptionProbabilities, OptionWeights,
        ParsedAnswer, Percentile, PercentileTable, Probability, RawResponse, ValidatedAnswer,
    },
    distribution::{DistributionBuilder, OPEN_BOUND_TAIL},
    extract,
    parsing::{parse_option_weights, parse_percentiles, parse_probability, parse_response},
    payload::{ForecastPayload, serialize_consensus},
    validation::{
        MAX_BINARY_PROBABILITY, MIN_BINARY_PROBABILITY, OPTION_PROBABILITY_FLOOR, validate_answer,
    },
};
pub use prompt::{NO_RESEARCH, PromptTemplate};
pub use usage::{TokenUsage, UsageSummary, estimate_tokens};
