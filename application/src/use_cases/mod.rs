//! Use cases
//!
//! - [`forecast_question`]: N runs for one question into one consensus
//! - [`forecast_batch`]: many questions, optional submission

pub mod forecast_batch;
pub mod forecast_question;
