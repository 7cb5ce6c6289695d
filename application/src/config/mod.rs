//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`BehaviorConfig`]: per-call timeouts
//! - [`ForecastParams`]: model, runs per question and concurrency limits

pub mod behavior;
pub mod forecast_params;

pub use behavior::BehaviorConfig;
pub use forecast_params::ForecastParams;
