//! Infrastructure layer for forecast-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration and question file loading.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod questions;
pub mod replay;

// Re-export commonly used types
pub use adapters::{DryRunSubmitter, StaticResearch};
pub use config::{ConfigLoader, FileConfig, FileForecastConfig, FileOutputConfig, FileOutputFormat};
pub use logging::JsonlOutcomeLog;
pub use questions::{FileQuestion, FileScaling, QuestionLoadError, QuestionLoader};
pub use replay::{ReplayError, ReplayLlmGateway};
