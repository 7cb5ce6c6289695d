//! Logging infrastructure: structured outcome logging.
//!
//! Provides [`JsonlOutcomeLog`], a JSONL file writer that keeps one record
//! per forecast question alongside the tracing output.

mod jsonl_logger;

pub use jsonl_logger::JsonlOutcomeLog;
