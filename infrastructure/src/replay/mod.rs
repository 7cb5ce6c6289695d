//! Replay LLM gateway
//!
//! Serves recorded completions instead of calling a model. Used for offline
//! runs and for reproducing a past batch exactly.

mod gateway;

pub use gateway::{ReplayError, ReplayLlmGateway};
