//! Prompt domain
//!
//! Per-question-type templates for the elicitation prompt.

mod template;

pub use template::{NO_RESEARCH, PromptTemplate};
