//! Core domain concepts shared across all subdomains.
//!
//! - [`question::QuestionSpec`]: the authoritative description of a platform question
//! - [`model::Model`]: LLMs used for elicitation, with pricing
//! - [`error`]: one error enum per engine stage

pub mod error;
pub mod model;
pub mod question;
