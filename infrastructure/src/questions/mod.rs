//! Question file loading
//!
//! Reads platform-style question JSON and validates it into [`QuestionSpec`]s.
//!
//! [`QuestionSpec`]: forecast_domain::QuestionSpec

mod loader;

pub use loader::{FileQuestion, FileScaling, QuestionLoadError, QuestionLoader};
