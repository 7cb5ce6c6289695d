//! Offline implementations of the research and submission ports

mod research;
mod submission;

pub use research::StaticResearch;
pub use submission::DryRunSubmitter;
