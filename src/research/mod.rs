//! Structured research output.
//!
//! The agent's final answer is free text that must conform to a fixed
//! four-field record. This module owns that record and the strict parser
//! that is the single validation boundary of the pipeline.

mod response;

pub use response::{format_instructions, ResearchRequest, ResearchResponse};
