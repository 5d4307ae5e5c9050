//! Configuration module for Granske.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::research_system_prompt;
pub use settings::{AgentSettings, GeneralSettings, SaveSettings, ServerSettings, Settings};
