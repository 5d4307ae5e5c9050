//! Research agent with tool calling.
//!
//! Provides an LLM agent that can search the web, look up encyclopedia
//! articles, and save findings to a local file while answering a research
//! query. The agent returns raw model text; schema validation lives in
//! the `research` module.

mod runner;
mod tools;

pub use runner::{Agent, AgentRun, ToolCallRecord};
pub use tools::{parse_tool_call, save_text_block, tool_definitions, ToolCall, ToolContext};
