//! Granske - AI Research Assistant
//!
//! A CLI tool and HTTP service for running research queries through a
//! tool-calling LLM agent.
//!
//! The name "Granske" comes from the Norwegian word for "investigate."
//!
//! # Overview
//!
//! Granske allows you to:
//! - Run a research query through an LLM agent with web search and
//!   encyclopedia lookup tools
//! - Get answers as a structured record (topic, summary, sources, tools used)
//! - Serve the same pipeline over HTTP (`POST /research`)
//! - Save research results to a local text file
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `agent` - Tool-calling agent loop and tool adapters
//! - `research` - Structured research response and its strict parser
//! - `cli` - Command implementations (ask, serve, client, config)
//!
//! # Example
//!
//! ```rust,no_run
//! use granske::agent::{Agent, ToolContext};
//! use granske::config::Settings;
//! use granske::research::ResearchResponse;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let agent = Agent::new(ToolContext::new(settings.save_path()), &settings.agent.model);
//!
//!     let run = agent.run("Latest advancements in quantum computing").await?;
//!     let response = ResearchResponse::parse(&run.content)?;
//!     println!("{}", response.topic);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod research;

pub use error::{GranskeError, Result};
