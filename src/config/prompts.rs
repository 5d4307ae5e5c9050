//! Prompt templates for the research agent.

use crate::research::format_instructions;
use serde::{Deserialize, Serialize};

/// Prompts for the research agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchPrompts {
    /// System prompt template. `{{format_instructions}}` is replaced with
    /// the output schema description at render time.
    pub system: String,
}

impl Default for ResearchPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a research assistant that will help generate research papers.
Answer the user query, using the available tools where they help:
- 'web_search' for current information and recent developments
- 'wiki_lookup' for background and established facts
- 'save_text' to persist findings worth keeping

After gathering what you need, produce your final answer. If the information
should be saved, use the 'save_text' tool before answering.

{{format_instructions}}"#
                .to_string(),
        }
    }
}

impl ResearchPrompts {
    /// Render the system prompt with the format instructions filled in.
    pub fn render_system(&self) -> String {
        self.system
            .replace("{{format_instructions}}", &format_instructions())
    }
}

/// Default research system prompt with format instructions embedded.
pub fn research_system_prompt() -> String {
    ResearchPrompts::default().render_system()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_embeds_format_instructions() {
        let rendered = research_system_prompt();
        assert!(!rendered.contains("{{format_instructions}}"));
        assert!(rendered.contains("\"topic\""));
        assert!(rendered.contains("\"tools_used\""));
    }

    #[test]
    fn test_render_mentions_all_tools() {
        let rendered = research_system_prompt();
        for tool in ["web_search", "wiki_lookup", "save_text"] {
            assert!(rendered.contains(tool));
        }
    }
}
