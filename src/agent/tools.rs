//! Tool definitions and implementations for the research agent.

use crate::error::{GranskeError, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

/// MediaWiki API endpoint for encyclopedia lookups.
const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Maximum characters of an encyclopedia extract returned to the model.
const WIKI_EXTRACT_MAX_CHARS: usize = 1500;

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search the web via DuckDuckGo.
    WebSearch { query: String },

    /// Look up a topic on Wikipedia.
    WikiLookup { query: String },

    /// Append text to the local research output file.
    SaveText { text: String },
}

/// Tool execution context with the shared HTTP client and save path.
pub struct ToolContext {
    http: reqwest::Client,
    save_path: PathBuf,
}

impl ToolContext {
    /// Create a new tool context saving to the given file.
    pub fn new(save_path: PathBuf) -> Self {
        Self {
            http: reqwest::Client::new(),
            save_path,
        }
    }

    /// Path of the research output file.
    pub fn save_path(&self) -> &PathBuf {
        &self.save_path
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::WebSearch { query } => self.execute_web_search(query).await,
            ToolCall::WikiLookup { query } => self.execute_wiki_lookup(query).await,
            ToolCall::SaveText { text } => self.execute_save_text(text),
        }
    }

    async fn execute_web_search(&self, query: &str) -> Result<String> {
        let response = self
            .http
            .get(DDG_API_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GranskeError::Tool(format!(
                "Search API returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(format_search_results(query, &body))
    }

    async fn execute_wiki_lookup(&self, query: &str) -> Result<String> {
        let response = self
            .http
            .get(WIKIPEDIA_API_URL)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", query),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GranskeError::Tool(format!(
                "Wikipedia API returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(format_wiki_extract(query, &body))
    }

    fn execute_save_text(&self, text: &str) -> Result<String> {
        save_text_block(&self.save_path, text)?;
        Ok(format!("Data saved to {}", self.save_path.display()))
    }
}

/// Append a timestamped research block to the save file.
pub fn save_text_block(path: &PathBuf, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let block = format!("--- Research Output ---\nTimestamp: {}\n\n{}\n\n", timestamp, text);

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(block.as_bytes())?;

    Ok(())
}

/// Format the DuckDuckGo response into readable text for the model.
fn format_search_results(query: &str, data: &serde_json::Value) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(abstract_text) = data["AbstractText"].as_str() {
        if !abstract_text.is_empty() {
            let source = data["AbstractSource"].as_str().unwrap_or("Unknown");
            let url = data["AbstractURL"].as_str().unwrap_or("");
            sections.push(format!("{} (source: {}, {})", abstract_text, source, url));
        }
    }

    if let Some(answer) = data["Answer"].as_str() {
        if !answer.is_empty() {
            sections.push(format!("Answer: {}", answer));
        }
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        let items: Vec<String> = topics
            .iter()
            .filter_map(|t| {
                let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
                let url = t["FirstURL"].as_str().unwrap_or("");
                Some(format!("- {} ({})", text, url))
            })
            .take(5)
            .collect();

        if !items.is_empty() {
            sections.push(format!("Related:\n{}", items.join("\n")));
        }
    }

    if sections.is_empty() {
        return format!("No search results found for '{}'.", query);
    }

    sections.join("\n\n")
}

/// Pull the intro extract out of a MediaWiki query response.
fn format_wiki_extract(query: &str, data: &serde_json::Value) -> String {
    let extract = data["query"]["pages"]
        .as_object()
        .and_then(|pages| pages.values().next())
        .and_then(|page| page["extract"].as_str())
        .filter(|s| !s.is_empty());

    match extract {
        Some(text) => text.chars().take(WIKI_EXTRACT_MAX_CHARS).collect(),
        None => format!("No Wikipedia article found for '{}'.", query),
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "web_search".to_string(),
                description: Some(
                    "Search the web for current information. \
                    Use this for recent developments, news, or anything time-sensitive."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query"
                        }
                    },
                    "required": ["query"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "wiki_lookup".to_string(),
                description: Some(
                    "Look up a topic on Wikipedia. Use this for background, \
                    definitions, and established facts."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The topic or article title to look up"
                        }
                    },
                    "required": ["query"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "save_text".to_string(),
                description: Some(
                    "Save research findings to a local text file. \
                    Use this when the gathered information is worth keeping."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "text": {
                            "type": "string",
                            "description": "The text to save"
                        }
                    },
                    "required": ["text"]
                })),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| GranskeError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "web_search" => {
            let query = args["query"]
                .as_str()
                .ok_or_else(|| GranskeError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            Ok(ToolCall::WebSearch { query })
        }
        "wiki_lookup" => {
            let query = args["query"]
                .as_str()
                .ok_or_else(|| GranskeError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            Ok(ToolCall::WikiLookup { query })
        }
        "save_text" => {
            let text = args["text"]
                .as_str()
                .ok_or_else(|| GranskeError::Agent("Missing 'text' argument".to_string()))?
                .to_string();
            Ok(ToolCall::SaveText { text })
        }
        _ => Err(GranskeError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_web_search_tool() {
        let tool = parse_tool_call("web_search", r#"{"query": "quantum computing"}"#).unwrap();
        match tool {
            ToolCall::WebSearch { query } => assert_eq!(query, "quantum computing"),
            _ => panic!("Expected WebSearch tool"),
        }
    }

    #[test]
    fn test_parse_wiki_lookup_tool() {
        let tool = parse_tool_call("wiki_lookup", r#"{"query": "Rust (programming language)"}"#)
            .unwrap();
        match tool {
            ToolCall::WikiLookup { query } => assert_eq!(query, "Rust (programming language)"),
            _ => panic!("Expected WikiLookup tool"),
        }
    }

    #[test]
    fn test_parse_unknown_tool_fails() {
        let err = parse_tool_call("delete_everything", "{}").unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[test]
    fn test_parse_missing_argument_fails() {
        assert!(parse_tool_call("web_search", "{}").is_err());
    }

    #[test]
    fn test_parse_invalid_json_arguments_fails() {
        assert!(parse_tool_call("web_search", "not json").is_err());
    }

    #[test]
    fn test_tool_definitions_cover_all_tools() {
        let names: Vec<String> = tool_definitions()
            .into_iter()
            .map(|t| t.function.name)
            .collect();
        assert_eq!(names, vec!["web_search", "wiki_lookup", "save_text"]);
    }

    #[test]
    fn test_save_text_block_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research_output.txt");

        save_text_block(&path, "First finding").unwrap();
        save_text_block(&path, "Second finding").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("--- Research Output ---").count(), 2);
        assert!(content.contains("First finding"));
        assert!(content.contains("Second finding"));
        assert!(content.contains("Timestamp:"));
    }

    #[test]
    fn test_format_search_results_with_abstract() {
        let data = serde_json::json!({
            "AbstractText": "Quantum computing uses quantum mechanics for computation.",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/Quantum_computing",
            "Answer": "",
            "RelatedTopics": []
        });
        let output = format_search_results("quantum computing", &data);
        assert!(output.contains("quantum mechanics"));
        assert!(output.contains("Wikipedia"));
    }

    #[test]
    fn test_format_search_results_empty() {
        let data = serde_json::json!({
            "AbstractText": "",
            "Answer": "",
            "RelatedTopics": []
        });
        let output = format_search_results("obscure query", &data);
        assert!(output.contains("No search results found"));
    }

    #[test]
    fn test_format_wiki_extract() {
        let data = serde_json::json!({
            "query": {
                "pages": {
                    "736": { "extract": "Rust is a systems programming language." }
                }
            }
        });
        assert_eq!(
            format_wiki_extract("Rust", &data),
            "Rust is a systems programming language."
        );
    }

    #[test]
    fn test_format_wiki_extract_missing_page() {
        let data = serde_json::json!({ "query": { "pages": {} } });
        assert!(format_wiki_extract("Nothing", &data).contains("No Wikipedia article"));
    }
}
