//! Research response schema and strict output parsing.

use crate::error::{GranskeError, Result};
use serde::{Deserialize, Serialize};
use tracing::error;

/// A research query as it arrives over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    /// Free-text research query.
    pub query: String,
}

/// Structured result of a research run.
///
/// All four fields must be present in the model output or parsing fails;
/// no partial response is ever constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResponse {
    /// The research topic, as stated by the agent.
    pub topic: String,
    /// Summary of the findings.
    pub summary: String,
    /// URLs or citations backing the summary, in the order given.
    pub sources: Vec<String>,
    /// Names of the tools the agent reports having used.
    pub tools_used: Vec<String>,
}

impl ResearchResponse {
    /// Parse raw agent output into a structured response.
    ///
    /// Tolerates a Markdown code fence and surrounding prose around a single
    /// JSON object, but the object itself must carry all four fields with
    /// the right types. On failure the raw text is logged so a malformed
    /// model response can be diagnosed after the fact.
    pub fn parse(raw: &str) -> Result<Self> {
        let candidate = extract_json_object(raw).ok_or_else(|| {
            error!("No JSON object found in agent output: {}", raw);
            GranskeError::Parse("no JSON object found in agent output".to_string())
        })?;

        serde_json::from_str(candidate).map_err(|e| {
            error!("Agent output did not match schema ({}): {}", e, raw);
            GranskeError::Parse(e.to_string())
        })
    }

    /// Format the response as a plain-text block for the save file.
    pub fn as_text_block(&self) -> String {
        format!(
            "Topic: {}\nSummary: {}\nSources: {}\nTools Used: {}",
            self.topic,
            self.summary,
            self.sources.join(", "),
            self.tools_used.join(", ")
        )
    }
}

/// Instructions appended to the system prompt telling the model how to
/// shape its final answer.
pub fn format_instructions() -> String {
    r#"Respond with a single JSON object and no other text, in this exact shape:
{
  "topic": "<the research topic>",
  "summary": "<a thorough summary of your findings>",
  "sources": ["<url or citation>", ...],
  "tools_used": ["<tool name>", ...]
}
All four keys are required. "sources" and "tools_used" may be empty arrays."#
        .to_string()
}

/// Locate the outermost JSON object in possibly fenced, possibly
/// prose-wrapped model output.
fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = strip_code_fence(raw.trim());
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&trimmed[start..=end])
}

/// Strip a surrounding Markdown code fence (```json ... ```) if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "topic": "Quantum computing",
        "summary": "Recent progress in error correction.",
        "sources": ["https://example.com/a", "https://example.com/b"],
        "tools_used": ["web_search", "wiki_lookup"]
    }"#;

    #[test]
    fn test_parse_well_formed() {
        let response = ResearchResponse::parse(WELL_FORMED).unwrap();
        assert_eq!(response.topic, "Quantum computing");
        assert_eq!(response.summary, "Recent progress in error correction.");
        assert_eq!(
            response.sources,
            vec!["https://example.com/a", "https://example.com/b"]
        );
        assert_eq!(response.tools_used, vec!["web_search", "wiki_lookup"]);
    }

    #[test]
    fn test_parse_preserves_sequence_order() {
        let raw = r#"{"topic": "t", "summary": "s", "sources": ["z", "a", "m"], "tools_used": ["save_text", "web_search"]}"#;
        let response = ResearchResponse::parse(raw).unwrap();
        assert_eq!(response.sources, vec!["z", "a", "m"]);
        assert_eq!(response.tools_used, vec!["save_text", "web_search"]);
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = format!("```json\n{}\n```", WELL_FORMED);
        let response = ResearchResponse::parse(&raw).unwrap();
        assert_eq!(response.topic, "Quantum computing");
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let raw = format!("Here is the result:\n{}\nHope that helps!", WELL_FORMED);
        // The trailing prose contains no braces, so the object is still found.
        let response = ResearchResponse::parse(&raw).unwrap();
        assert_eq!(response.tools_used.len(), 2);
    }

    #[test]
    fn test_parse_missing_field_fails() {
        let raw = r#"{"topic": "t", "summary": "s", "sources": []}"#;
        let err = ResearchResponse::parse(raw).unwrap_err();
        assert!(matches!(err, GranskeError::Parse(_)));
        assert!(err.to_string().contains("tools_used"));
    }

    #[test]
    fn test_parse_wrong_type_fails() {
        let raw = r#"{"topic": "t", "summary": "s", "sources": "not-a-list", "tools_used": []}"#;
        assert!(ResearchResponse::parse(raw).is_err());
    }

    #[test]
    fn test_parse_plain_prose_fails() {
        let err = ResearchResponse::parse("Quantum computers are improving rapidly.").unwrap_err();
        assert!(matches!(err, GranskeError::Parse(_)));
    }

    #[test]
    fn test_parse_empty_arrays_allowed() {
        let raw = r#"{"topic": "t", "summary": "s", "sources": [], "tools_used": []}"#;
        let response = ResearchResponse::parse(raw).unwrap();
        assert!(response.sources.is_empty());
        assert!(response.tools_used.is_empty());
    }

    #[test]
    fn test_as_text_block() {
        let response = ResearchResponse {
            topic: "T".to_string(),
            summary: "S".to_string(),
            sources: vec!["a".to_string(), "b".to_string()],
            tools_used: vec!["web_search".to_string()],
        };
        assert_eq!(
            response.as_text_block(),
            "Topic: T\nSummary: S\nSources: a, b\nTools Used: web_search"
        );
    }

    #[test]
    fn test_format_instructions_mentions_all_fields() {
        let instructions = format_instructions();
        for field in ["topic", "summary", "sources", "tools_used"] {
            assert!(instructions.contains(field));
        }
    }

    #[test]
    fn test_strip_code_fence_without_language_tag() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(raw), "{\"a\": 1}");
    }
}
