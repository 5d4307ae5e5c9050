//! Ask command implementation: run a research query with the local agent.

use crate::agent::{save_text_block, Agent, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::research::ResearchResponse;
use anyhow::Result;
use std::io::Write;

/// Run the ask command.
pub async fn run_ask(query: Option<&str>, model: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Research) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let query = match query {
        Some(q) => q.to_string(),
        None => read_query_from_stdin()?,
    };

    if query.is_empty() {
        Output::warning("Please enter a research query.");
        return Err(crate::GranskeError::InvalidInput("empty query".to_string()).into());
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());
    let tools = ToolContext::new(settings.save_path());
    let agent = Agent::new(tools, &model).with_max_iterations(settings.agent.max_iterations);

    let spinner = Output::spinner("Researching...");

    let run = match agent.run(&query).await {
        Ok(run) => run,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("An error occurred during agent execution: {}", e));
            return Err(e.into());
        }
    };

    spinner.finish_and_clear();

    let response = match ResearchResponse::parse(&run.content) {
        Ok(response) => response,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Raw agent output:");
            println!("{}", run.content);
            return Err(e.into());
        }
    };

    Output::header("Research Response");
    Output::kv("Topic", &response.topic);
    Output::kv("Summary", &response.summary);

    if !response.sources.is_empty() {
        Output::header("Sources");
        for source in &response.sources {
            Output::list_item(source);
        }
    }

    if !response.tools_used.is_empty() {
        Output::header("Tools Used");
        for tool in &response.tools_used {
            Output::list_item(tool);
        }
    }

    if !run.tool_calls.is_empty() {
        Output::header(&format!("Tool calls ({})", run.tool_calls.len()));
        for call in &run.tool_calls {
            Output::info(&format!("  {}", truncate(&call.to_string(), 80)));
        }
    }

    // Persist the result regardless of whether the agent chose to save
    let save_path = settings.save_path();
    save_text_block(&save_path, &response.as_text_block())?;
    println!();
    Output::success(&format!("Saved to {}", save_path.display()));

    Ok(())
}

/// Prompt for a query on stdin.
fn read_query_from_stdin() -> Result<String> {
    print!("Enter a query to run! ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        let truncated = truncate("abcdefghij", 8);
        assert_eq!(truncated, "abcde...");
    }

    #[test]
    fn test_truncate_multibyte_on_char_boundary() {
        // Non-ASCII tool arguments must not panic mid-character
        let long = format!("web_search({{\"query\": \"{}\"}})", "é".repeat(60));
        let truncated = truncate(&long, 80);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 80);
    }

    #[test]
    fn test_truncate_multibyte_short_unchanged() {
        assert_eq!(truncate("ノート", 10), "ノート");
    }
}
