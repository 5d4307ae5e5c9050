//! Client command implementation: query a running Granske server over HTTP.

use crate::cli::Output;
use crate::research::{ResearchRequest, ResearchResponse};
use anyhow::Result;
use serde::Deserialize;

/// Error body returned by the server on failure.
#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Run the client command.
///
/// Every failure class gets its own message rather than a panic: the server
/// being down, an HTTP error status, and a body that isn't valid JSON are
/// all ordinary outcomes for a remote call.
pub async fn run_client(query: &str, server: &str) -> Result<()> {
    if query.trim().is_empty() {
        Output::warning("Please enter a research query.");
        return Err(crate::GranskeError::InvalidInput("empty query".to_string()).into());
    }

    let url = format!("{}/research", server.trim_end_matches('/'));
    let client = reqwest::Client::new();

    Output::info(&format!("Researching: '{}'...", query));
    let spinner = Output::spinner("Waiting for the server...");

    let response = match client
        .post(&url)
        .json(&ResearchRequest {
            query: query.to_string(),
        })
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) if e.is_connect() => {
            spinner.finish_and_clear();
            Output::error(&format!(
                "Could not connect to the server at {}. Please ensure it is running.",
                server
            ));
            return Err(e.into());
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("An error occurred during the request: {}", e));
            return Err(e.into());
        }
    };

    spinner.finish_and_clear();

    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ErrorDetail>()
            .await
            .map(|e| e.detail)
            .unwrap_or_else(|_| "No additional details.".to_string());
        Output::error(&format!("Server returned {}: {}", status, detail));
        return Err(crate::GranskeError::Agent(detail).into());
    }

    let data: ResearchResponse = match response.json().await {
        Ok(data) => data,
        Err(e) => {
            Output::error("Failed to decode JSON response from the server.");
            return Err(e.into());
        }
    };

    render(&data);
    Ok(())
}

/// Render the structured response.
fn render(data: &ResearchResponse) {
    Output::success("Research Complete!");

    Output::header("Research Summary");
    Output::kv("Topic", &data.topic);
    println!("\n{}", data.summary);

    Output::header("Sources");
    if data.sources.is_empty() {
        println!("  No specific sources provided.");
    } else {
        for source in &data.sources {
            Output::list_item(source);
        }
    }

    Output::header("Tools Used");
    if data.tools_used.is_empty() {
        println!("  No tools explicitly reported by the agent.");
    } else {
        println!("  {}", data.tools_used.join(", "));
    }
}
