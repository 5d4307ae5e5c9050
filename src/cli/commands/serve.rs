//! HTTP API server for the research pipeline.
//!
//! Exposes `POST /research` for structured research queries.

use crate::agent::{Agent, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::research::{ResearchRequest, ResearchResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
///
/// The agent is built once at startup and is read-only afterwards, so it is
/// safe to share across concurrent request handlers.
pub struct AppState {
    agent: Agent,
}

impl AppState {
    /// Build the state from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let tools = ToolContext::new(settings.save_path());
        let agent = Agent::new(tools, &settings.agent.model)
            .with_max_iterations(settings.agent.max_iterations);
        Self { agent }
    }
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    // Fail fast before binding: a server without credentials can never
    // serve a successful request.
    if let Err(e) = preflight::check(Operation::Serve) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let state = Arc::new(AppState::from_settings(&settings));
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Granske API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Research", "POST /research");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/research", post(research))
        .layer(cors)
        .with_state(state)
}

/// Error body for failed requests.
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run a research query through the agent and return the structured result.
///
/// Any agent or parse failure becomes a 500 with the error message as
/// `detail`; no partial result is ever returned.
async fn research(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResearchRequest>,
) -> impl IntoResponse {
    info!("Received research query: {}", req.query);

    let run = match state.agent.run(&req.query).await {
        Ok(run) => run,
        Err(e) => {
            error!("Agent execution failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: format!("An error occurred during research: {}", e),
                }),
            )
                .into_response();
        }
    };

    match ResearchResponse::parse(&run.content) {
        Ok(response) => {
            info!("Research successful, returning parsed response");
            Json(response).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                detail: format!("Failed to parse research output: {}", e),
            }),
        )
            .into_response(),
    }
}
