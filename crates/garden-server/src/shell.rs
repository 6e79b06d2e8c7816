//! Terminal endpoint
//!
//! The browser owns the session: it sends the working directory and history
//! with each line and stores what comes back.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use terminal::{HOME, Shell};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TerminalRequest {
    pub line: String,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TerminalResponse {
    pub output: Vec<String>,
    pub cwd: String,
    pub prompt: String,
    pub clear: bool,
    pub open: Option<String>,
    pub history: Vec<String>,
}

pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TerminalRequest>,
) -> Json<TerminalResponse> {
    let mut shell = Shell::new(&state.terminal, &state.config.terminal)
        .with_cwd(request.cwd.as_deref().unwrap_or(HOME))
        .with_history(&request.history);

    let output = shell.execute(&request.line);
    tracing::debug!("terminal: {:?} -> {} lines", request.line, output.lines.len());

    Json(TerminalResponse {
        output: output.lines,
        cwd: shell.cwd().to_string(),
        prompt: shell.prompt(),
        clear: output.clear,
        open: output.open,
        history: shell.history().to_vec(),
    })
}
