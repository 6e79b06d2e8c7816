//! HTML page handlers
//!
//! Pages always render: a failing note shows an error panel in the content
//! area and the sidebar shows whatever listing is available.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use vault_index::FolderTree;

use crate::AppState;
use crate::html::{self, NoteView};
use crate::vault::Listing;

pub async fn landing(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(html::landing_page(&state.config))
}

pub async fn garden_index(State(state): State<Arc<AppState>>) -> Response {
    garden_view(&state, &state.config.vault.index_note).await
}

pub async fn garden_note(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    garden_view(&state, &path).await
}

pub async fn graph(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(html::graph_page(&state.config))
}

async fn garden_view(state: &AppState, path: &str) -> Response {
    let listing = match state.vault.listing().await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!("Sidebar listing unavailable: {}", e);
            Listing::empty()
        }
    };
    let tree = FolderTree::build(&listing.notes);

    match state.render_note(path).await {
        Ok(note) => {
            Html(html::garden_page(&state.config, &tree, &NoteView::Note(&note))).into_response()
        }
        Err(e) => {
            let view = NoteView::Error {
                path,
                message: e.to_string(),
            };
            (e.status(), Html(html::garden_page(&state.config, &tree, &view))).into_response()
        }
    }
}
