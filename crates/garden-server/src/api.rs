//! JSON endpoints for the vault

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use garden_render::RenderedNote;
use serde::{Deserialize, Serialize};
use vault_index::{FolderTree, GraphData, MatchKind, NoteRef, folder_graph};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Local graphs never reach further than this many hops.
pub const MAX_GRAPH_DEPTH: usize = 5;

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<NoteRef>,
    pub tree: FolderTree,
}

pub async fn list_notes(State(state): State<Arc<AppState>>) -> AppResult<Json<NotesResponse>> {
    let listing = state.vault.listing().await?;
    Ok(Json(NotesResponse {
        tree: FolderTree::build(&listing.notes),
        notes: listing.notes.to_vec(),
    }))
}

pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> AppResult<Json<RenderedNote>> {
    Ok(Json(state.render_note(&path).await?))
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub target: String,
    pub from: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub target: String,
    pub path: String,
    pub kind: MatchKind,
}

/// Resolve a wiki-link target to a vault path.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<ResolveResponse>> {
    let listing = state.vault.listing().await?;
    let resolution = listing
        .resolver()
        .resolve_from(&query.target, query.from.as_deref())
        .ok_or_else(|| AppError::NotFound {
            path: query.target.clone(),
        })?;

    Ok(Json(ResolveResponse {
        path: resolution.note.path.clone(),
        kind: resolution.kind,
        target: query.target,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    #[default]
    Links,
    Folders,
}

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub mode: GraphMode,
    /// Note path or name; limits a link graph to its neighbourhood
    pub focus: Option<String>,
    pub depth: Option<usize>,
}

pub async fn graph(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GraphQuery>,
) -> AppResult<Json<GraphData>> {
    let listing = state.vault.listing().await?;

    let data = match query.mode {
        GraphMode::Folders => folder_graph(&listing.notes),
        GraphMode::Links => {
            let graph = state.vault.link_graph().await?;
            match query.focus.as_deref().filter(|f| !f.trim().is_empty()) {
                None => graph.to_graph_data(),
                Some(focus) => {
                    let note = listing.resolver().resolve(focus).ok_or_else(|| {
                        AppError::NotFound {
                            path: focus.to_string(),
                        }
                    })?;
                    let depth = query.depth.unwrap_or(1).min(MAX_GRAPH_DEPTH);
                    graph.local_graph(&note.note.path, depth)
                }
            }
        }
    };

    Ok(Json(data))
}
