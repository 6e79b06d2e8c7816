//! Portfolio site and knowledge garden
//!
//! Serves:
//! - The landing page (about, projects, terminal easter egg, contact form)
//! - A viewer for a markdown vault hosted on GitHub, rendered server-side
//! - Link and folder graphs of the vault for the force-graph widgets
//! - The JSON API behind the page scripts

pub mod api;
pub mod config;
pub mod contact;
pub mod error;
mod html;
pub mod pages;
pub mod shell;
pub mod vault;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use garden_render::{RenderOptions, RenderedNote, Renderer};
use tower_http::trace::TraceLayer;
use vault_index::{MatchKind, NoteRef, ensure_markdown_extension};

use crate::config::Config;
use crate::contact::EmailRelay;
use crate::error::AppError;
use crate::vault::{CachedVault, Listing, VaultSource};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub vault: CachedVault,
    pub relay: Arc<dyn EmailRelay>,
    pub terminal: terminal::Vfs,
    pub render_options: RenderOptions,
}

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn VaultSource>,
        relay: Arc<dyn EmailRelay>,
    ) -> anyhow::Result<Self> {
        let vault = CachedVault::new(
            source,
            config.vault.filter(),
            config.vault.listing_ttl(),
            config.vault.fetch_concurrency,
        );
        let terminal = config
            .terminal
            .build_vfs()
            .context("Invalid terminal file in config")?;
        let render_options = RenderOptions {
            note_base: "/garden".to_string(),
            asset_base: config.vault.asset_base(),
        };

        Ok(Self {
            config,
            vault,
            relay,
            terminal,
            render_options,
        })
    }

    /// Render a note given its vault path, its path without `.md`, or its name.
    pub async fn render_note(&self, requested: &str) -> Result<RenderedNote, AppError> {
        let listing = self.vault.listing().await?;
        let note = find_note(&listing, requested).ok_or_else(|| AppError::NotFound {
            path: requested.to_string(),
        })?;

        let content = self.vault.note(&note.path).await?;
        let renderer = Renderer::new(&listing.notes, &listing.attachments, &self.render_options);
        Ok(renderer.render(&note, &content))
    }
}

fn find_note(listing: &Listing, requested: &str) -> Option<NoteRef> {
    let path = requested.trim().trim_start_matches('/');
    if path.is_empty() {
        return None;
    }

    listing
        .find(path)
        .or_else(|| listing.find(&ensure_markdown_extension(path)))
        .or_else(|| {
            listing
                .resolver()
                .resolve(path)
                .filter(|r| r.kind == MatchKind::Name)
                .map(|r| r.note)
        })
        .cloned()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::landing))
        .route("/garden", get(pages::garden_index))
        .route("/garden/{*path}", get(pages::garden_note))
        .route("/graph", get(pages::graph))
        // Vault API
        .route("/api/notes", get(api::list_notes))
        .route("/api/notes/{*path}", get(api::get_note))
        .route("/api/resolve", get(api::resolve))
        .route("/api/graph", get(api::graph))
        // Landing page widgets
        .route("/api/terminal", post(shell::handler))
        .route("/api/contact", post(contact::handler))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
