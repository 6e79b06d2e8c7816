//! Remote vault access with an in-process cache
//!
//! [`VaultSource`] is the seam to the host that stores the vault;
//! [`CachedVault`] keeps the file listing (refreshed after a TTL) and note
//! contents (kept for the life of the process) in front of it.

mod github;

pub use github::GithubSource;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::sync::RwLock;
use vault_index::{
    LinkGraph, LinkResolver, ListingFilter, NoteRef, PathValidationError, collect_notes,
    validate_relative_path,
};

/// Attachment types image embeds can point at.
pub const ATTACHMENT_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "avif"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}: note not found")]
    NotFound(String),

    #[error("{path}: invalid path: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: PathValidationError,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Where vault files come from.
#[async_trait::async_trait]
pub trait VaultSource: Send + Sync {
    /// Every file path in the vault, `/`-separated and relative to its root.
    async fn list_files(&self) -> Result<Vec<String>, FetchError>;

    /// Raw text of one file.
    async fn fetch_note(&self, path: &str) -> Result<String, FetchError>;
}

/// A snapshot of the vault listing.
#[derive(Debug, Clone)]
pub struct Listing {
    pub notes: Arc<Vec<NoteRef>>,
    pub attachments: Arc<Vec<NoteRef>>,
    fetched_at: Instant,
    generation: u64,
}

impl Listing {
    pub fn empty() -> Self {
        Self {
            notes: Arc::new(Vec::new()),
            attachments: Arc::new(Vec::new()),
            fetched_at: Instant::now(),
            generation: 0,
        }
    }

    pub fn resolver(&self) -> LinkResolver<'_> {
        LinkResolver::new(&self.notes)
    }

    pub fn find(&self, path: &str) -> Option<&NoteRef> {
        self.notes.iter().find(|n| n.path == path)
    }
}

pub struct CachedVault {
    source: Arc<dyn VaultSource>,
    filter: ListingFilter,
    attachment_filter: ListingFilter,
    ttl: Duration,
    concurrency: usize,
    listing: RwLock<Option<Listing>>,
    notes: RwLock<HashMap<String, Arc<str>>>,
    generation: AtomicU64,
    graph: RwLock<Option<(u64, Arc<LinkGraph>)>>,
}

impl CachedVault {
    pub fn new(
        source: Arc<dyn VaultSource>,
        filter: ListingFilter,
        ttl: Duration,
        concurrency: usize,
    ) -> Self {
        let attachment_filter = filter.with_extensions(ATTACHMENT_EXTENSIONS);
        Self {
            source,
            filter,
            attachment_filter,
            ttl,
            concurrency: concurrency.max(1),
            listing: RwLock::new(None),
            notes: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            graph: RwLock::new(None),
        }
    }

    /// The current listing, refreshed from the source once the TTL expires.
    ///
    /// If a refresh fails while an older listing is cached, the older one is served.
    pub async fn listing(&self) -> Result<Listing, FetchError> {
        let stale = {
            let guard = self.listing.read().await;
            match guard.as_ref() {
                Some(listing) if listing.fetched_at.elapsed() < self.ttl => {
                    return Ok(listing.clone());
                }
                other => other.cloned(),
            }
        };

        let files = match self.source.list_files().await {
            Ok(files) => files,
            Err(e) => {
                return match stale {
                    Some(listing) => {
                        tracing::warn!("Listing refresh failed, serving cached listing: {}", e);
                        Ok(listing)
                    }
                    None => {
                        tracing::warn!("Failed to list vault: {}", e);
                        Err(e)
                    }
                };
            }
        };

        let listing = Listing {
            notes: Arc::new(collect_notes(files.iter().map(String::as_str), &self.filter)),
            attachments: Arc::new(collect_notes(
                files.iter().map(String::as_str),
                &self.attachment_filter,
            )),
            fetched_at: Instant::now(),
            generation: self.generation.fetch_add(1, Ordering::Relaxed) + 1,
        };
        tracing::info!(
            "Vault listing refreshed: {} notes, {} attachments",
            listing.notes.len(),
            listing.attachments.len()
        );

        *self.listing.write().await = Some(listing.clone());
        Ok(listing)
    }

    /// Contents of a listed note.
    pub async fn note(&self, path: &str) -> Result<Arc<str>, FetchError> {
        let path = validate_relative_path(path).map_err(|source| FetchError::InvalidPath {
            path: path.to_string(),
            source,
        })?;

        let listing = self.listing().await?;
        if listing.find(&path).is_none() {
            return Err(FetchError::NotFound(path));
        }

        self.cached_fetch(&path).await
    }

    async fn cached_fetch(&self, path: &str) -> Result<Arc<str>, FetchError> {
        if let Some(content) = self.notes.read().await.get(path) {
            tracing::debug!("Cache hit: {}", path);
            return Ok(content.clone());
        }

        tracing::debug!("Cache miss: {}", path);
        let content: Arc<str> = match self.source.fetch_note(path).await {
            Ok(content) => content.into(),
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", path, e);
                return Err(e);
            }
        };

        self.notes
            .write()
            .await
            .insert(path.to_string(), content.clone());
        Ok(content)
    }

    /// Fetch many notes with bounded concurrency. Failures are logged and skipped.
    pub async fn contents(&self, notes: &[NoteRef]) -> Vec<(String, Arc<str>)> {
        let paths: Vec<String> = notes.iter().map(|note| note.path.clone()).collect();
        stream::iter(paths)
            .map(|path| async move {
                let content = self.cached_fetch(&path).await.ok()?;
                Some((path, content))
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|result| async move { result })
            .collect()
            .await
    }

    /// Link graph over every listed note.
    ///
    /// Built once per listing snapshot and shared until the listing refreshes.
    pub async fn link_graph(&self) -> Result<Arc<LinkGraph>, FetchError> {
        let listing = self.listing().await?;
        if let Some((built_for, graph)) = self.graph.read().await.as_ref() {
            if *built_for == listing.generation {
                return Ok(graph.clone());
            }
        }

        let contents = self.contents(&listing.notes).await;
        let resolver = listing.resolver();
        let mut graph = LinkGraph::new(&listing.notes);
        for (path, content) in &contents {
            graph.index_note(path, content, &resolver);
        }
        tracing::debug!(
            "Built link graph: {} notes, {} links",
            graph.len(),
            graph.total_links()
        );

        let graph = Arc::new(graph);
        *self.graph.write().await = Some((listing.generation, graph.clone()));
        Ok(graph)
    }

    pub async fn cached_note_count(&self) -> usize {
        self.notes.read().await.len()
    }
}
