//! Note listing, link resolution and graph building for a markdown vault
//!
//! Everything here is pure: callers hand in file paths (from a source tree
//! listing) and note contents, and get back note references, resolved links,
//! a folder tree for navigation and graph data for visualisation. Fetching
//! and caching stay in the server.

mod frontmatter;
pub mod graph;
mod note;
mod path;
pub mod resolve;
mod tree;

pub use frontmatter::{Frontmatter, ParsedNote, parse_frontmatter, split_frontmatter};
pub use graph::{GraphData, GraphLink, GraphNode, LinkGraph, NodeKind, folder_graph};
pub use note::{ListingFilter, NoteRef, collect_notes};
pub use path::{PathValidationError, ensure_markdown_extension, validate_relative_path};
pub use resolve::{LinkResolver, MatchKind, Resolution};
pub use tree::FolderTree;
