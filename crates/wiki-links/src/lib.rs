//! Parser for Obsidian-style wiki links
//!
//! Supports:
//! - Basic links: `[[Note]]`
//! - Aliases: `[[Note|Display Text]]`
//! - Headers: `[[Note#Header]]`
//! - Block references: `[[Note#^block-id]]`
//! - Embeds: `![[image.png]]`
//! - Paths: `[[folder/Note]]`
//!
//! Every parsed link carries the byte range of its token so callers can
//! rewrite the source text in place (see [`replace_wiki_links`]).

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A parsed wiki link from markdown content.
///
/// Field naming follows Rust's `std::path::Path` conventions where applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiLink {
    /// The note name without path or extension: "Note" (like `Path::file_stem()`)
    pub name: String,
    /// The parent directory path: "projects/rust" or None for bare names (like `Path::parent()`)
    pub parent: Option<String>,
    /// File extension without the dot: "md" or None (like `Path::extension()`)
    pub extension: Option<String>,
    /// Header reference if present: "Header Section"
    pub header: Option<String>,
    /// Block ID if present: "block-123"
    pub block_id: Option<String>,
    /// Display alias if present: "my custom text"
    pub alias: Option<String>,
    /// Whether this is an embed (`![[...]]`)
    pub is_embed: bool,
}

impl WikiLink {
    /// Returns the file name with extension if present: "Note.md" or "Note"
    pub fn file_name(&self) -> String {
        match &self.extension {
            Some(ext) => format!("{}.{}", self.name, ext),
            None => self.name.clone(),
        }
    }

    /// Returns the link target without fragment: "projects/rust/Note.md"
    pub fn target(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}", parent, self.file_name()),
            None => self.file_name(),
        }
    }

    /// Returns alias if present, otherwise the name
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Whether the link carries a fragment (`#Header` or `#^block`)
    pub fn has_fragment(&self) -> bool {
        self.header.is_some() || self.block_id.is_some()
    }

    /// Whether the link points into the note containing it (`[[#Header]]`)
    pub fn is_same_note(&self) -> bool {
        self.name.is_empty() && self.parent.is_none() && self.extension.is_none()
    }
}

/// A wiki link together with the byte range of its token in the source.
///
/// The range covers the whole token, including the leading `!` of embeds and
/// both bracket pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpan {
    pub range: Range<usize>,
    pub link: WikiLink,
}

/// Find all wiki links in content, in source order.
pub fn find_wiki_links(content: &str) -> Vec<LinkSpan> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut spans = Vec::new();
    let mut i = 0;

    // Delimiters are ASCII, so every index we stop at is a char boundary.
    while i + 1 < len {
        if bytes[i] == b'[' && bytes[i + 1] == b'[' {
            let is_embed = i > 0 && bytes[i - 1] == b'!';
            if let Some((link, end)) = parse_link_at(content, i, is_embed) {
                let start = if is_embed { i - 1 } else { i };
                spans.push(LinkSpan {
                    range: start..end,
                    link,
                });
                i = end;
                continue;
            }
        }
        i += 1;
    }

    spans
}

/// Parse all wiki links from markdown content
pub fn parse_wiki_links(content: &str) -> Vec<WikiLink> {
    find_wiki_links(content)
        .into_iter()
        .map(|span| span.link)
        .collect()
}

/// Replace every wiki link token with the output of `replace`.
///
/// Text outside of link tokens is copied unchanged.
pub fn replace_wiki_links<F>(content: &str, mut replace: F) -> String
where
    F: FnMut(&WikiLink) -> String,
{
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for span in find_wiki_links(content) {
        out.push_str(&content[last..span.range.start]);
        out.push_str(&replace(&span.link));
        last = span.range.end;
    }
    out.push_str(&content[last..]);

    out
}

/// Parse a link starting at byte `start` (pointing to the first `[`).
/// Returns the parsed link and the byte position after the closing `]]`.
fn parse_link_at(content: &str, start: usize, is_embed: bool) -> Option<(WikiLink, usize)> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let content_start = start + 2;
    let mut i = content_start;

    while i + 1 < len {
        match (bytes[i], bytes[i + 1]) {
            (b']', b']') => {
                let inner = &content[content_start..i];
                return parse_link_content(inner, is_embed).map(|link| (link, i + 2));
            }
            // A new opener before we closed means this `[[` was stray text.
            (b'[', b'[') => return None,
            (b'\n', _) => return None,
            _ => i += 1,
        }
    }

    None
}

/// Parse the content inside [[ ]] into a WikiLink
fn parse_link_content(content: &str, is_embed: bool) -> Option<WikiLink> {
    // Split by | for alias. Inside tables the pipe is written as `\|`.
    let (target_part, alias) = match content.split_once('|') {
        Some((target, alias)) => {
            let target = target.strip_suffix('\\').unwrap_or(target);
            let alias = alias.trim();
            (target, (!alias.is_empty()).then(|| alias.to_string()))
        }
        None => (content, None),
    };

    // Parse target for header/block references
    let (path_part, header, block_id) = parse_fragment(target_part);

    // Parse the path into parent, name, extension
    let (parent, name, extension) = parse_path(path_part);

    // `[[#Header]]` points into the current note, so only a fully empty target is rejected
    if name.is_empty() && extension.is_none() && header.is_none() && block_id.is_none() {
        return None;
    }

    Some(WikiLink {
        name,
        parent,
        extension,
        header,
        block_id,
        alias,
        is_embed,
    })
}

/// Parse a target string to extract the path and any fragment (header or block reference)
/// Returns (path_part, header, block_id)
fn parse_fragment(target: &str) -> (&str, Option<String>, Option<String>) {
    // Check for block reference: Note#^block-id
    if let Some(block_pos) = target.find("#^") {
        let path_part = &target[..block_pos];
        let block_id = target[block_pos + 2..].trim();
        return (path_part, None, Some(block_id.to_string()));
    }

    // Check for header reference: Note#Header
    if let Some(header_pos) = target.find('#') {
        let path_part = &target[..header_pos];
        let header = target[header_pos + 1..].trim();
        return (path_part, Some(header.to_string()), None);
    }

    // No fragment
    (target, None, None)
}

/// Parse a path string into parent, name, and extension
/// Returns (parent, name, extension)
fn parse_path(path: &str) -> (Option<String>, String, Option<String>) {
    let path = path.trim();

    // Split into parent and file_name
    let (parent, file_name) = match path.rsplit_once('/') {
        Some((parent, file_name)) if !parent.is_empty() => (Some(parent.to_string()), file_name),
        Some((_, file_name)) => (None, file_name),
        None => (None, path),
    };

    // Split file_name into name and extension at the last dot. A leading dot
    // (".gitignore") is part of the name.
    let (name, extension) = match file_name.rfind('.') {
        Some(dot_pos) if dot_pos > 0 && dot_pos + 1 < file_name.len() => (
            file_name[..dot_pos].to_string(),
            Some(file_name[dot_pos + 1..].to_string()),
        ),
        _ => (file_name.to_string(), None),
    };

    (parent, name, extension)
}

/// Extract all unique note names from wiki links in content
pub fn extract_linked_notes(content: &str) -> Vec<String> {
    let links = parse_wiki_links(content);
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();

    for link in links {
        if seen.insert(link.name.clone()) {
            result.push(link.name);
        }
    }

    result
}
