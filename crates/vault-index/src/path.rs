//! Validation for vault-relative paths coming from requests

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathValidationError {
    #[error("Path is empty")]
    Empty,
    #[error("Path contains directory traversal")]
    DirectoryTraversal,
    #[error("Path is absolute")]
    AbsolutePath,
}

/// Validate that a relative path is safe (no directory traversal).
///
/// A single leading slash is stripped; empty segments are collapsed.
pub fn validate_relative_path(path: &str) -> Result<String, PathValidationError> {
    let clean_path = path.trim().strip_prefix('/').unwrap_or(path.trim());

    if clean_path.starts_with('/') {
        return Err(PathValidationError::AbsolutePath);
    }

    let segments: Vec<&str> = clean_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == ".." || *s == ".") {
        return Err(PathValidationError::DirectoryTraversal);
    }
    if segments.is_empty() {
        return Err(PathValidationError::Empty);
    }

    Ok(segments.join("/"))
}

/// Ensure .md extension on note paths
pub fn ensure_markdown_extension(note_path: &str) -> String {
    if note_path.to_ascii_lowercase().ends_with(".md") {
        note_path.to_string()
    } else {
        format!("{}.md", note_path)
    }
}
