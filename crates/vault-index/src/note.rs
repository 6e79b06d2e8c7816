use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A file in the vault, identified by its path relative to the vault root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteRef {
    /// File stem: "Garden"
    pub name: String,
    /// Path with extension: "Projects/Garden.md"
    pub path: String,
    /// Parent folder: "Projects", or "" for notes at the root
    pub folder: String,
}

impl NoteRef {
    pub fn from_path(path: &str) -> Self {
        let (folder, file_name) = path.rsplit_once('/').unwrap_or(("", path));
        let name = match file_name.rfind('.') {
            Some(dot) if dot > 0 => &file_name[..dot],
            _ => file_name,
        };

        Self {
            name: name.to_string(),
            path: path.to_string(),
            folder: folder.to_string(),
        }
    }

    /// File name with extension: "Garden.md"
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Extension without the dot, if any
    pub fn extension(&self) -> Option<&str> {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(dot) if dot > 0 => Some(&file_name[dot + 1..]),
            _ => None,
        }
    }

    /// Number of folders above the note (0 for root notes)
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }
}

/// Rules deciding which files of a source tree listing become notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
    /// Accepted extensions without the dot, compared case-insensitively
    pub extensions: Vec<String>,
    /// Folder names whose contents are never listed (e.g. "private")
    pub excluded_folders: Vec<String>,
    /// Whether dot-prefixed files and folders (.obsidian, .trash) are listed
    pub include_hidden: bool,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            excluded_folders: vec!["private".to_string()],
            include_hidden: false,
        }
    }
}

impl ListingFilter {
    /// Filter accepting the given extensions with the same folder rules.
    pub fn with_extensions(&self, extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            ..self.clone()
        }
    }

    pub fn accepts(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('/').collect();
        let Some((file_name, folders)) = segments.split_last() else {
            return false;
        };

        if !self.include_hidden && segments.iter().any(|s| s.starts_with('.')) {
            return false;
        }

        if folders.iter().any(|folder| {
            self.excluded_folders
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(folder))
        }) {
            return false;
        }

        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .extensions
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

/// Build the note list from a source tree listing.
///
/// Paths failing the filter are skipped; duplicates collapse so every path
/// appears once. The result is sorted by path.
pub fn collect_notes<'a, I>(paths: I, filter: &ListingFilter) -> Vec<NoteRef>
where
    I: IntoIterator<Item = &'a str>,
{
    let unique: BTreeMap<&str, NoteRef> = paths
        .into_iter()
        .map(|p| p.trim_start_matches('/'))
        .filter(|p| filter.accepts(p))
        .map(|p| (p, NoteRef::from_path(p)))
        .collect();

    unique.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_ref_splits_path() {
        let note = NoteRef::from_path("Projects/Rust/Garden.md");
        assert_eq!(note.name, "Garden");
        assert_eq!(note.folder, "Projects/Rust");
        assert_eq!(note.file_name(), "Garden.md");
        assert_eq!(note.extension(), Some("md"));
        assert_eq!(note.depth(), 2);
    }

    #[test]
    fn note_ref_at_root_has_empty_folder() {
        let note = NoteRef::from_path("Index.md");
        assert_eq!(note.name, "Index");
        assert_eq!(note.folder, "");
        assert_eq!(note.depth(), 0);
    }

    #[test]
    fn note_ref_keeps_inner_dots_in_name() {
        let note = NoteRef::from_path("notes/v1.2 release.md");
        assert_eq!(note.name, "v1.2 release");
    }

    #[test]
    fn filter_accepts_markdown_only() {
        let filter = ListingFilter::default();
        assert!(filter.accepts("Projects/Garden.md"));
        assert!(filter.accepts("Index.MD"));
        assert!(!filter.accepts("assets/diagram.png"));
        assert!(!filter.accepts("README"));
        assert!(!filter.accepts(".md"));
    }

    #[test]
    fn filter_skips_hidden_and_private_folders() {
        let filter = ListingFilter::default();
        assert!(!filter.accepts(".obsidian/workspace.md"));
        assert!(!filter.accepts("Projects/.trash/Old.md"));
        assert!(!filter.accepts("private/Diary.md"));
        assert!(!filter.accepts("Journal/Private/Diary.md"));
        // Only folder segments are matched, not file names
        assert!(filter.accepts("Journal/private.md"));
    }

    #[test]
    fn filter_with_extensions_keeps_folder_rules() {
        let images = ListingFilter::default().with_extensions(&["png", "jpg"]);
        assert!(images.accepts("assets/diagram.png"));
        assert!(!images.accepts("private/photo.jpg"));
        assert!(!images.accepts("Garden.md"));
    }

    #[test]
    fn collect_notes_filters_dedupes_and_sorts() {
        let paths = [
            "Zettel/B.md",
            "A.md",
            "assets/logo.svg",
            "Zettel/B.md",
            ".obsidian/app.md",
            "/Root.md",
        ];
        let notes = collect_notes(paths, &ListingFilter::default());

        let listed: Vec<&str> = notes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(listed, vec!["A.md", "Root.md", "Zettel/B.md"]);
    }
}
