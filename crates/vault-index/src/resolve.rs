//! Wiki-link resolution against the note list.
//!
//! Policy, applied case-insensitively:
//! 1. Exact name: the target's file name (with a trailing `.md` stripped)
//!    equals a note's name or full file name. A folder in the target
//!    (`[[Projects/Garden]]`) restricts candidates to notes under that folder.
//! 2. Path substring: otherwise, any note whose path contains the target.
//! 3. Not found.
//!
//! Ties go to a note in the same folder as the linking note, then to the
//! shallowest path, then to the first path in sort order.

use serde::Serialize;
use wiki_links::WikiLink;

use crate::note::NoteRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Name,
    PathSubstring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub note: &'a NoteRef,
    pub kind: MatchKind,
}

/// A normalized, lowercased link target.
#[derive(Debug, Clone, PartialEq)]
struct Target {
    folder: Option<String>,
    file_name: String,
}

impl Target {
    /// Parse free text such as "Garden", "Garden.md", "[[Projects/Garden#Intro|x]]".
    fn parse(raw: &str) -> Option<Self> {
        let mut text = raw.trim();
        if let Some(inner) = text.strip_prefix("[[").and_then(|t| t.strip_suffix("]]")) {
            text = inner;
        }
        let text = text.split('|').next().unwrap_or(text);
        let text = text.split('#').next().unwrap_or(text).trim();

        let (folder, file_name) = match text.rsplit_once('/') {
            Some((folder, file_name)) => (Some(folder.trim_matches('/')), file_name),
            None => (None, text),
        };

        Self::new(folder, file_name)
    }

    fn from_link(link: &WikiLink) -> Option<Self> {
        Self::new(link.parent.as_deref(), &link.file_name())
    }

    fn new(folder: Option<&str>, file_name: &str) -> Option<Self> {
        let file_name = file_name.trim().to_lowercase();
        let file_name = file_name
            .strip_suffix(".md")
            .map(str::to_string)
            .unwrap_or(file_name);
        if file_name.is_empty() {
            return None;
        }

        let folder = folder
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());

        Some(Self { folder, file_name })
    }

    /// The target as a path fragment for substring matching: "projects/garden"
    fn as_path(&self) -> String {
        match &self.folder {
            Some(folder) => format!("{}/{}", folder, self.file_name),
            None => self.file_name.clone(),
        }
    }

    fn matches_name(&self, note: &NoteRef) -> bool {
        let name_matches = note.name.to_lowercase() == self.file_name
            || note.file_name().to_lowercase() == self.file_name;
        if !name_matches {
            return false;
        }

        match &self.folder {
            None => true,
            Some(folder) => {
                let note_folder = note.folder.to_lowercase();
                note_folder == *folder || note_folder.ends_with(&format!("/{}", folder))
            }
        }
    }
}

/// Resolves link targets against a fixed note list.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    notes: &'a [NoteRef],
}

impl<'a> LinkResolver<'a> {
    pub fn new(notes: &'a [NoteRef]) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &'a [NoteRef] {
        self.notes
    }

    /// Resolve free-text target such as "Garden" or "Garden.md".
    pub fn resolve(&self, target: &str) -> Option<Resolution<'a>> {
        self.resolve_from(target, None)
    }

    /// Resolve a target typed inside the note at `from` (a vault path).
    pub fn resolve_from(&self, target: &str, from: Option<&str>) -> Option<Resolution<'a>> {
        let target = Target::parse(target)?;
        self.resolve_target(&target, from)
    }

    /// Resolve a parsed wiki link typed inside the note at `from`.
    pub fn resolve_link(&self, link: &WikiLink, from: Option<&str>) -> Option<Resolution<'a>> {
        let target = Target::from_link(link)?;
        self.resolve_target(&target, from)
    }

    fn resolve_target(&self, target: &Target, from: Option<&str>) -> Option<Resolution<'a>> {
        let from_folder = from.map(|path| NoteRef::from_path(path).folder);

        let by_name = self.notes.iter().filter(|note| target.matches_name(note));
        if let Some(note) = best_candidate(by_name, from_folder.as_deref()) {
            return Some(Resolution {
                note,
                kind: MatchKind::Name,
            });
        }

        let needle = target.as_path();
        let by_path = self
            .notes
            .iter()
            .filter(|note| note.path.to_lowercase().contains(&needle));
        best_candidate(by_path, from_folder.as_deref()).map(|note| Resolution {
            note,
            kind: MatchKind::PathSubstring,
        })
    }
}

fn best_candidate<'a, I>(candidates: I, from_folder: Option<&str>) -> Option<&'a NoteRef>
where
    I: Iterator<Item = &'a NoteRef>,
{
    candidates.min_by(|a, b| {
        let elsewhere = |n: &NoteRef| from_folder != Some(n.folder.as_str());
        (elsewhere(a), a.depth(), &a.path).cmp(&(elsewhere(b), b.depth(), &b.path))
    })
}
