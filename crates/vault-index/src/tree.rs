use serde::Serialize;

use crate::note::NoteRef;

/// Folder hierarchy of the vault for sidebar navigation.
///
/// Within each folder, subfolders come before notes and both are sorted
/// case-insensitively by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FolderTree {
    /// Folder name, "" for the vault root
    pub name: String,
    /// Folder path relative to the vault root, "" for the root
    pub path: String,
    pub folders: Vec<FolderTree>,
    pub notes: Vec<NoteRef>,
}

impl FolderTree {
    pub fn build(notes: &[NoteRef]) -> Self {
        let mut root = FolderTree::default();
        for note in notes {
            let segments: Vec<&str> = if note.folder.is_empty() {
                Vec::new()
            } else {
                note.folder.split('/').collect()
            };
            root.insert(&segments, note.clone());
        }
        root.sort();
        root
    }

    fn insert(&mut self, segments: &[&str], note: NoteRef) {
        let Some((first, rest)) = segments.split_first() else {
            self.notes.push(note);
            return;
        };

        let index = match self.folders.iter().position(|f| f.name == *first) {
            Some(index) => index,
            None => {
                let path = if self.path.is_empty() {
                    first.to_string()
                } else {
                    format!("{}/{}", self.path, first)
                };
                self.folders.push(FolderTree {
                    name: first.to_string(),
                    path,
                    ..Default::default()
                });
                self.folders.len() - 1
            }
        };
        self.folders[index].insert(rest, note);
    }

    fn sort(&mut self) {
        self.folders.sort_by_key(|f| (f.name.to_lowercase(), f.name.clone()));
        self.notes.sort_by_key(|n| (n.name.to_lowercase(), n.path.clone()));
        for folder in &mut self.folders {
            folder.sort();
        }
    }

    /// Total notes in this folder and all subfolders
    pub fn note_count(&self) -> usize {
        self.notes.len() + self.folders.iter().map(FolderTree::note_count).sum::<usize>()
    }

    /// Find a folder by its path ("" is the root)
    pub fn find(&self, path: &str) -> Option<&FolderTree> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Some(self);
        }
        path.split('/').try_fold(self, |folder, segment| {
            folder.folders.iter().find(|f| f.name == segment)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(paths: &[&str]) -> FolderTree {
        let notes: Vec<NoteRef> = paths.iter().map(|p| NoteRef::from_path(p)).collect();
        FolderTree::build(&notes)
    }

    #[test]
    fn build_nests_folders() {
        let root = tree(&["Index.md", "Projects/Garden.md", "Projects/Rust/Ownership.md"]);

        assert_eq!(root.notes.len(), 1);
        assert_eq!(root.folders.len(), 1);
        let projects = &root.folders[0];
        assert_eq!(projects.name, "Projects");
        assert_eq!(projects.path, "Projects");
        assert_eq!(projects.folders[0].path, "Projects/Rust");
        assert_eq!(projects.folders[0].notes[0].name, "Ownership");
        assert_eq!(root.note_count(), 3);
    }

    #[test]
    fn build_sorts_case_insensitively() {
        let root = tree(&["zeta.md", "Alpha.md", "beta/x.md", "Archive/y.md"]);

        let folders: Vec<&str> = root.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(folders, vec!["Archive", "beta"]);
        let notes: Vec<&str> = root.notes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(notes, vec!["Alpha", "zeta"]);
    }

    #[test]
    fn find_folder_by_path() {
        let root = tree(&["Projects/Rust/Ownership.md"]);

        assert_eq!(root.find("Projects/Rust").map(|f| f.note_count()), Some(1));
        assert_eq!(root.find("").map(|f| f.path.as_str()), Some(""));
        assert!(root.find("Projects/Go").is_none());
    }

    #[test]
    fn empty_note_list_builds_empty_root() {
        let root = tree(&[]);
        assert_eq!(root.note_count(), 0);
        assert!(root.folders.is_empty());
    }
}
