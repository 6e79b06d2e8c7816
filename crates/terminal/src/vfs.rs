//! In-memory filesystem the terminal walks around in.

use std::collections::BTreeMap;

use thiserror::Error;

pub const HOME: &str = "/home/guest";

/// Errors carry the operand as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    #[error("{0}: no such file or directory")]
    NotFound(String),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("{0}: is a directory")]
    IsADirectory(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Dir(BTreeMap<String, Node>),
    File(String),
}

impl Node {
    fn dir() -> Self {
        Node::Dir(BTreeMap::new())
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }
}

/// One directory entry as `ls` shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vfs {
    root: Node,
}

impl Default for Vfs {
    fn default() -> Self {
        let mut vfs = Self { root: Node::dir() };
        let files = [
            (
                "~/about.txt",
                "Hi, I'm a developer who likes small tools, plain text and well-kept notes.\n\
                 Most of what I learn ends up in the garden: try `open garden`.",
            ),
            (
                "~/projects.txt",
                "garden     - this site, a markdown vault rendered on the fly\n\
                 graph      - force-directed map of how the notes link together\n\
                 terminal   - you are here",
            ),
            (
                "~/contact.txt",
                "Use the contact form below, or `open contact` to jump there.",
            ),
            (
                "~/notes/todo.txt",
                "- water the garden\n- link more notes\n- find the fortune command",
            ),
            ("/etc/motd", "Welcome! Type `help` to see what this shell can do."),
            ("/etc/hostname", "garden"),
        ];
        for (path, content) in files {
            // Paths above are static and never cross a file
            let _ = vfs.insert_file(path, content);
        }
        vfs
    }
}

impl Vfs {
    /// An empty filesystem holding only the home directory.
    pub fn empty() -> Self {
        let mut vfs = Self { root: Node::dir() };
        let _ = vfs.create_dirs(&segments(HOME));
        vfs
    }

    /// Add or replace a file, creating parent directories as needed.
    ///
    /// `path` is absolute or relative to the home directory.
    pub fn insert_file(&mut self, path: &str, content: &str) -> Result<(), VfsError> {
        let abs = resolve_path(HOME, path);
        let mut parts = segments(&abs);
        let Some(name) = parts.pop() else {
            return Err(VfsError::IsADirectory(path.to_string()));
        };

        let parent = self
            .create_dirs(&parts)
            .ok_or_else(|| VfsError::NotADirectory(path.to_string()))?;
        if parent.get(name).is_some_and(Node::is_dir) {
            return Err(VfsError::IsADirectory(path.to_string()));
        }
        parent.insert(name.to_string(), Node::File(content.to_string()));
        Ok(())
    }

    fn create_dirs(&mut self, parts: &[&str]) -> Option<&mut BTreeMap<String, Node>> {
        let mut current = &mut self.root;
        for part in parts {
            let Node::Dir(children) = current else {
                return None;
            };
            current = children.entry(part.to_string()).or_insert_with(Node::dir);
        }
        match current {
            Node::Dir(children) => Some(children),
            Node::File(_) => None,
        }
    }

    /// Resolve `operand` against `cwd` and find its node.
    pub fn lookup(&self, cwd: &str, operand: &str) -> Result<(String, &Node), VfsError> {
        let abs = resolve_path(cwd, operand);
        let mut current = &self.root;
        for part in segments(&abs) {
            current = match current {
                Node::Dir(children) => children
                    .get(part)
                    .ok_or_else(|| VfsError::NotFound(operand.to_string()))?,
                Node::File(_) => return Err(VfsError::NotADirectory(operand.to_string())),
            };
        }
        Ok((abs, current))
    }

    /// The absolute path of a directory, for `cd`.
    pub fn directory(&self, cwd: &str, operand: &str) -> Result<String, VfsError> {
        match self.lookup(cwd, operand)? {
            (abs, Node::Dir(_)) => Ok(abs),
            (_, Node::File(_)) => Err(VfsError::NotADirectory(operand.to_string())),
        }
    }

    /// Directory entries in name order. Listing a file yields the file itself.
    pub fn list(&self, cwd: &str, operand: &str) -> Result<Vec<Entry>, VfsError> {
        match self.lookup(cwd, operand)? {
            (_, Node::Dir(children)) => Ok(children
                .iter()
                .map(|(name, node)| Entry {
                    name: name.clone(),
                    is_dir: node.is_dir(),
                })
                .collect()),
            (abs, Node::File(_)) => Ok(vec![Entry {
                name: abs.rsplit('/').next().unwrap_or_default().to_string(),
                is_dir: false,
            }]),
        }
    }

    pub fn read(&self, cwd: &str, operand: &str) -> Result<&str, VfsError> {
        match self.lookup(cwd, operand)? {
            (_, Node::File(content)) => Ok(content.as_str()),
            (_, Node::Dir(_)) => Err(VfsError::IsADirectory(operand.to_string())),
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.lookup("/", path).is_ok_and(|(_, node)| node.is_dir())
    }
}

fn segments(abs: &str) -> Vec<&str> {
    abs.split('/').filter(|s| !s.is_empty()).collect()
}

/// Normalize `path` against `cwd` into an absolute path.
///
/// `~` expands to the home directory; `..` at the root stays at the root.
pub fn resolve_path(cwd: &str, path: &str) -> String {
    let path = path.trim();
    let joined = if path == "~" {
        HOME.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{}", HOME, rest)
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{}/{}", cwd, path)
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            part => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Absolute path as the prompt shows it, with the home directory as `~`.
pub fn display_path(abs: &str) -> String {
    if abs == HOME {
        "~".to_string()
    } else if let Some(rest) = abs.strip_prefix(HOME).and_then(|r| r.strip_prefix('/')) {
        format!("~/{}", rest)
    } else {
        abs.to_string()
    }
}
