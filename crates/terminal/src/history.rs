//! Command history with arrow-key style navigation.

use std::collections::VecDeque;

pub const DEFAULT_LIMIT: usize = 100;

/// Bounded command history, oldest first.
///
/// Blank lines and immediate repeats are not recorded. The cursor walks
/// backwards with [`History::previous`] and forwards with [`History::next`];
/// running past the newest entry returns to an empty prompt.
///
/// The HTTP terminal only rebuilds and pushes; arrow keys and storage are
/// handled by the page script, which keeps the same JSON array layout as
/// [`History::to_json`]. Cursor navigation and the JSON helpers are for
/// embedding the shell in other front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<String>,
    limit: usize,
    cursor: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
            cursor: None,
        }
    }

    /// Rebuild from stored entries, applying the same rules as [`History::push`].
    pub fn from_entries<I, S>(entries: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut history = Self::new(limit);
        for entry in entries {
            history.push(entry.as_ref());
        }
        history
    }

    pub fn push(&mut self, line: &str) {
        self.cursor = None;
        let line = line.trim();
        if line.is_empty() || self.entries.back().is_some_and(|last| last == line) {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_string());
    }

    /// Step to the previous (older) entry. Stays on the oldest once reached.
    pub fn previous(&mut self) -> Option<&str> {
        let index = match self.cursor {
            None => self.entries.len().checked_sub(1)?,
            Some(i) => i.saturating_sub(1),
        };
        self.cursor = Some(index);
        self.entries.get(index).map(String::as_str)
    }

    /// Step to the next (newer) entry, or `None` back at the prompt.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&str> {
        let index = self.cursor? + 1;
        if index >= self.entries.len() {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(index);
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON array of entries, the format kept in browser storage.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    pub fn from_json(json: &str, limit: usize) -> serde_json::Result<Self> {
        let entries: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries, limit))
    }
}
