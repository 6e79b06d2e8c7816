//! Markdown rendering for vault notes
//!
//! The pipeline around pulldown-cmark:
//! 1. Split off YAML frontmatter
//! 2. Rewrite `[[wiki links]]` to inline HTML (outside of code)
//! 3. Render markdown, adding heading ids and collecting the outline
//! 4. Convert `> [!type]` blockquotes into callout boxes

mod callouts;
mod html;
mod links;
mod markdown;

pub use callouts::transform_callouts;
pub use html::{encode_path, escape as escape_html, slugify};
pub use links::LinkInfo;
pub use markdown::{Heading, render_markdown};

use serde::Serialize;
use vault_index::{Frontmatter, LinkResolver, NoteRef, parse_frontmatter};

use crate::links::LinkPass;

/// Where rendered links point.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// URL prefix of the note viewer, e.g. "/garden"
    pub note_base: String,
    /// URL prefix for raw vault files, used by image embeds
    pub asset_base: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            note_base: "/garden".to_string(),
            asset_base: String::new(),
        }
    }
}

/// A note rendered to HTML with everything the viewer shows around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedNote {
    pub path: String,
    pub title: String,
    pub html: String,
    pub headings: Vec<Heading>,
    pub links: Vec<LinkInfo>,
    pub tags: Vec<String>,
    pub frontmatter: Option<Frontmatter>,
}

/// Renders notes of one vault listing.
pub struct Renderer<'a> {
    notes: LinkResolver<'a>,
    attachments: LinkResolver<'a>,
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    /// `notes` are link targets; `attachments` are files image embeds may point at.
    pub fn new(
        notes: &'a [NoteRef],
        attachments: &'a [NoteRef],
        options: &'a RenderOptions,
    ) -> Self {
        Self {
            notes: LinkResolver::new(notes),
            attachments: LinkResolver::new(attachments),
            options,
        }
    }

    pub fn render(&self, note: &NoteRef, raw: &str) -> RenderedNote {
        let parsed = parse_frontmatter(raw);

        let pass = LinkPass {
            notes: self.notes,
            attachments: self.attachments,
            options: self.options,
            from: &note.path,
        };
        let (markdown, links) = pass.run(parsed.content);
        let (html, headings) = render_markdown(&markdown);
        let html = transform_callouts(&html);

        let title = parsed
            .field_str("title")
            .map(str::to_string)
            .or_else(|| {
                headings
                    .iter()
                    .find(|h| h.level == 1)
                    .map(|h| h.text.clone())
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| note.name.clone());

        RenderedNote {
            path: note.path.clone(),
            title,
            html,
            headings,
            links,
            tags: parsed.tags(),
            frontmatter: parsed.frontmatter.clone(),
        }
    }
}
