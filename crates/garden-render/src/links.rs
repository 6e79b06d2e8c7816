//! Wiki-link pre-pass: turns `[[...]]` tokens into inline HTML before the
//! markdown parser sees them. Code blocks and inline code are left alone.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use vault_index::LinkResolver;
use wiki_links::{WikiLink, find_wiki_links, replace_wiki_links};

use crate::RenderOptions;
use crate::html::{encode_path, escape, slugify};

/// Fenced code blocks (``` or ~~~) and single-line inline code spans.
static CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^[ \t]*```.*?^[ \t]*```[^\n]*$|^[ \t]*~~~.*?^[ \t]*~~~[^\n]*$|`[^`\n]+`")
        .unwrap()
});

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "avif"];

/// A wiki link found while rendering, with the path it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkInfo {
    pub target: String,
    pub display: String,
    pub resolved: Option<String>,
    pub embed: bool,
}

pub(crate) struct LinkPass<'a> {
    pub notes: LinkResolver<'a>,
    pub attachments: LinkResolver<'a>,
    pub options: &'a RenderOptions,
    /// Vault path of the note being rendered
    pub from: &'a str,
}

impl LinkPass<'_> {
    /// Rewrite every wiki link outside code, collecting what was found.
    pub fn run(&self, markdown: &str) -> (String, Vec<LinkInfo>) {
        let mut links = Vec::new();
        let mut out = String::with_capacity(markdown.len());
        let mut last = 0;

        for code in protected_ranges(markdown) {
            out.push_str(&self.rewrite(&markdown[last..code.start], &mut links));
            out.push_str(&markdown[code.clone()]);
            last = code.end;
        }
        out.push_str(&self.rewrite(&markdown[last..], &mut links));

        (out, links)
    }

    fn rewrite(&self, text: &str, links: &mut Vec<LinkInfo>) -> String {
        replace_wiki_links(text, |link| {
            let (html, info) = self.render_link(link);
            links.push(info);
            html
        })
    }

    fn render_link(&self, link: &WikiLink) -> (String, LinkInfo) {
        let display = display_text(link);

        if link.is_same_note() {
            let fragment = fragment(link).unwrap_or_default();
            let html = format!(
                r##"<a class="wikilink" href="#{}">{}</a>"##,
                escape(&fragment),
                escape(&display)
            );
            let info = LinkInfo {
                target: String::new(),
                display,
                resolved: Some(self.from.to_string()),
                embed: link.is_embed,
            };
            return (html, info);
        }

        let is_image = link.is_embed
            && link
                .extension
                .as_deref()
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

        let resolved = if is_image {
            self.attachments
                .resolve_link(link, Some(self.from))
                .or_else(|| self.notes.resolve_link(link, Some(self.from)))
        } else {
            self.notes.resolve_link(link, Some(self.from))
        };

        let html = match resolved {
            // A bare <img> alone on a line would open a raw HTML block and
            // swallow the markdown on the lines after it.
            Some(resolution) if is_image => format!(
                r#"<span class="embed"><img src="{}/{}" alt="{}"></span>"#,
                self.options.asset_base.trim_end_matches('/'),
                encode_path(&resolution.note.path),
                escape(link.alias.as_deref().unwrap_or(&link.name))
            ),
            Some(resolution) => {
                let class = if link.is_embed {
                    "wikilink embed"
                } else {
                    "wikilink"
                };
                let anchor = fragment(link)
                    .map(|f| format!("#{}", escape(&f)))
                    .unwrap_or_default();
                format!(
                    r#"<a class="{}" href="{}/{}{}" data-note="{}">{}</a>"#,
                    class,
                    self.options.note_base.trim_end_matches('/'),
                    encode_path(&resolution.note.path),
                    anchor,
                    escape(&resolution.note.path),
                    escape(&display)
                )
            }
            None => format!(
                r#"<span class="wikilink wikilink-missing" title="Note not found">{}</span>"#,
                escape(&display)
            ),
        };

        let info = LinkInfo {
            target: link.target(),
            display,
            resolved: resolved.map(|r| r.note.path.clone()),
            embed: link.is_embed,
        };
        (html, info)
    }
}

/// Byte ranges of code that must not be rewritten, in source order.
///
/// Inline code inside a link's alias belongs to the link, not the other way round.
fn protected_ranges(markdown: &str) -> Vec<Range<usize>> {
    let links = find_wiki_links(markdown);
    CODE.find_iter(markdown)
        .map(|m| m.range())
        .filter(|code| {
            !links
                .iter()
                .any(|span| span.range.start < code.start && code.end < span.range.end)
        })
        .collect()
}

fn display_text(link: &WikiLink) -> String {
    if let Some(alias) = &link.alias {
        return alias.clone();
    }
    match (&link.header, &link.block_id) {
        (Some(header), _) if link.is_same_note() => header.clone(),
        (Some(header), _) => format!("{} > {}", link.name, header),
        _ => link.name.clone(),
    }
}

/// Anchor for a link fragment: headings are slugged, block ids kept as `^id`.
fn fragment(link: &WikiLink) -> Option<String> {
    link.header
        .as_deref()
        .map(slugify)
        .or_else(|| link.block_id.as_ref().map(|id| format!("^{}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_index::NoteRef;

    fn refs(paths: &[&str]) -> Vec<NoteRef> {
        paths.iter().map(|p| NoteRef::from_path(p)).collect()
    }

    fn run(markdown: &str) -> (String, Vec<LinkInfo>) {
        let notes = refs(&["Index.md", "Projects/Garden Design.md"]);
        let attachments = refs(&["assets/diagram.png"]);
        let options = RenderOptions {
            note_base: "/garden".to_string(),
            asset_base: "https://raw.example.com/me/vault/main".to_string(),
        };
        let pass = LinkPass {
            notes: LinkResolver::new(&notes),
            attachments: LinkResolver::new(&attachments),
            options: &options,
            from: "Index.md",
        };
        pass.run(markdown)
    }

    #[test]
    fn resolved_link_becomes_anchor() {
        let (html, links) = run("See [[Garden Design]].");

        assert_eq!(
            html,
            r#"See <a class="wikilink" href="/garden/Projects/Garden%20Design.md" data-note="Projects/Garden Design.md">Garden Design</a>."#
        );
        assert_eq!(links[0].resolved.as_deref(), Some("Projects/Garden Design.md"));
    }

    #[test]
    fn missing_link_becomes_notice() {
        let (html, links) = run("[[Nowhere|go <there>]]");

        assert_eq!(
            html,
            r#"<span class="wikilink wikilink-missing" title="Note not found">go &lt;there&gt;</span>"#
        );
        assert_eq!(links[0].resolved, None);
        assert_eq!(links[0].target, "Nowhere");
    }

    #[test]
    fn header_links_get_slugged_anchor() {
        let (html, _) = run("[[Garden Design#Soil & Water]]");

        assert!(html.contains(r#"href="/garden/Projects/Garden%20Design.md#soil-water""#));
        assert!(html.contains(">Garden Design &gt; Soil &amp; Water</a>"));
    }

    #[test]
    fn same_note_link_points_at_heading() {
        let (html, links) = run("[[#Next Steps]]");

        assert_eq!(html, r##"<a class="wikilink" href="#next-steps">Next Steps</a>"##);
        assert_eq!(links[0].resolved.as_deref(), Some("Index.md"));
    }

    #[test]
    fn image_embed_uses_asset_base() {
        let (html, _) = run("![[diagram.png]]");

        assert_eq!(
            html,
            r#"<span class="embed"><img src="https://raw.example.com/me/vault/main/assets/diagram.png" alt="diagram"></span>"#
        );
    }

    #[test]
    fn inline_code_in_alias_stays_in_the_link() {
        let (html, links) = run("[[Index|`main`]] and `[[Index]]`");

        assert!(
            html.starts_with(r#"<a class="wikilink" href="/garden/Index.md" data-note="Index.md">`main`</a>"#)
        );
        assert!(html.ends_with(" and `[[Index]]`"));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].display, "`main`");
    }

    #[test]
    fn code_is_left_untouched() {
        let markdown = "Use `[[Index]]` literally.\n\n```\n[[Index]]\n```\n\nBut [[Index]] here.";
        let (html, links) = run(markdown);

        assert!(html.contains("`[[Index]]`"));
        assert!(html.contains("```\n[[Index]]\n```"));
        assert!(
            html.ends_with(r#"But <a class="wikilink" href="/garden/Index.md" data-note="Index.md">Index</a> here."#)
        );
        assert_eq!(links.len(), 1);
    }
}
