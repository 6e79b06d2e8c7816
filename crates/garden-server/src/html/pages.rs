//! Page bodies

use garden_render::{RenderedNote, encode_path, escape_html};
use vault_index::FolderTree;

use super::{Nav, corner_graph, force_graph_script, layout, render_tree, script, scripts};
use crate::config::Config;
use crate::contact::MIN_MESSAGE_CHARS;

/// What the garden's content area shows.
pub enum NoteView<'a> {
    Note(&'a RenderedNote),
    Error { path: &'a str, message: String },
}

pub fn landing_page(config: &Config) -> String {
    let site = &config.site;

    let about: String = site
        .about
        .iter()
        .map(|p| format!("<p>{}</p>", escape_html(p)))
        .collect();

    let projects: String = site
        .projects
        .iter()
        .map(|project| {
            let name = match &project.url {
                Some(url) => format!(
                    r#"<a href="{}">{}</a>"#,
                    escape_html(url),
                    escape_html(&project.name)
                ),
                None => escape_html(&project.name),
            };
            format!(
                r#"<div class="project"><h3>{}</h3><p>{}</p></div>"#,
                name,
                escape_html(&project.description)
            )
        })
        .collect();

    let links: String = site
        .links
        .iter()
        .map(|link| {
            format!(
                r#"<a href="{}">{}</a> "#,
                escape_html(&link.url),
                escape_html(&link.label)
            )
        })
        .collect();

    let body = format!(
        r#"<main>
    <section class="section hero">
        <h1>{owner}</h1>
        <p>{tagline}</p>
        <p class="links">{links}</p>
    </section>

    <section id="about" class="section">
        <h2>About</h2>
        {about}
    </section>

    <section id="projects" class="section">
        <h2>Projects</h2>
        <div class="projects">{projects}</div>
    </section>

    <section id="terminal-section" class="section">
        <h2>Terminal</h2>
        <div id="terminal" class="terminal">
            <div id="terminal-output"></div>
            <div class="terminal-input-row">
                <span id="terminal-prompt" class="terminal-prompt">{prompt}</span>
                <input id="terminal-input" type="text" autocomplete="off" spellcheck="false" aria-label="Terminal input">
            </div>
        </div>
    </section>

    <section id="contact" class="section">
        <h2>Contact</h2>
        <form id="contact-form" class="contact-form" novalidate>
            <div class="field">
                <label for="contact-name">Name</label>
                <input type="text" id="contact-name" name="name" required>
            </div>
            <div class="field">
                <label for="contact-email">Email</label>
                <input type="email" id="contact-email" name="email" required>
            </div>
            <div class="field">
                <label for="contact-message">Message</label>
                <textarea id="contact-message" name="message" rows="6" minlength="{min_chars}" required></textarea>
            </div>
            <button type="submit" id="contact-submit">Send</button>
        </form>
        <div id="contact-status" class="status hidden"></div>
    </section>
</main>
{corner}"#,
        owner = escape_html(&site.owner_name),
        tagline = escape_html(&site.tagline),
        links = links,
        about = about,
        projects = projects,
        prompt = escape_html(&format!(
            "{}@{}:~$",
            config.terminal.user, config.terminal.host
        )),
        min_chars = MIN_MESSAGE_CHARS,
        corner = corner_graph("/api/graph?mode=links"),
    );

    let scripts = [
        force_graph_script(),
        script(scripts::graph_widget_js()),
        script(scripts::terminal_js()),
        script(scripts::contact_js()),
    ]
    .concat();

    layout(&site.owner_name, &site.owner_name, Nav::Home, &body, &scripts)
}

pub fn garden_page(config: &Config, tree: &FolderTree, view: &NoteView<'_>) -> String {
    let site = &config.site;

    let (title, current, content) = match view {
        NoteView::Note(note) => (note.title.clone(), Some(note.path.as_str()), note_article(note)),
        NoteView::Error { path, message } => (
            "Note unavailable".to_string(),
            None,
            error_panel(path, message),
        ),
    };

    let corner = match current {
        Some(path) => corner_graph(&format!(
            "/api/graph?mode=links&depth=1&focus={}",
            urlencoding::encode(path)
        )),
        None => String::new(),
    };

    let body = format!(
        r#"<div class="garden">
    <nav class="sidebar" aria-label="Vault">{tree}</nav>
    <main class="note-content">{content}</main>
</div>
{corner}"#,
        tree = render_tree(tree, current),
        content = content,
        corner = corner,
    );

    let scripts = [force_graph_script(), script(scripts::graph_widget_js())].concat();

    layout(
        &format!("{} - {}", title, site.owner_name),
        &site.owner_name,
        Nav::Garden,
        &body,
        &scripts,
    )
}

fn note_article(note: &RenderedNote) -> String {
    let tags: String = note
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">#{}</span>"#, escape_html(tag)))
        .collect();

    let outline: String = note
        .headings
        .iter()
        .filter(|h| h.level > 1 && h.level <= 3)
        .map(|h| {
            format!(
                r##"<li class="level-{}"><a href="#{}">{}</a></li>"##,
                h.level,
                escape_html(&h.slug),
                escape_html(&h.text)
            )
        })
        .collect();
    let outline = if outline.is_empty() {
        String::new()
    } else {
        format!(r#"<nav class="outline"><ul>{}</ul></nav>"#, outline)
    };

    format!(
        r#"<article class="note" data-path="{path}">
        <p class="breadcrumb"><a href="/garden/{href}">{path}</a></p>
        <div class="tags">{tags}</div>
        {outline}
        {html}
    </article>"#,
        path = escape_html(&note.path),
        href = encode_path(&note.path),
        tags = tags,
        outline = outline,
        html = note.html,
    )
}

fn error_panel(path: &str, message: &str) -> String {
    format!(
        r#"<div class="error-panel" role="alert">
        <h2>Could not load note</h2>
        <p><code>{}</code></p>
        <p>{}</p>
        <p><a href="/garden">Back to the garden</a></p>
    </div>"#,
        escape_html(path),
        escape_html(message)
    )
}

pub fn graph_page(config: &Config) -> String {
    let body = r#"<main class="graph-page">
    <div class="graph-controls">
        <button type="button" data-mode="links" class="active">Links</button>
        <button type="button" data-mode="folders">Folders</button>
    </div>
    <div id="graph"></div>
</main>"#;

    let scripts = [force_graph_script(), script(scripts::graph_page_js())].concat();

    layout(
        &format!("Graph - {}", config.site.owner_name),
        &config.site.owner_name,
        Nav::Graph,
        body,
        &scripts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_render::Heading;

    fn rendered() -> RenderedNote {
        RenderedNote {
            path: "Projects/Garden Design.md".to_string(),
            title: "Garden Design".to_string(),
            html: "<h1 id=\"garden-design\">Garden Design</h1>\n<h2 id=\"soil\">Soil</h2>\n"
                .to_string(),
            headings: vec![
                Heading {
                    level: 1,
                    text: "Garden Design".to_string(),
                    slug: "garden-design".to_string(),
                },
                Heading {
                    level: 2,
                    text: "Soil".to_string(),
                    slug: "soil".to_string(),
                },
            ],
            links: Vec::new(),
            tags: vec!["garden".to_string()],
            frontmatter: None,
        }
    }

    #[test]
    fn landing_page_has_all_sections() {
        let html = landing_page(&Config::default());

        for id in ["about", "projects", "terminal", "contact", "corner-graph"] {
            assert!(html.contains(&format!("id=\"{}\"", id)), "missing #{id}");
        }
        assert!(html.contains("guest@garden:~$"));
        assert!(html.contains("/api/terminal"));
        assert!(html.contains("/api/contact"));
    }

    #[test]
    fn garden_page_shows_note_with_outline_and_focus() {
        let note = rendered();
        let tree = FolderTree::default();
        let html = garden_page(&Config::default(), &tree, &NoteView::Note(&note));

        assert!(html.contains("<title>Garden Design - Guest Gardener</title>"));
        assert!(html.contains(r#"<span class="tag">#garden</span>"#));
        assert!(html.contains(r##"<a href="#soil">Soil</a>"##));
        assert!(html.contains("focus=Projects%2FGarden%20Design.md"));
    }

    #[test]
    fn garden_page_renders_error_panel_with_path() {
        let tree = FolderTree::default();
        let view = NoteView::Error {
            path: "Nope/<Missing>.md",
            message: "not found".to_string(),
        };
        let html = garden_page(&Config::default(), &tree, &view);

        assert!(html.contains(r#"class="error-panel""#));
        assert!(html.contains("<code>Nope/&lt;Missing&gt;.md</code>"));
        assert!(!html.contains("corner-graph\""));
    }

    #[test]
    fn graph_page_loads_force_graph() {
        let html = graph_page(&Config::default());
        assert!(html.contains("force-graph"));
        assert!(html.contains(r#"data-mode="folders""#));
    }
}
