//! Inline HTML templates for the site pages

mod pages;
mod scripts;

pub use pages::{NoteView, garden_page, graph_page, landing_page};

use garden_render::{encode_path, escape_html};
use vault_index::FolderTree;

/// localStorage key for terminal history
pub const HISTORY_KEY: &str = "garden.terminal.history";

/// localStorage key for the corner graph widget position
pub const POSITION_KEY: &str = "garden.graph.position";

const FORCE_GRAPH_CDN: &str = "https://unpkg.com/force-graph@1.49.0/dist/force-graph.min.js";

#[derive(Clone, Copy, PartialEq)]
enum Nav {
    Home,
    Garden,
    Graph,
}

/// Shared page shell: head, navigation, body, then scripts.
fn layout(title: &str, site_name: &str, nav: Nav, body: &str, scripts: &str) -> String {
    let link = |href: &str, label: &str, item: Nav| {
        let class = if item == nav { r#" class="active""# } else { "" };
        format!(r#"<a href="{}"{}>{}</a>"#, href, class, label)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <header class="site-header">
        <a class="site-name" href="/">{site_name}</a>
        <nav>{home}{garden}{graph}</nav>
    </header>
    {body}
    <script>
    const HISTORY_KEY = '{history_key}';
    const POSITION_KEY = '{position_key}';
    </script>
    {scripts}
</body>
</html>"#,
        title = escape_html(title),
        css = CSS_STYLES,
        site_name = escape_html(site_name),
        home = link("/", "Home", Nav::Home),
        garden = link("/garden", "Garden", Nav::Garden),
        graph = link("/graph", "Graph", Nav::Graph),
        body = body,
        history_key = HISTORY_KEY,
        position_key = POSITION_KEY,
        scripts = scripts,
    )
}

/// Wrap inline JavaScript in a script tag.
fn script(js: &str) -> String {
    format!("<script>\n{}\n</script>", js)
}

fn force_graph_script() -> String {
    format!(r#"<script src="{}"></script>"#, FORCE_GRAPH_CDN)
}

/// Sidebar navigation: folders as open `<details>`, notes as links.
fn render_tree(tree: &FolderTree, current: Option<&str>) -> String {
    let mut out = String::from("<ul class=\"tree\">");
    for folder in &tree.folders {
        let open = current.is_some_and(|c| c.starts_with(&format!("{}/", folder.path)));
        out.push_str(&format!(
            "<li class=\"folder\"><details{}><summary>{}</summary>{}</details></li>",
            if open { " open" } else { "" },
            escape_html(&folder.name),
            render_tree(folder, current)
        ));
    }
    for note in &tree.notes {
        let class = if current == Some(note.path.as_str()) {
            "note active"
        } else {
            "note"
        };
        out.push_str(&format!(
            r#"<li class="{}"><a href="/garden/{}">{}</a></li>"#,
            class,
            encode_path(&note.path),
            escape_html(&note.name)
        ));
    }
    out.push_str("</ul>");
    out
}

/// The draggable corner widget showing a small graph.
fn corner_graph(data_url: &str) -> String {
    format!(
        r#"<aside id="corner-graph" class="corner-graph" data-url="{}">
        <div class="corner-graph-handle">graph <a href="/graph">expand</a></div>
        <div class="corner-graph-canvas"></div>
    </aside>"#,
        escape_html(data_url)
    )
}

const CSS_STYLES: &str = r#"
* {
    box-sizing: border-box;
}

:root {
    --bg: #101418;
    --panel: #171d23;
    --border: #2a333d;
    --text: #d8dee4;
    --muted: #8a96a3;
    --accent: #7ec699;
    --accent-2: #6cb6ff;
    --danger: #ff7b72;
}

body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    line-height: 1.6;
}

a {
    color: var(--accent-2);
    text-decoration: none;
}

a:hover {
    text-decoration: underline;
}

code, pre, .terminal {
    font-family: 'SF Mono', Menlo, Consolas, monospace;
}

.site-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px 32px;
    border-bottom: 1px solid var(--border);
}

.site-header nav a {
    margin-left: 20px;
    color: var(--muted);
}

.site-header nav a.active {
    color: var(--accent);
}

.site-name {
    font-weight: 600;
    color: var(--text);
}

.section {
    max-width: 860px;
    margin: 0 auto;
    padding: 48px 24px;
}

.hero h1 {
    font-size: 44px;
    margin: 0 0 8px;
}

.hero p {
    color: var(--muted);
    font-size: 20px;
}

.projects {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
    gap: 16px;
}

.project {
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 16px;
}

.terminal {
    background: #0b0e11;
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 12px 16px;
    height: 320px;
    overflow-y: auto;
    font-size: 14px;
    cursor: text;
}

.terminal-line {
    white-space: pre-wrap;
}

.terminal-input-row {
    display: flex;
}

.terminal-prompt {
    color: var(--accent);
    margin-right: 8px;
}

.terminal input {
    flex: 1;
    background: transparent;
    border: none;
    color: var(--text);
    font: inherit;
    outline: none;
}

.contact-form .field {
    margin-bottom: 16px;
}

.contact-form label {
    display: block;
    margin-bottom: 4px;
    color: var(--muted);
}

.contact-form input, .contact-form textarea {
    width: 100%;
    padding: 10px;
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 6px;
    color: var(--text);
    font: inherit;
}

button {
    padding: 10px 20px;
    background: var(--accent);
    color: #0b0e11;
    border: none;
    border-radius: 6px;
    font-weight: 600;
    cursor: pointer;
}

button:disabled {
    opacity: 0.6;
    cursor: not-allowed;
}

.status {
    margin-top: 16px;
    padding: 10px;
    border-radius: 6px;
}

.status.hidden {
    display: none;
}

.status.success {
    background: rgba(126, 198, 153, 0.15);
    color: var(--accent);
}

.status.error {
    background: rgba(255, 123, 114, 0.15);
    color: var(--danger);
}

.garden {
    display: grid;
    grid-template-columns: 260px 1fr;
    min-height: calc(100vh - 60px);
}

.sidebar {
    border-right: 1px solid var(--border);
    padding: 16px;
    overflow-y: auto;
    font-size: 14px;
}

.tree {
    list-style: none;
    padding-left: 12px;
    margin: 0;
}

.sidebar > .tree {
    padding-left: 0;
}

.tree summary {
    cursor: pointer;
    color: var(--muted);
}

.tree .note.active > a {
    color: var(--accent);
    font-weight: 600;
}

.note-content {
    max-width: 780px;
    padding: 24px 40px 80px;
}

.note-content pre {
    background: var(--panel);
    padding: 12px;
    border-radius: 6px;
    overflow-x: auto;
}

.note-content .embed img {
    max-width: 100%;
}

.tags .tag {
    display: inline-block;
    margin-right: 6px;
    padding: 0 8px;
    border-radius: 10px;
    background: var(--panel);
    color: var(--muted);
    font-size: 13px;
}

.wikilink-missing {
    color: var(--muted);
    text-decoration: underline dotted;
    cursor: help;
}

.callout {
    border-left: 4px solid var(--accent-2);
    background: var(--panel);
    border-radius: 4px;
    padding: 8px 16px;
    margin: 16px 0;
}

.callout-title {
    font-weight: 600;
}

.callout-warning, .callout-caution, .callout-danger, .callout-bug {
    border-left-color: var(--danger);
}

.callout-tip, .callout-success, .callout-check {
    border-left-color: var(--accent);
}

.error-panel {
    border: 1px solid var(--danger);
    border-radius: 8px;
    padding: 16px 24px;
    color: var(--danger);
}

.error-panel code {
    color: var(--text);
}

.corner-graph {
    position: fixed;
    right: 24px;
    bottom: 24px;
    width: 280px;
    height: 220px;
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 8px;
    overflow: hidden;
    z-index: 10;
}

.corner-graph-handle {
    display: flex;
    justify-content: space-between;
    padding: 4px 10px;
    font-size: 12px;
    color: var(--muted);
    border-bottom: 1px solid var(--border);
    cursor: move;
    user-select: none;
}

.corner-graph-canvas {
    width: 100%;
    height: calc(100% - 26px);
}

.graph-page {
    position: relative;
    height: calc(100vh - 60px);
}

.graph-controls {
    position: absolute;
    top: 16px;
    left: 16px;
    z-index: 5;
}

.graph-controls button {
    margin-right: 8px;
    background: var(--panel);
    color: var(--text);
    border: 1px solid var(--border);
}

.graph-controls button.active {
    border-color: var(--accent);
    color: var(--accent);
}

#graph {
    width: 100%;
    height: 100%;
}
"#;
