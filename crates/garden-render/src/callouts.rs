//! Callout post-pass over rendered HTML.
//!
//! A blockquote whose first paragraph opens with `[!type]` becomes a callout
//! box. `[!type]-` and `[!type]+` make it foldable (closed or open). Nested
//! blockquotes are converted independently, innermost first.

use once_cell::sync::Lazy;
use regex::Regex;

const OPEN: &str = "<blockquote>";
const CLOSE: &str = "</blockquote>";

static CALLOUT_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*<p>\[!([A-Za-z0-9_-]+)\]([+-]?)[ \t]*([^\n]*?)[ \t]*(\n|</p>)").unwrap()
});

pub fn transform_callouts(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find(OPEN) {
        out.push_str(&rest[..open]);
        let body = &rest[open + OPEN.len()..];

        let Some(close) = matching_close(body) else {
            // Unbalanced markup: leave the remainder as it is
            out.push_str(&rest[open..]);
            return out;
        };

        let inner = transform_callouts(&body[..close]);
        out.push_str(&render_blockquote(&inner));
        rest = &body[close + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// Byte offset of the `</blockquote>` closing the element whose body starts `html`.
fn matching_close(html: &str) -> Option<usize> {
    let mut depth = 1;
    let mut pos = 0;

    loop {
        let next_close = pos + html[pos..].find(CLOSE)?;
        match html[pos..].find(OPEN).map(|i| pos + i) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                pos = next_open + OPEN.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                pos = next_close + CLOSE.len();
            }
        }
    }
}

fn render_blockquote(inner: &str) -> String {
    let Some(caps) = CALLOUT_HEAD.captures(inner) else {
        return format!("{}{}{}", OPEN, inner, CLOSE);
    };

    let kind = caps[1].to_lowercase();
    let title = match caps[3].trim() {
        "" => capitalize(&kind),
        title => title.to_string(),
    };
    let remainder = &inner[caps.get(0).map_or(0, |m| m.end())..];
    // The head line either closed its paragraph or the paragraph continues
    let content = if &caps[4] == "\n" {
        format!("<p>{}", remainder)
    } else {
        remainder.to_string()
    };

    match &caps[2] {
        "" => format!(
            "<div class=\"callout callout-{kind}\" data-callout=\"{kind}\">\n\
             <div class=\"callout-title\">{title}</div>\n\
             <div class=\"callout-content\">{content}</div>\n</div>\n"
        ),
        fold => format!(
            "<details class=\"callout callout-{kind}\" data-callout=\"{kind}\"{open}>\n\
             <summary class=\"callout-title\">{title}</summary>\n\
             <div class=\"callout-content\">{content}</div>\n</details>\n",
            open = if fold == "+" { " open" } else { "" }
        ),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
