//! YAML frontmatter parsing for vault notes
//!
//! Parses the YAML frontmatter block at the start of markdown files:
//! ```markdown
//! ---
//! title: My Note
//! tags: [rust, garden]
//! ---
//!
//! Note content here...
//! ```

use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Parsed frontmatter as a map of string keys to JSON values.
/// Using JSON values allows flexible typing (strings, numbers, arrays, objects).
pub type Frontmatter = HashMap<String, JsonValue>;

/// A parsed note with frontmatter separated from content.
///
/// The `content` field borrows from `raw` to avoid unnecessary allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNote<'a> {
    /// The frontmatter key-value pairs, if present
    pub frontmatter: Option<Frontmatter>,
    /// The note content after the frontmatter (borrows from raw)
    pub content: &'a str,
    /// The raw file content (frontmatter + content)
    pub raw: &'a str,
}

/// Split a note into frontmatter YAML string and content, without parsing the YAML.
///
/// Returns (frontmatter_yaml, content) where frontmatter_yaml is None if
/// no valid frontmatter block was found.
pub fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    // Frontmatter must open on the very first line
    let Some(body) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };

    let Some(close_pos) = find_closing_delimiter(body) else {
        return (None, raw);
    };

    let yaml = &body[..close_pos];
    let rest = &body[close_pos + 3..];
    let content = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    (Some(yaml), content)
}

/// Find the byte position of the closing --- delimiter (must be a whole line)
fn find_closing_delimiter(s: &str) -> Option<usize> {
    let mut pos = 0;
    for line in s.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some(pos);
        }
        pos += line.len();
    }
    None
}

/// Parse a note's raw content into frontmatter and content.
///
/// The frontmatter is parsed as YAML and converted to a HashMap with JSON values.
/// The returned `ParsedNote` borrows from the input string.
pub fn parse_frontmatter(raw: &str) -> ParsedNote<'_> {
    let (yaml_str, content) = split_frontmatter(raw);

    let frontmatter = yaml_str.and_then(|yaml| {
        // Parse YAML to serde_yaml::Value, then convert to JSON Value
        serde_yaml::from_str::<serde_yaml::Value>(yaml)
            .ok()
            .and_then(yaml_to_json_map)
    });

    ParsedNote {
        frontmatter,
        content,
        raw,
    }
}

impl ParsedNote<'_> {
    /// A string-valued frontmatter field, trimmed; empty strings count as absent.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.frontmatter
            .as_ref()?
            .get(key)?
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Frontmatter tags, accepting either a YAML list or a comma-separated string.
    pub fn tags(&self) -> Vec<String> {
        let Some(value) = self.frontmatter.as_ref().and_then(|fm| fm.get("tags")) else {
            return Vec::new();
        };
        match value {
            JsonValue::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().trim_start_matches('#').to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            JsonValue::String(s) => s
                .split(',')
                .map(|t| t.trim().trim_start_matches('#').to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Convert a YAML value to a JSON HashMap (for the top-level frontmatter)
fn yaml_to_json_map(yaml: serde_yaml::Value) -> Option<Frontmatter> {
    match yaml {
        serde_yaml::Value::Mapping(map) => {
            let mut result = HashMap::new();
            for (k, v) in map {
                if let serde_yaml::Value::String(key) = k {
                    result.insert(key, yaml_to_json(v));
                }
            }
            if result.is_empty() {
                None
            } else {
                Some(result)
            }
        }
        _ => None,
    }
}

/// Convert a YAML value to a JSON value
fn yaml_to_json(yaml: serde_yaml::Value) -> JsonValue {
    match yaml {
        serde_yaml::Value::Null => JsonValue::Null,
        serde_yaml::Value::Bool(b) => JsonValue::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::Number(i.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            } else {
                JsonValue::Null
            }
        }
        serde_yaml::Value::String(s) => JsonValue::String(s),
        serde_yaml::Value::Sequence(seq) => {
            JsonValue::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let obj: serde_json::Map<String, JsonValue> = map
                .into_iter()
                .filter_map(|(k, v)| {
                    if let serde_yaml::Value::String(key) = k {
                        Some((key, yaml_to_json(v)))
                    } else {
                        None
                    }
                })
                .collect();
            JsonValue::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}
