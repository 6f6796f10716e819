//! Front matter splitting: `---\nYAML\n---`

use postgraph_core::{Document, Error, Frontmatter, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Matches a leading YAML block; the closing fence may end the file.
static FRONTMATTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---[ \t]*\r?\n([\s\S]*?)\r?\n---[ \t]*(?:\r?\n|$)").unwrap()
});

/// Split `content` into (front matter YAML, body).
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    match FRONTMATTER_PATTERN.captures(content) {
        Some(caps) => {
            let yaml = caps.get(1).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            (Some(yaml), &content[end..])
        }
        None => (None, content),
    }
}

/// Parse a YAML mapping into [`Frontmatter`]. Non-mapping YAML yields `None`.
pub fn parse_frontmatter(yaml: &str) -> Result<Option<Frontmatter>> {
    match serde_yaml::from_str::<serde_json::Value>(yaml) {
        Ok(serde_json::Value::Object(map)) => Ok(Some(Frontmatter::new(map.into_iter().collect()))),
        Ok(_) => Ok(None),
        Err(e) => Err(Error::parse_error(format!("Invalid front matter: {}", e))),
    }
}

/// Build a [`Document`] from the raw text of a content file.
///
/// Malformed front matter is an error; callers decide whether to skip the
/// file or fall back to [`Document::new`].
///
/// ```
/// use postgraph_parser::parse_document;
///
/// let doc = parse_document("notes/a", "---\ntitle: A\ntags: [x]\n---\nSee [b](./b).").unwrap();
/// assert_eq!(doc.title.as_deref(), Some("A"));
/// assert_eq!(doc.tags, vec!["x"]);
/// assert_eq!(doc.body, "See [b](./b).");
/// ```
pub fn parse_document(id: &str, content: &str) -> Result<Document> {
    let (yaml, body) = split_frontmatter(content);
    let frontmatter = match yaml {
        Some(yaml) => parse_frontmatter(yaml)?,
        None => None,
    };

    Ok(match frontmatter {
        Some(fm) => Document::from_frontmatter(id, body, fm),
        None => Document::new(id, body),
    })
}
