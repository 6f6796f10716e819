//! Core data models shared by every postgraph crate.
//!
//! A [`Document`] is one blog post or sub-post. Documents are produced once per
//! build by the content loader, wrapped in `Arc`, and never mutated afterwards;
//! the [`Corpus`] is the ordered, cheaply cloneable collection of them.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Position in source text. `column` counts characters, `offset` bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl SourcePosition {
    /// Create a new source position
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// Resolve a byte span against a pre-computed line index.
    pub fn from_offset_indexed(index: &LineIndex<'_>, offset: usize, length: usize) -> Self {
        let (line, column) = index.line_col(offset);
        Self::new(line, column, offset, length)
    }
}

/// Line starts of a text, for O(log n) line/column lookups.
///
/// Columns count characters, not bytes, so they match what an editor shows
/// for non-ASCII text.
///
/// ```
/// use postgraph_core::LineIndex;
///
/// let index = LineIndex::new("first\nsecond [x](./y)");
/// assert_eq!(index.line_col(13), (2, 8));
///
/// let index = LineIndex::new("日本語 [x](./y)");
/// assert_eq!(index.line_col(10), (1, 5));
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Scan `text` once and record where each line begins.
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// 1-based (line, column) of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .max(1);
        let start = self.line_starts[line - 1];
        let column = match self.text.get(start..offset) {
            Some(prefix) => prefix.chars().count(),
            None => offset - start,
        };
        (line, column + 1)
    }
}

/// YAML front matter of a document, kept as loosely typed JSON values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Frontmatter {
    pub data: HashMap<String, serde_json::Value>,
}

impl Frontmatter {
    /// Wrap an already parsed key/value map.
    pub fn new(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }

    /// `title` field, if it is a string
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(|v| v.as_str())
    }

    /// Extract tags; a bare string counts as a single tag
    pub fn tags(&self) -> Vec<String> {
        match self.data.get("tags") {
            Some(serde_json::Value::String(s)) => vec![s.clone()],
            Some(serde_json::Value::Array(arr)) => arr
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            _ => vec![],
        }
    }

    /// Publication date. Accepts `YYYY-MM-DD` and RFC 3339 timestamps.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.data.get("date")?.as_str()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }

    /// `draft: true` marks a document as unpublished
    pub fn is_draft(&self) -> bool {
        self.data
            .get("draft")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// One post or sub-post of the blog.
///
/// `id` is a forward-slash path without extension or leading slash
/// (`"series/part-one"`); nested segments denote parent/child documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<Frontmatter>,
}

impl Document {
    /// Create a document with no title, tags or front matter
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            tags: Vec::new(),
            body: body.into(),
            frontmatter: None,
        }
    }

    /// Create a document whose title and tags come from its front matter
    pub fn from_frontmatter(
        id: impl Into<String>,
        body: impl Into<String>,
        frontmatter: Frontmatter,
    ) -> Self {
        Self {
            id: id.into(),
            title: frontmatter.title().map(str::to_string),
            tags: frontmatter.tags(),
            body: body.into(),
            frontmatter: Some(frontmatter),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Display name: the front matter title, or the id when untitled
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.frontmatter.as_ref().and_then(Frontmatter::date)
    }

    pub fn is_draft(&self) -> bool {
        self.frontmatter.as_ref().is_some_and(Frontmatter::is_draft)
    }
}

/// Snapshot of every published document plus the non-markdown assets that
/// live next to them.
///
/// Cloning is cheap; documents are shared.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Arc<[Arc<Document>]>,
    assets: Arc<BTreeSet<String>>,
}

impl Corpus {
    /// Build a corpus from documents in their final order
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into_iter().map(Arc::new).collect(),
            assets: Arc::default(),
        }
    }

    /// Attach asset paths (relative to the content root, with extension)
    pub fn with_assets(mut self, assets: BTreeSet<String>) -> Self {
        self.assets = Arc::new(assets);
        self
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn assets(&self) -> &BTreeSet<String> {
        &self.assets
    }

    /// Look up a document by its exact id
    pub fn get(&self, id: &str) -> Option<&Arc<Document>> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|doc| doc.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
