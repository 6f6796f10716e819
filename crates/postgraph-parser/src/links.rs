//! Inline markdown link extraction: `[label](href)`.
//!
//! Scanning is stateless. Every call builds a fresh iterator over the shared
//! compiled pattern, so concurrent callers never share a match position.

use postgraph_core::{ExtractMode, LineIndex, SourcePosition};
use regex::Regex;
use std::sync::LazyLock;

/// Lazy label, lazy href, single line. Images (`![alt](src)`) match too.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?P<text>.*?)\]\((?P<href>.*?)\)").unwrap());

/// Characters that never appear in a real href but do in code such as
/// `[](int a, int b) { ... }` or `[&](auto x) -> bool;`.
static CODE_LIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s<>{};]").unwrap());

/// One `[label](href)` occurrence in a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Whole matched text, brackets included
    pub raw: &'a str,
    pub text: &'a str,
    pub href: &'a str,
    /// Byte offset of the opening `[`
    pub offset: usize,
}

impl LinkMatch<'_> {
    /// Line/column of the match within the body it came from.
    pub fn position(&self, index: &LineIndex<'_>) -> SourcePosition {
        SourcePosition::from_offset_indexed(index, self.offset, self.raw.len())
    }
}

/// Fast pre-filter: skip the regex if no `](` exists.
#[inline]
fn has_markdown_link(body: &str) -> bool {
    body.contains("](")
}

/// Whether an href candidate is really a code fragment.
pub fn looks_like_code(href: &str) -> bool {
    CODE_LIKE.is_match(href)
}

/// Every link occurrence in `body`, in document order.
pub fn extract_link_matches(body: &str, mode: ExtractMode) -> impl Iterator<Item = LinkMatch<'_>> {
    let haystack = if has_markdown_link(body) { body } else { "" };

    MARKDOWN_LINK
        .captures_iter(haystack)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(LinkMatch {
                raw: whole.as_str(),
                text: caps.name("text").map_or("", |m| m.as_str()),
                href: caps.name("href").map_or("", |m| m.as_str()),
                offset: whole.start(),
            })
        })
        .filter(move |m| mode == ExtractMode::Permissive || !looks_like_code(m.href))
}

/// Raw hrefs of every link in `body`.
///
/// ```
/// use postgraph_parser::extract_links;
///
/// let hrefs: Vec<_> = extract_links("See [a](./a) and [b](/blog/b#top).").collect();
/// assert_eq!(hrefs, vec!["./a", "/blog/b#top"]);
/// ```
pub fn extract_links(body: &str) -> impl Iterator<Item = &str> {
    extract_links_with(body, ExtractMode::Permissive)
}

/// Raw hrefs of every link in `body`, filtered according to `mode`.
pub fn extract_links_with(body: &str, mode: ExtractMode) -> impl Iterator<Item = &str> {
    extract_link_matches(body, mode).map(|m| m.href)
}
