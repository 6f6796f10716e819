//! Link target resolution and identifier normalization.
//!
//! Resolution maps a raw href plus the id of the document containing it to a
//! corpus-relative document id. It is a pure function of its two inputs and
//! never consults the corpus, so a resolved id may name nothing at all.
//!
//! | href                     | source `a/b/c` |
//! |--------------------------|----------------|
//! | `/blog/x/y/`             | `x/y`          |
//! | `./d`                    | `a/b/d`        |
//! | `../e#part`              | `a/e`          |
//! | `https://example.com`    | none           |
//! | `/about`                 | none           |

use percent_encoding::percent_decode_str;
use postgraph_core::LinkConfig;
use std::borrow::Cow;

const INDEX_SUFFIX: &str = "/index";

/// Collapse a folder's landing page onto the folder itself.
///
/// ```
/// use postgraph_parser::normalize_id;
///
/// assert_eq!(normalize_id("series/index"), "series");
/// assert_eq!(normalize_id("series/part-one"), "series/part-one");
/// assert_eq!(normalize_id("index"), "index");
/// ```
pub fn normalize_id(id: &str) -> &str {
    let mut id = id;
    while let Some(stripped) = id.strip_suffix(INDEX_SUFFIX) {
        id = stripped;
    }
    id
}

/// Drop `#fragment` and then `?query`.
fn strip_fragment_and_query(href: &str) -> &str {
    let href = href.split('#').next().unwrap_or(href);
    href.split('?').next().unwrap_or(href)
}

/// `scheme:` per RFC 3986 (`http:`, `https:`, `mailto:`, `tel:`, ...).
fn has_uri_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Links that leave the site: a URI scheme or a protocol-relative `//host`.
pub fn is_external(href: &str) -> bool {
    let href = strip_fragment_and_query(href);
    href.starts_with("//") || has_uri_scheme(href)
}

/// Percent-decode as UTF-8; malformed sequences leave the input untouched.
fn decode(href: &str) -> Cow<'_, str> {
    percent_decode_str(href)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(href))
}

/// Join `relative` onto the directory of `source_id` with `.`/`..` semantics.
/// `..` past the root is ignored.
fn join_relative(source_id: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = source_id.split('/').collect();
    segments.pop();

    for part in relative.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Resolves hrefs against a configured blog prefix.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    blog_prefix: String,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(&LinkConfig::default())
    }
}

impl LinkResolver {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            blog_prefix: config.blog_prefix.clone(),
        }
    }

    /// Target document id of `href` as written in `source_id`, not normalized.
    ///
    /// Returns `None` for external links, same-document anchors, site-absolute
    /// links outside the blog prefix, and links to the blog root itself.
    pub fn resolve(&self, href: &str, source_id: &str) -> Option<String> {
        let href = strip_fragment_and_query(href);
        if href.is_empty() || href.starts_with("//") || has_uri_scheme(href) {
            return None;
        }

        let href = decode(href);

        let resolved = if let Some(rest) = href.strip_prefix(self.blog_prefix.as_str()) {
            rest.strip_suffix('/').unwrap_or(rest).to_string()
        } else if href.starts_with('/') {
            return None;
        } else {
            join_relative(source_id, &href)
        };

        (!resolved.is_empty()).then_some(resolved)
    }

    /// [`resolve`](Self::resolve) followed by [`normalize_id`].
    pub fn resolve_normalized(&self, href: &str, source_id: &str) -> Option<String> {
        self.resolve(href, source_id)
            .map(|id| normalize_id(&id).to_string())
    }
}

/// Resolve with the default `/blog/` prefix.
///
/// ```
/// use postgraph_parser::resolve_link;
///
/// assert_eq!(resolve_link("/blog/x/y/", "any").as_deref(), Some("x/y"));
/// assert_eq!(resolve_link("./d", "a/b/c").as_deref(), Some("a/b/d"));
/// assert_eq!(resolve_link("../e", "a/b/c").as_deref(), Some("a/e"));
/// assert_eq!(resolve_link("mailto:me@example.com", "a"), None);
/// ```
pub fn resolve_link(href: &str, source_id: &str) -> Option<String> {
    LinkResolver::default().resolve(href, source_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_blog_links() {
        assert_eq!(resolve_link("/blog/my-post", "any-source").as_deref(), Some("my-post"));
        assert_eq!(resolve_link("/blog/parent/child", "any-source").as_deref(), Some("parent/child"));
        assert_eq!(resolve_link("/blog/x/y/", "any").as_deref(), Some("x/y"));
        assert_eq!(
            resolve_link("/blog/romophic-library/lib/directed-graph", "source").as_deref(),
            Some("romophic-library/lib/directed-graph")
        );
    }

    #[test]
    fn test_relative_links_from_nested_post() {
        let source = "romophic-library/lib/directed-graph";
        assert_eq!(resolve_link("./dijkstra", source).as_deref(), Some("romophic-library/lib/dijkstra"));
        assert_eq!(resolve_link("../index", source).as_deref(), Some("romophic-library/index"));
        assert_eq!(resolve_link("sibling", source).as_deref(), Some("romophic-library/lib/sibling"));
    }

    #[test]
    fn test_relative_links_from_index_post() {
        assert_eq!(resolve_link("./lib/x", "a/index").as_deref(), Some("a/lib/x"));
    }

    #[test]
    fn test_relative_links_from_top_level_post() {
        assert_eq!(resolve_link("./other", "post").as_deref(), Some("other"));
        assert_eq!(resolve_link("other/", "post").as_deref(), Some("other"));
    }

    #[test]
    fn test_excess_parent_segments_clamp() {
        assert_eq!(resolve_link("../../../x", "a/b").as_deref(), Some("x"));
        assert_eq!(resolve_link("..", "a"), None);
    }

    #[test]
    fn test_fragment_and_query_stripped() {
        assert_eq!(resolve_link("./d#heading", "a/b/c").as_deref(), Some("a/b/d"));
        assert_eq!(resolve_link("/blog/x?ref=1#top", "a").as_deref(), Some("x"));
    }

    #[test]
    fn test_external_links() {
        assert_eq!(resolve_link("https://example.com", "source"), None);
        assert_eq!(resolve_link("http://example.com/blog/x", "source"), None);
        assert_eq!(resolve_link("mailto:user@example.com", "source"), None);
        assert_eq!(resolve_link("//cdn.example.com/x.js", "source"), None);
        assert!(is_external("ftp://host/file"));
        assert!(!is_external("./http-notes"));
        assert!(!is_external("a/b:c"));
    }

    #[test]
    fn test_untracked_links() {
        assert_eq!(resolve_link("/about", "a"), None);
        assert_eq!(resolve_link("/blog", "a"), None);
        assert_eq!(resolve_link("/blog/", "a"), None);
        assert_eq!(resolve_link("#section", "a/b"), None);
        assert_eq!(resolve_link("", "a/b"), None);
    }

    #[test]
    fn test_percent_encoded_segments() {
        assert_eq!(
            resolve_link("./%E3%83%A1%E3%83%A2", "notes/index").as_deref(),
            Some("notes/メモ")
        );
        assert_eq!(resolve_link("./100%", "a/b").as_deref(), Some("a/100%"));
    }

    #[test]
    fn test_custom_prefix() {
        let config = LinkConfig {
            blog_prefix: "/posts/".to_string(),
            ..LinkConfig::default()
        };
        let resolver = LinkResolver::new(&config);
        assert_eq!(resolver.resolve("/posts/x", "a").as_deref(), Some("x"));
        assert_eq!(resolver.resolve("/blog/x", "a"), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_id("a/index"), "a");
        assert_eq!(normalize_id("a/b"), "a/b");
        assert_eq!(normalize_id("a/indexes"), "a/indexes");
        assert_eq!(normalize_id("a/index/index"), "a");
    }

    #[test]
    fn test_normalize_idempotent() {
        for id in ["a", "a/index", "a/index/index", "index", "x/y/z", "", "/index"] {
            let once = normalize_id(id);
            assert_eq!(normalize_id(once), once, "not idempotent for {id:?}");
        }
    }

    #[test]
    fn test_resolve_normalized() {
        let resolver = LinkResolver::default();
        assert_eq!(
            resolver.resolve_normalized("../index", "lib/a/b").as_deref(),
            Some("lib")
        );
        assert_eq!(resolver.resolve_normalized("./c", "lib/a/b").as_deref(), Some("lib/a/c"));
    }
}
