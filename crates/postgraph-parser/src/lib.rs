//! # postgraph parser
//!
//! The text-level half of the link graph engine:
//!
//! - [`links`] - stateless extraction of `[label](href)` occurrences
//! - [`resolve`] - href → document id resolution and `/index` normalization
//! - [`frontmatter`] - YAML front matter splitting and [`Document`] construction
//!
//! This is not a markdown parser. Only the href of inline link syntax is
//! located; nothing is rendered or validated.
//!
//! ## Quick Start
//!
//! ```
//! use postgraph_parser::{extract_links, normalize_id, resolve_link};
//!
//! let body = "Start at [the index](./index) or jump to [part two](./part-two#setup).";
//! let targets: Vec<String> = extract_links(body)
//!     .filter_map(|href| resolve_link(href, "series/part-one"))
//!     .map(|id| normalize_id(&id).to_string())
//!     .collect();
//!
//! assert_eq!(targets, vec!["series", "series/part-two"]);
//! ```
//!
//! [`Document`]: postgraph_core::Document

pub mod frontmatter;
pub mod links;
pub mod resolve;

pub use frontmatter::{parse_document, parse_frontmatter, split_frontmatter};
pub use links::{
    LinkMatch, extract_link_matches, extract_links, extract_links_with, looks_like_code,
};
pub use resolve::{LinkResolver, is_external, normalize_id, resolve_link};

/// Convenient prelude for common imports.
pub mod prelude {
    pub use crate::{
        LinkMatch, LinkResolver, extract_link_matches, extract_links, extract_links_with,
        normalize_id, parse_document, resolve_link,
    };
    pub use postgraph_core::prelude::*;
}
