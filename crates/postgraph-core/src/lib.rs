//! # postgraph core
//!
//! Canonical types every other postgraph crate depends on: documents and the
//! corpus that holds them, the error enum, and configuration.
//!
//! ## Modules
//!
//! - [`models`] - [`Document`], [`Frontmatter`], [`Corpus`], position helpers
//! - [`error`] - [`Error`] and the [`Result`] alias
//! - [`config`] - [`SiteConfig`] with its link, graph and HTTP sections
//!
//! ## Example
//!
//! ```
//! use postgraph_core::prelude::*;
//!
//! let corpus = Corpus::new(vec![
//!     Document::new("x", "[see](./y)").with_title("X"),
//!     Document::new("y", "").with_tags(["rust"]),
//! ]);
//! assert_eq!(corpus.len(), 2);
//!
//! let config = SiteConfig::default();
//! assert_eq!(config.links.blog_prefix, "/blog/");
//! ```

pub mod config;
pub mod error;
pub mod models;

pub use config::*;
pub use error::{Error, Result};
pub use models::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ExtractMode, GraphConfig, HttpConfig, LinkConfig, SiteConfig};
    pub use crate::error::{Error, Result};
    pub use crate::models::{Corpus, Document, Frontmatter, LineIndex, SourcePosition};
}
