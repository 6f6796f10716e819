//! # Content Loading
//!
//! Turns a blog content directory into a [`Corpus`]:
//!
//! - Markdown files (`.md`, `.mdx` by default) become documents, their id is
//!   the path relative to the root without extension (`series/index.md` →
//!   `series/index`)
//! - Every other file becomes a known asset path (`series/diagram.png`)
//! - Dot-files and dot-directories are ignored
//! - Documents marked `draft: true` are skipped unless drafts are enabled
//!
//! Documents come out newest first by front matter `date`, undated documents
//! last, ties broken by id.
//!
//! ## Quick Start
//!
//! ```no_run
//! use postgraph_corpus::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let config = SiteConfig::default();
//! let source = ContentDir::from_config(&config)?;
//! let corpus = source.load().await?;
//! println!("{} documents, {} assets", corpus.len(), corpus.assets().len());
//! # Ok(())
//! # }
//! ```
//!
//! [`Corpus`]: postgraph_core::Corpus

pub mod loader;

pub use loader::{ContentDir, ContentFile, ContentScan, DocumentSource};

pub mod prelude {
    pub use crate::loader::{ContentDir, DocumentSource};
    pub use postgraph_core::prelude::*;
}
