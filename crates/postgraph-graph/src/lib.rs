//! # Link Graph
//!
//! Everything derived from the links between documents:
//!
//! - [`backlinks`] - reverse link index, its cache, and lookup by id
//! - [`dataset`] - node/link dataset for graph visualisation
//! - [`integrity`] - broken internal link detection
//!
//! ## Quick Start
//!
//! ```
//! use postgraph_graph::prelude::*;
//!
//! let corpus = Corpus::new(vec![
//!     Document::new("x", "[see](./y)").with_tags(["rust"]),
//!     Document::new("y", "").with_tags(["rust"]),
//! ]);
//!
//! let service = BacklinkService::new(corpus.clone(), LinkConfig::default());
//! let sources: Vec<_> = service.backlinks_for("y").iter().map(|d| d.id.clone()).collect();
//! assert_eq!(sources, vec!["x"]);
//!
//! let dataset = GraphBuilder::default().build(corpus.documents());
//! assert_eq!(dataset.nodes.len(), 3);
//! assert_eq!(dataset.links.len(), 3);
//!
//! let report = LinkChecker::for_corpus(&corpus, &LinkConfig::default()).check(corpus.documents());
//! assert!(report.is_clean());
//! ```
//!
//! ## Identity
//!
//! Targets are compared after normalization, so `series/index` and `series`
//! name the same document. Backlink lookups and self-link exclusion both
//! use the normalized form.
//!
//! ## Performance Characteristics
//!
//! - Index construction: O(total body length), one pass over the corpus
//! - Backlink lookup: one hash probe plus O(k) for k sources
//! - Dataset construction: O(n + m) for n documents and m links
//! - Link checking: O(total body length)

pub mod backlinks;
pub mod dataset;
pub mod integrity;

pub use backlinks::{BacklinkCache, BacklinkIndex, BacklinkService, IndexStats};
pub use dataset::{GraphBuilder, GraphDataset, GraphLink, GraphNode, GraphStats, NodeGroup};
pub use integrity::{BrokenLink, KnownTargets, LinkCheckReport, LinkChecker};

pub mod prelude {
    pub use crate::backlinks::{BacklinkCache, BacklinkIndex, BacklinkService, IndexStats};
    pub use crate::dataset::{GraphBuilder, GraphDataset, GraphStats, NodeGroup};
    pub use crate::integrity::{BrokenLink, KnownTargets, LinkCheckReport, LinkChecker};
    pub use postgraph_core::prelude::*;
}
