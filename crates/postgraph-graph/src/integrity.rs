//! Internal link checking.
//!
//! Every strict-mode link in every document is resolved and tested against
//! the set of known document ids and asset paths. Anything that resolves to
//! nothing known is reported with its source position.

use postgraph_core::{Corpus, Document, ExtractMode, LineIndex, LinkConfig};
use postgraph_parser::{LinkResolver, extract_link_matches, normalize_id};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Ids and asset paths a link may legitimately point at
#[derive(Debug, Clone, Default)]
pub struct KnownTargets {
    ids: HashSet<String>,
    normalized: HashSet<String>,
    assets: HashSet<String>,
}

impl KnownTargets {
    pub fn new<I, A>(ids: I, assets: A) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        let ids: HashSet<String> = ids.into_iter().map(Into::into).collect();
        let normalized = ids.iter().map(|id| normalize_id(id).to_string()).collect();
        Self {
            ids,
            normalized,
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self::new(corpus.ids(), corpus.assets().iter().map(String::as_str))
    }

    /// A target is known if it names a document or asset directly, names a
    /// folder whose `index` document exists, or matches after normalization.
    pub fn contains(&self, target: &str) -> bool {
        self.ids.contains(target)
            || self.assets.contains(target)
            || self.ids.contains(&format!("{target}/index"))
            || self.normalized.contains(normalize_id(target))
    }

    pub fn len(&self) -> usize {
        self.ids.len() + self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.assets.is_empty()
    }
}

/// An internal link whose target does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub source_id: String,
    /// The full `[label](href)` text as written
    pub link_text: String,
    /// Resolved target id
    pub target: String,
    /// 1-based line within the document body
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Link broken in {}: {} -> (Target: {})",
            self.source_id, self.link_text, self.target
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCheckReport {
    /// Internal links examined (external and untracked links excluded)
    pub links_checked: usize,
    pub broken: Vec<BrokenLink>,
}

impl LinkCheckReport {
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty()
    }

    pub fn broken_count(&self) -> usize {
        self.broken.len()
    }

    /// One-line summary suitable for a CLI
    pub fn summary(&self) -> String {
        if self.is_clean() {
            "All internal links look good!".to_string()
        } else {
            format!("Found {} broken links.", self.broken.len())
        }
    }
}

pub struct LinkChecker {
    known: KnownTargets,
    resolver: LinkResolver,
}

impl LinkChecker {
    pub fn new(known: KnownTargets, config: &LinkConfig) -> Self {
        Self {
            known,
            resolver: LinkResolver::new(config),
        }
    }

    pub fn for_corpus(corpus: &Corpus, config: &LinkConfig) -> Self {
        Self::new(KnownTargets::from_corpus(corpus), config)
    }

    /// Check every document. Extraction is always strict here so that
    /// code-like bracket pairs are not reported.
    pub fn check(&self, documents: &[Arc<Document>]) -> LinkCheckReport {
        let mut report = LinkCheckReport::default();

        for doc in documents {
            let lines = LineIndex::new(&doc.body);

            for m in extract_link_matches(&doc.body, ExtractMode::Strict) {
                let Some(target) = self.resolver.resolve(m.href, &doc.id) else {
                    continue;
                };
                report.links_checked += 1;

                if self.known.contains(&target) {
                    continue;
                }

                let position = m.position(&lines);
                log::debug!("Broken link in {} at line {}: {}", doc.id, position.line, m.href);
                report.broken.push(BrokenLink {
                    source_id: doc.id.clone(),
                    link_text: m.raw.to_string(),
                    target,
                    line: position.line,
                    column: position.column,
                });
            }
        }

        log::info!(
            "Checked {} internal links across {} documents, {} broken",
            report.links_checked,
            documents.len(),
            report.broken.len()
        );

        report
    }
}
