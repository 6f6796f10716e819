//! Backlink index, its cache, and the query service on top.
//!
//! The index is built in one pass over the corpus: every link of every
//! document is resolved and normalized once, and the source document is
//! appended to the target's entry. Lookups are then a single hash probe.

use parking_lot::RwLock;
use postgraph_core::{Corpus, Document, LinkConfig};
use postgraph_parser::{LinkResolver, extract_links_with, normalize_id};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Counters collected while building an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents_scanned: usize,
    pub links_scanned: usize,
    pub links_resolved: usize,
    pub targets: usize,
}

/// Reverse adjacency: normalized target id → documents linking to it.
///
/// Entries keep first-discovered order and hold each source at most once.
#[derive(Debug, Default)]
pub struct BacklinkIndex {
    entries: HashMap<String, Vec<Arc<Document>>>,
    stats: IndexStats,
}

impl BacklinkIndex {
    /// Build the index with a single pass over `documents`.
    ///
    /// Document ids are assumed unique, as the content loader guarantees.
    pub fn build(documents: &[Arc<Document>], config: &LinkConfig) -> Self {
        let resolver = LinkResolver::new(config);
        let mut entries: HashMap<String, Vec<Arc<Document>>> = HashMap::new();
        let mut stats = IndexStats::default();
        let mut recorded: HashSet<String> = HashSet::new();

        for source in documents {
            stats.documents_scanned += 1;
            recorded.clear();

            for href in extract_links_with(&source.body, config.extract_mode) {
                stats.links_scanned += 1;
                let Some(target) = resolver.resolve_normalized(href, &source.id) else {
                    continue;
                };
                stats.links_resolved += 1;

                if recorded.insert(target.clone()) {
                    entries.entry(target).or_default().push(Arc::clone(source));
                }
            }
        }

        stats.targets = entries.len();
        log::debug!(
            "Backlink index built: {} documents, {} links ({} resolved), {} targets",
            stats.documents_scanned,
            stats.links_scanned,
            stats.links_resolved,
            stats.targets
        );

        Self { entries, stats }
    }

    /// Raw entry for an already normalized id, self-links included.
    pub fn entry(&self, normalized_id: &str) -> &[Arc<Document>] {
        self.entries
            .get(normalized_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Documents linking to `id`, excluding `id` itself.
    ///
    /// Both the lookup and the self-exclusion compare normalized ids, so a
    /// folder's `index` page never lists itself for links to the folder.
    pub fn backlinks_for(&self, id: &str) -> Vec<Arc<Document>> {
        let normalized = normalize_id(id);
        self.entry(normalized)
            .iter()
            .filter(|doc| normalize_id(&doc.id) != normalized)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum CacheState {
    Uninitialized,
    Built(Arc<BacklinkIndex>),
}

/// Holds at most one built [`BacklinkIndex`] per corpus snapshot.
///
/// There is no automatic invalidation; call [`reset`](Self::reset) when the
/// corpus changes. Concurrent first calls may each build an index, the first
/// one published wins and the others are dropped.
pub struct BacklinkCache {
    state: RwLock<CacheState>,
}

impl BacklinkCache {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState::Uninitialized),
        }
    }

    /// The published index, if any.
    pub fn get(&self) -> Option<Arc<BacklinkIndex>> {
        match &*self.state.read() {
            CacheState::Built(index) => Some(Arc::clone(index)),
            CacheState::Uninitialized => None,
        }
    }

    /// Return the published index, building it from `documents` first if needed.
    pub fn get_or_build(&self, documents: &[Arc<Document>], config: &LinkConfig) -> Arc<BacklinkIndex> {
        if let Some(index) = self.get() {
            return index;
        }

        // Build outside the lock so readers are never blocked on a scan.
        let built = Arc::new(BacklinkIndex::build(documents, config));

        let mut state = self.state.write();
        match &*state {
            CacheState::Built(existing) => Arc::clone(existing),
            CacheState::Uninitialized => {
                *state = CacheState::Built(Arc::clone(&built));
                built
            }
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(&*self.state.read(), CacheState::Built(_))
    }

    /// Drop the published index; the next lookup rebuilds.
    pub fn reset(&self) {
        *self.state.write() = CacheState::Uninitialized;
    }
}

impl Default for BacklinkCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Lookup-by-id over a corpus, building the index lazily on first use.
pub struct BacklinkService {
    corpus: RwLock<Corpus>,
    config: LinkConfig,
    cache: BacklinkCache,
}

impl BacklinkService {
    pub fn new(corpus: Corpus, config: LinkConfig) -> Self {
        Self::with_cache(corpus, config, BacklinkCache::new())
    }

    /// Use a caller-provided cache (for instance one that is already built).
    pub fn with_cache(corpus: Corpus, config: LinkConfig, cache: BacklinkCache) -> Self {
        Self {
            corpus: RwLock::new(corpus),
            config,
            cache,
        }
    }

    /// Documents linking to `id`, first-discovered first.
    pub fn backlinks_for(&self, id: &str) -> Vec<Arc<Document>> {
        self.index().backlinks_for(id)
    }

    /// The current index, built on first call.
    pub fn index(&self) -> Arc<BacklinkIndex> {
        // Holding the corpus read guard keeps a concurrent replace_corpus from
        // resetting the cache between our build and its publication.
        let corpus = self.corpus.read();
        self.cache.get_or_build(corpus.documents(), &self.config)
    }

    /// Swap in a new corpus snapshot and invalidate the cached index.
    pub fn replace_corpus(&self, corpus: Corpus) {
        let mut current = self.corpus.write();
        *current = corpus;
        self.cache.reset();
        log::info!("Corpus replaced ({} documents); backlink index reset", current.len());
    }

    pub fn corpus(&self) -> Corpus {
        self.corpus.read().clone()
    }

    pub fn is_built(&self) -> bool {
        self.cache.is_built()
    }
}
