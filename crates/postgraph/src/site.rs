//! A loaded blog: corpus plus the derived views served to readers.

use parking_lot::RwLock;
use postgraph_core::{Corpus, Document, Error, Result, SiteConfig};
use postgraph_corpus::{ContentDir, DocumentSource};
use postgraph_graph::{BacklinkService, GraphBuilder, GraphDataset, LinkCheckReport, LinkChecker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// One linking document in a backlinks listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkEntry {
    pub id: String,
    pub title: String,
}

impl From<&Document> for BacklinkEntry {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.display_title().to_string(),
        }
    }
}

/// Backlinks of one document, as served over HTTP and printed by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinksReport {
    pub id: String,
    pub backlinks: Vec<BacklinkEntry>,
}

/// Cached graph dataset, tagged with the corpus generation it was built from
#[derive(Default)]
struct DatasetSlot {
    generation: u64,
    dataset: Option<Arc<GraphDataset>>,
}

/// Corpus-wide state shared by the CLI commands and the HTTP server.
///
/// The backlink index and the graph dataset are built on first use and
/// kept until [`Site::reload`].
pub struct Site {
    config: SiteConfig,
    backlinks: BacklinkService,
    graph: GraphBuilder,
    dataset: RwLock<DatasetSlot>,
}

impl Site {
    pub fn new(config: SiteConfig, corpus: Corpus) -> Self {
        Self {
            backlinks: BacklinkService::new(corpus, config.links.clone()),
            graph: GraphBuilder::from_config(&config),
            dataset: RwLock::new(DatasetSlot::default()),
            config,
        }
    }

    /// Load the content directory named in `config`.
    pub async fn load(config: SiteConfig) -> Result<Self> {
        let source = ContentDir::from_config(&config)?;
        Self::from_source(config, &source).await
    }

    #[instrument(skip_all, fields(source = %source.describe()), name = "site_load")]
    pub async fn from_source(config: SiteConfig, source: &dyn DocumentSource) -> Result<Self> {
        let corpus = source.load().await?;
        Ok(Self::new(config, corpus))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn corpus(&self) -> Corpus {
        self.backlinks.corpus()
    }

    /// The document named by `id`, directly or through its folder `index`.
    pub fn document(&self, id: &str) -> Option<Arc<Document>> {
        let corpus = self.corpus();
        corpus
            .get(id)
            .or_else(|| corpus.get(&format!("{id}/index")))
            .cloned()
    }

    /// Backlinks of a known document; unknown ids are [`Error::NotFound`].
    pub fn backlinks(&self, id: &str) -> Result<BacklinksReport> {
        let doc = self.document(id).ok_or_else(|| Error::not_found(id))?;
        let backlinks = self
            .backlinks
            .backlinks_for(&doc.id)
            .iter()
            .map(|d| BacklinkEntry::from(d.as_ref()))
            .collect();

        Ok(BacklinksReport {
            id: doc.id.clone(),
            backlinks,
        })
    }

    /// Graph dataset for the current corpus, built once.
    ///
    /// The build runs without holding the lock. Its result is only cached if
    /// no [`Site::reload`] happened in the meantime.
    pub fn graph(&self) -> Arc<GraphDataset> {
        let (generation, corpus) = {
            let slot = self.dataset.read();
            if let Some(dataset) = &slot.dataset {
                return Arc::clone(dataset);
            }
            // reload holds the write lock while swapping, so the pair is consistent
            (slot.generation, self.corpus())
        };

        let built = Arc::new(self.graph.build(corpus.documents()));

        let mut slot = self.dataset.write();
        if slot.generation != generation {
            log::debug!("Corpus reloaded during graph build; not caching");
            return built;
        }
        Arc::clone(slot.dataset.get_or_insert(built))
    }

    /// Check every internal link against the documents and assets.
    pub fn check(&self) -> LinkCheckReport {
        let corpus = self.corpus();
        LinkChecker::for_corpus(&corpus, &self.config.links).check(corpus.documents())
    }

    /// Swap in a freshly loaded corpus; derived views are rebuilt lazily.
    pub fn reload(&self, corpus: Corpus) {
        let mut slot = self.dataset.write();
        self.backlinks.replace_corpus(corpus);
        slot.generation += 1;
        slot.dataset = None;
    }
}
