//! Loading a [`Corpus`] from a content directory on disk.

use async_trait::async_trait;
use postgraph_core::{Corpus, Document, Error, Result, SiteConfig};
use postgraph_parser::{parse_document, split_frontmatter};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::{DirEntry, WalkDir};

/// Anything that can produce a corpus snapshot.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self) -> Result<Corpus>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// An already-built corpus is its own source.
#[async_trait]
impl DocumentSource for Corpus {
    async fn load(&self) -> Result<Corpus> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory corpus ({} documents)", self.len())
    }
}

/// A file found under the content root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    pub path: PathBuf,
    /// Path relative to the root with `/` separators
    pub relative: String,
}

impl ContentFile {
    /// Document id: the relative path without its extension.
    pub fn id(&self) -> String {
        match self.relative.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() && !stem.ends_with('/') => stem.to_string(),
            _ => self.relative.clone(),
        }
    }
}

/// Result of walking the content root
#[derive(Debug, Default)]
pub struct ContentScan {
    pub documents: Vec<ContentFile>,
    pub assets: Vec<ContentFile>,
}

/// Blog content directory: markdown documents plus any other files as assets.
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
    config: SiteConfig,
}

impl ContentDir {
    /// `~` and environment variables in `root` are expanded.
    pub fn new(root: impl AsRef<Path>, config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            root: expand_path(root.as_ref())?,
            config: config.clone(),
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(&config.content_dir, config)
    }

    pub fn with_drafts(mut self, include: bool) -> Self {
        self.config.include_drafts = include;
        self
    }

    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.config.is_document_extension(ext))
    }

    /// Walk the root in sorted order, skipping dot-files and dot-directories.
    pub fn scan(&self) -> Result<ContentScan> {
        if !self.root.is_dir() {
            return Err(Error::file_not_found(&self.root));
        }

        let mut scan = ContentScan::default();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = relative_path(&self.root, entry.path()) else {
                log::warn!("Skipping non UTF-8 path: {}", entry.path().display());
                continue;
            };
            let file = ContentFile {
                path: entry.into_path(),
                relative,
            };

            if self.is_document(&file.path) {
                scan.documents.push(file);
            } else {
                scan.assets.push(file);
            }
        }

        log::debug!(
            "Scanned {}: {} documents, {} assets",
            self.root.display(),
            scan.documents.len(),
            scan.assets.len()
        );
        Ok(scan)
    }

    /// Read and parse one document file. Malformed front matter is logged
    /// and the file is kept as an untitled document with the remaining body.
    #[instrument(skip(self, file), fields(file = %file.relative), name = "content_read_document")]
    pub async fn read_document(&self, file: &ContentFile) -> Result<Document> {
        let content = tokio::fs::read_to_string(&file.path)
            .await
            .map_err(Error::io)?;
        let id = file.id();

        match parse_document(&id, &content) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                log::warn!("{}: {}; loading without front matter", file.relative, e);
                let (_, body) = split_frontmatter(&content);
                Ok(Document::new(id, body))
            }
        }
    }
}

#[async_trait]
impl DocumentSource for ContentDir {
    #[instrument(skip(self), fields(root = %self.root.display()), name = "content_load")]
    async fn load(&self) -> Result<Corpus> {
        log::info!("Loading content from {}", self.root.display());
        let scan = self.scan()?;

        let mut documents = Vec::with_capacity(scan.documents.len());
        let mut seen: HashSet<String> = HashSet::new();
        let mut drafts = 0usize;

        for file in &scan.documents {
            let doc = match self.read_document(file).await {
                Ok(doc) => doc,
                Err(e) => {
                    log::warn!("Failed to read {}: {}", file.path.display(), e);
                    continue;
                }
            };

            if doc.is_draft() && !self.config.include_drafts {
                drafts += 1;
                continue;
            }
            if !seen.insert(doc.id.clone()) {
                log::warn!("Duplicate document id {} from {}; keeping the first", doc.id, file.relative);
                continue;
            }
            documents.push(doc);
        }

        // Newest first; undated documents last; ties by id.
        documents.sort_by(|a, b| {
            let key_a = (a.date().is_none(), Reverse(a.date()));
            let key_b = (b.date().is_none(), Reverse(b.date()));
            key_a.cmp(&key_b).then_with(|| a.id.cmp(&b.id))
        });

        let assets: BTreeSet<String> = scan.assets.into_iter().map(|f| f.relative).collect();

        log::info!(
            "Loaded {} documents and {} assets ({} drafts skipped)",
            documents.len(),
            assets.len(),
            drafts
        );
        Ok(Corpus::new(documents).with_assets(assets))
    }

    fn describe(&self) -> String {
        format!("content directory {}", self.root.display())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| Error::invalid_path("Path contains invalid UTF-8"))?;
    let expanded = shellexpand::full(path_str)
        .map_err(|e| Error::invalid_path(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.unwrap();
        }
        tokio::fs::write(path, content).await.unwrap();
    }

    fn content_dir(root: &Path) -> ContentDir {
        ContentDir::new(root, &SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_content_file_id() {
        let file = |rel: &str| ContentFile {
            path: PathBuf::from(rel),
            relative: rel.to_string(),
        };
        assert_eq!(file("a.md").id(), "a");
        assert_eq!(file("series/index.mdx").id(), "series/index");
        assert_eq!(file("v1.2/notes.md").id(), "v1.2/notes");
        assert_eq!(file("noext").id(), "noext");
    }

    #[tokio::test]
    async fn test_ids_and_assets() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.md", "# A").await;
        write(temp.path(), "series/index.mdx", "# Series").await;
        write(temp.path(), "series/part.md", "[up](./index)").await;
        write(temp.path(), "series/diagram.png", "png").await;

        let corpus = content_dir(temp.path()).load().await.unwrap();

        let mut ids: Vec<_> = corpus.ids().collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "series/index", "series/part"]);
        assert!(corpus.assets().contains("series/diagram.png"));
    }

    #[tokio::test]
    async fn test_document_extensions_follow_config() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "upper.MD", "").await;
        write(temp.path(), "notes.txt", "").await;

        let corpus = content_dir(temp.path()).load().await.unwrap();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec!["upper"]);
        assert!(corpus.assets().contains("notes.txt"));

        let config = SiteConfig {
            extensions: vec!["txt".to_string()],
            ..SiteConfig::default()
        };
        let corpus = ContentDir::new(temp.path(), &config).unwrap().load().await.unwrap();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec!["notes"]);
    }

    #[tokio::test]
    async fn test_hidden_entries_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "visible.md", "").await;
        write(temp.path(), ".hidden.md", "").await;
        write(temp.path(), ".git/config.md", "").await;

        let corpus = content_dir(temp.path()).load().await.unwrap();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec!["visible"]);
    }

    #[tokio::test]
    async fn test_drafts_excluded_by_default() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "live.md", "---\ntitle: Live\n---\n").await;
        write(temp.path(), "wip.md", "---\ntitle: WIP\ndraft: true\n---\n").await;

        let corpus = content_dir(temp.path()).load().await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.get("wip").is_none());

        let corpus = content_dir(temp.path()).with_drafts(true).load().await.unwrap();
        assert_eq!(corpus.len(), 2);
    }

    #[tokio::test]
    async fn test_sorted_by_date_then_id() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "old.md", "---\ndate: 2023-01-01\n---\n").await;
        write(temp.path(), "new.md", "---\ndate: 2024-06-01\n---\n").await;
        write(temp.path(), "b.md", "").await;
        write(temp.path(), "a.md", "").await;

        let corpus = content_dir(temp.path()).load().await.unwrap();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec!["new", "old", "a", "b"]);
    }

    #[tokio::test]
    async fn test_malformed_frontmatter_keeps_document() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "broken.md", "---\ntitle: [oops\n---\n[x](./x)").await;

        let corpus = content_dir(temp.path()).load().await.unwrap();
        let doc = corpus.get("broken").unwrap();
        assert_eq!(doc.title, None);
        assert_eq!(doc.body, "[x](./x)");
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_first() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "post.md", "from md").await;
        write(temp.path(), "post.mdx", "from mdx").await;

        let corpus = content_dir(temp.path()).load().await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get("post").unwrap().body, "from md");
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let dir = content_dir(&temp.path().join("nope"));
        assert!(matches!(dir.load().await, Err(Error::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_corpus_is_a_source() {
        let corpus = Corpus::new(vec![Document::new("a", "")]);
        let loaded = corpus.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(corpus.describe().contains("1 documents"));
    }
}
