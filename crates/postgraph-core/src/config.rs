//! Configuration types for postgraph.
//!
//! Every field has a default, so a partial YAML file (or none at all) yields a
//! working setup for an Astro-style `src/content/blog` tree.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How strictly the link extractor filters candidate hrefs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Every `[label](href)` occurrence counts
    #[default]
    Permissive,
    /// Drop hrefs containing whitespace or `< > { } ;` (code that looks like a link)
    Strict,
}

/// Link resolution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkConfig {
    /// Site-absolute prefix under which documents are served
    pub blog_prefix: String,
    /// Extraction mode used when building the backlink index and graph
    pub extract_mode: ExtractMode,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            blog_prefix: "/blog/".to_string(),
            extract_mode: ExtractMode::Permissive,
        }
    }
}

/// Graph dataset settings (weights and colors consumed by the force layout)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    /// Prefix of synthesized tag node ids
    pub tag_id_prefix: String,
    /// Prefix of tag node display names
    pub tag_name_prefix: String,
    pub post_weight: u32,
    pub tag_weight: u32,
    pub tag_link_weight: u32,
    pub post_link_weight: u32,
    pub post_color: Option<String>,
    pub tag_color: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            tag_id_prefix: "tag-".to_string(),
            tag_name_prefix: "#".to_string(),
            post_weight: 2,
            tag_weight: 1,
            tag_link_weight: 1,
            post_link_weight: 2,
            post_color: Some("rgba(255, 255, 255, 0.8)".to_string()),
            tag_color: Some("#a855f7".to_string()),
        }
    }
}

/// HTTP listener settings for `postgraph serve`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4321,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the blog content collection
    pub content_dir: PathBuf,
    /// File extensions (without dot) treated as documents
    pub extensions: Vec<String>,
    /// Load documents marked `draft: true`
    pub include_drafts: bool,
    pub log_level: String,
    pub links: LinkConfig,
    pub graph: GraphConfig,
    pub server: HttpConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("src/content/blog"),
            extensions: vec!["md".to_string(), "mdx".to_string()],
            include_drafts: false,
            log_level: "INFO".to_string(),
            links: LinkConfig::default(),
            graph: GraphConfig::default(),
            server: HttpConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.links.blog_prefix;
        if !prefix.starts_with('/') || !prefix.ends_with('/') || prefix.len() < 2 {
            return Err(Error::config_error(format!(
                "blog_prefix must look like \"/blog/\", got {:?}",
                prefix
            )));
        }

        if self.extensions.is_empty() {
            return Err(Error::config_error("At least one document extension is required"));
        }

        if self.graph.tag_id_prefix.is_empty() {
            return Err(Error::config_error(
                "tag_id_prefix cannot be empty (tag ids would collide with document ids)",
            ));
        }

        if self.graph.tag_weight >= self.graph.post_weight {
            return Err(Error::config_error(format!(
                "tag_weight ({}) must be smaller than post_weight ({})",
                self.graph.tag_weight, self.graph.post_weight
            )));
        }

        Ok(())
    }

    /// Whether a file extension denotes a document
    pub fn is_document_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SiteConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::config_error(format!(
                "Failed to load configuration from {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_yaml(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
