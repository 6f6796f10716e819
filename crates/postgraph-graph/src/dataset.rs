//! Node/link dataset for force-directed graph rendering.
//!
//! The dataset serializes to the shape graph front-ends expect:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "x", "name": "X", "val": 2, "group": "post", "color": "..." }],
//!   "links": [{ "source": "x", "target": "tag-rust", "value": 1 }]
//! }
//! ```

use petgraph::algo::{connected_components, kosaraju_scc};
use petgraph::prelude::*;
use postgraph_core::{Document, Error, GraphConfig, LinkConfig, Result, SiteConfig};
use postgraph_parser::{LinkResolver, extract_links_with, normalize_id};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Which kind of entity a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Post,
    Tag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Display label
    pub name: String,
    /// Relative render weight
    pub val: u32,
    pub group: NodeGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Edge weight; post links outweigh tag links
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDataset {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Summary of a dataset, computed over the post-to-post subgraph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub posts: usize,
    pub tags: usize,
    pub post_links: usize,
    pub tag_links: usize,
    /// Posts with no post link in either direction
    pub orphaned_posts: Vec<String>,
    /// Connected components ignoring direction
    pub components: usize,
    /// Groups of posts that link to each other in a cycle
    pub cycles: Vec<Vec<String>>,
}

impl GraphDataset {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check that node ids are unique and every link endpoint exists.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::other(format!("Duplicate graph node id: {}", node.id)));
            }
        }

        for link in &self.links {
            for endpoint in [&link.source, &link.target] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(Error::other(format!(
                        "Graph link {} -> {} references unknown node {}",
                        link.source, link.target, endpoint
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn stats(&self) -> GraphStats {
        let mut graph: DiGraph<&str, u32> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        let mut stats = GraphStats::default();

        for node in &self.nodes {
            match node.group {
                NodeGroup::Post => {
                    stats.posts += 1;
                    index.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
                }
                NodeGroup::Tag => stats.tags += 1,
            }
        }

        for link in &self.links {
            match (index.get(link.source.as_str()), index.get(link.target.as_str())) {
                (Some(&from), Some(&to)) => {
                    stats.post_links += 1;
                    graph.add_edge(from, to, link.value);
                }
                _ => stats.tag_links += 1,
            }
        }

        stats.orphaned_posts = graph
            .node_indices()
            .filter(|&idx| {
                graph.edges_directed(idx, Incoming).next().is_none()
                    && graph.edges(idx).next().is_none()
            })
            .map(|idx| graph[idx].to_string())
            .collect();

        stats.components = connected_components(&graph);

        stats.cycles = kosaraju_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.iter().map(|&idx| graph[idx].to_string()).collect())
            .collect();

        stats
    }
}

/// Builds a [`GraphDataset`] from a document collection.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    graph: GraphConfig,
    links: LinkConfig,
}

impl GraphBuilder {
    pub fn new(graph: GraphConfig, links: LinkConfig) -> Self {
        Self { graph, links }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.graph.clone(), config.links.clone())
    }

    /// Preferred node id for a tag
    pub fn tag_id(&self, tag: &str) -> String {
        format!("{}{}", self.graph.tag_id_prefix, tag)
    }

    /// Node ids for `tags`. An id already taken by a document or an earlier
    /// tag gets the prefix repeated until it is free (or `_` appended when
    /// the prefix is empty).
    fn assign_tag_ids<'a>(
        &self,
        tags: &[&'a str],
        documents: &[Arc<Document>],
    ) -> HashMap<&'a str, String> {
        let mut taken: HashSet<String> = documents.iter().map(|d| d.id.clone()).collect();
        let mut ids = HashMap::with_capacity(tags.len());

        for &tag in tags {
            let preferred = self.tag_id(tag);
            let mut id = preferred.clone();
            while taken.contains(&id) {
                if self.graph.tag_id_prefix.is_empty() {
                    id.push('_');
                } else {
                    id.insert_str(0, &self.graph.tag_id_prefix);
                }
            }
            if id != preferred {
                log::warn!("Tag node {} collides with an existing id; using {}", preferred, id);
            }
            taken.insert(id.clone());
            ids.insert(tag, id);
        }

        ids
    }

    /// One post node per document, one tag node per distinct tag, a link
    /// from each post to each of its tags, and a link for every resolved
    /// post-to-post reference whose target is in `documents`.
    ///
    /// Nodes come out posts first (input order) then tags (first-seen
    /// order). Links come out tag links first. Node ids are unique.
    pub fn build(&self, documents: &[Arc<Document>]) -> GraphDataset {
        let mut dataset = GraphDataset::default();

        for doc in documents {
            dataset.nodes.push(GraphNode {
                id: doc.id.clone(),
                name: doc.display_title().to_string(),
                val: self.graph.post_weight,
                group: NodeGroup::Post,
                color: self.graph.post_color.clone(),
            });
        }

        let mut tags: Vec<&str> = Vec::new();
        let mut known_tags: HashSet<&str> = HashSet::new();
        for tag in documents.iter().flat_map(|d| &d.tags) {
            if known_tags.insert(tag.as_str()) {
                tags.push(tag.as_str());
            }
        }
        let tag_ids = self.assign_tag_ids(&tags, documents);

        for doc in documents {
            let mut doc_tags: HashSet<&str> = HashSet::new();
            for tag in &doc.tags {
                if !doc_tags.insert(tag.as_str()) {
                    continue;
                }
                if let Some(id) = tag_ids.get(tag.as_str()) {
                    dataset.links.push(GraphLink {
                        source: doc.id.clone(),
                        target: id.clone(),
                        value: self.graph.tag_link_weight,
                    });
                }
            }
        }

        for tag in &tags {
            let Some(id) = tag_ids.get(tag) else {
                continue;
            };
            dataset.nodes.push(GraphNode {
                id: id.clone(),
                name: format!("{}{}", self.graph.tag_name_prefix, tag),
                val: self.graph.tag_weight,
                group: NodeGroup::Tag,
                color: self.graph.tag_color.clone(),
            });
        }

        // normalized id -> id of the first document carrying it
        let mut by_normalized: HashMap<&str, &str> = HashMap::new();
        for doc in documents {
            by_normalized
                .entry(normalize_id(&doc.id))
                .or_insert(doc.id.as_str());
        }

        let resolver = LinkResolver::new(&self.links);
        for doc in documents {
            let own = normalize_id(&doc.id);
            let mut linked: HashSet<&str> = HashSet::new();

            for href in extract_links_with(&doc.body, self.links.extract_mode) {
                let Some(target) = resolver.resolve_normalized(href, &doc.id) else {
                    continue;
                };
                if target == own {
                    continue;
                }
                if let Some(&found) = by_normalized.get(target.as_str())
                    && linked.insert(found)
                {
                    dataset.links.push(GraphLink {
                        source: doc.id.clone(),
                        target: found.to_string(),
                        value: self.graph.post_link_weight,
                    });
                }
            }
        }

        log::debug!(
            "Graph dataset built: {} nodes ({} tags), {} links",
            dataset.nodes.len(),
            tags.len(),
            dataset.links.len()
        );

        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(docs: Vec<Document>) -> GraphDataset {
        let docs: Vec<_> = docs.into_iter().map(Arc::new).collect();
        GraphBuilder::default().build(&docs)
    }

    #[test]
    fn test_shared_tag_and_post_link() {
        let dataset = build(vec![
            Document::new("a", "See [b](./b).").with_title("A").with_tags(["rust"]),
            Document::new("b", "").with_title("B").with_tags(["rust"]),
        ]);

        assert_eq!(dataset.nodes.len(), 3);
        assert_eq!(dataset.links.len(), 3);

        let tag = dataset.node("tag-rust").unwrap();
        assert_eq!(tag.name, "#rust");
        assert_eq!(tag.group, NodeGroup::Tag);
        assert_eq!(tag.val, 1);
        assert_eq!(tag.color.as_deref(), Some("#a855f7"));

        let post = dataset.node("a").unwrap();
        assert_eq!(post.name, "A");
        assert_eq!(post.val, 2);

        let post_link = dataset
            .links
            .iter()
            .find(|l| l.source == "a" && l.target == "b")
            .unwrap();
        assert_eq!(post_link.value, 2);
        assert_eq!(
            dataset.links.iter().filter(|l| l.target == "tag-rust").count(),
            2
        );
        dataset.validate().unwrap();
    }

    #[test]
    fn test_tag_id_colliding_with_post_is_renamed() {
        let dataset = build(vec![
            Document::new("tag-rust", "").with_tags(["rust"]),
            Document::new("tag-tag-rust", "").with_tags(["rust", "tag-rust"]),
        ]);
        dataset.validate().unwrap();

        let rust = dataset
            .nodes
            .iter()
            .find(|n| n.group == NodeGroup::Tag && n.name == "#rust")
            .unwrap();
        assert_eq!(rust.id, "tag-tag-tag-rust");
        assert_eq!(dataset.node("tag-rust").unwrap().group, NodeGroup::Post);
        assert_eq!(
            dataset.links.iter().filter(|l| l.target == rust.id).count(),
            2
        );

        let other = dataset
            .nodes
            .iter()
            .find(|n| n.group == NodeGroup::Tag && n.name == "#tag-rust")
            .unwrap();
        assert_eq!(other.id, "tag-tag-tag-tag-rust");
    }

    #[test]
    fn test_unresolved_links_produce_no_post_link() {
        let dataset = build(vec![Document::new(
            "a",
            "[missing](./nowhere) [ext](https://example.com) [page](/about)",
        )]);
        assert_eq!(dataset.nodes.len(), 1);
        assert!(dataset.links.is_empty());
    }

    #[test]
    fn test_untitled_post_uses_id_as_name() {
        let dataset = build(vec![Document::new("notes/untitled", "")]);
        assert_eq!(dataset.nodes[0].name, "notes/untitled");
    }

    #[test]
    fn test_links_deduplicated_and_self_links_dropped() {
        let dataset = build(vec![
            Document::new("a", "[b](./b) [again](/blog/b) [me](./a)").with_tags(["x", "x"]),
            Document::new("b", ""),
        ]);
        let post_links: Vec<_> = dataset.links.iter().filter(|l| l.value == 2).collect();
        assert_eq!(post_links.len(), 1);
        assert_eq!(dataset.links.iter().filter(|l| l.value == 1).count(), 1);
        dataset.validate().unwrap();
    }

    #[test]
    fn test_links_to_folder_index_target_the_index_document() {
        let dataset = build(vec![
            Document::new("series/index", ""),
            Document::new("notes", "[series](/blog/series/)"),
        ]);
        assert_eq!(dataset.links.len(), 1);
        assert_eq!(dataset.links[0].target, "series/index");
        dataset.validate().unwrap();
    }

    #[test]
    fn test_json_shape() {
        let dataset = build(vec![Document::new("a", "").with_tags(["t"])]);
        let value: serde_json::Value = serde_json::from_str(&dataset.to_json().unwrap()).unwrap();

        assert_eq!(value["nodes"][0]["group"], "post");
        assert_eq!(value["nodes"][0]["color"], "rgba(255, 255, 255, 0.8)");
        assert_eq!(value["nodes"][1]["id"], "tag-t");
        assert_eq!(value["links"][0]["source"], "a");
        assert_eq!(value["links"][0]["value"], 1);
    }

    #[test]
    fn test_colorless_nodes_omit_color() {
        let config = GraphConfig {
            post_color: None,
            ..GraphConfig::default()
        };
        let docs = vec![Arc::new(Document::new("a", ""))];
        let dataset = GraphBuilder::new(config, LinkConfig::default()).build(&docs);
        let json = dataset.to_json().unwrap();
        assert!(!json.contains("color"));
    }

    #[test]
    fn test_empty_corpus() {
        let dataset = build(vec![]);
        assert!(dataset.nodes.is_empty());
        assert_eq!(dataset.to_json().unwrap(), r#"{"nodes":[],"links":[]}"#);
    }

    #[test]
    fn test_stats() {
        let dataset = build(vec![
            Document::new("a", "[b](./b)").with_tags(["t"]),
            Document::new("b", "[a](./a)"),
            Document::new("c", "[d](./d)"),
            Document::new("d", ""),
            Document::new("lonely", ""),
        ]);
        let stats = dataset.stats();

        assert_eq!(stats.posts, 5);
        assert_eq!(stats.tags, 1);
        assert_eq!(stats.post_links, 3);
        assert_eq!(stats.tag_links, 1);
        assert_eq!(stats.orphaned_posts, vec!["lonely"]);
        assert_eq!(stats.components, 3);
        assert_eq!(stats.cycles.len(), 1);
        assert_eq!(stats.cycles[0].len(), 2);
    }
}
