//! Literature graph assembly.
//!
//! Builds an undirected graph from accepted records using petgraph's
//! `UnGraph` plus a key-to-index map for node identity. Co-authorship and
//! citation graphs share one record-to-related-identities transform; only
//! the field supplying the related identities differs.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use crate::types::PaperRecord;

/// Weight given to a paper node when no citation count is known.
pub const DEFAULT_PAPER_WEIGHT: u64 = 10;

/// Fixed weight for author nodes.
pub const AUTHOR_WEIGHT: u64 = 20;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Paper,
    Author,
}

/// Attributes carried by every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttrs {
    pub label: String,
    pub kind: NodeKind,
    pub weight: u64,
}

/// Which relation the assembler links papers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMode {
    /// Link each paper to its listed authors.
    Coauthorship,
    /// Link each paper to the papers it cites.
    Citation,
}

impl GraphMode {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "coauthors" | "coauthorship" | "authors" => Some(Self::Coauthorship),
            "citations" | "citation" | "cited" => Some(Self::Citation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coauthorship => "co-authorship",
            Self::Citation => "citation",
        }
    }
}

/// The assembled literature graph: deduplicated nodes, no parallel edges,
/// no self-loops.
pub struct PaperGraph {
    graph: UnGraph<NodeAttrs, ()>,
    key_to_node: HashMap<(NodeKind, String), NodeIndex>,
}

impl PaperGraph {
    fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            key_to_node: HashMap::new(),
        }
    }

    /// Insert or enrich a node. Re-adding an existing key never duplicates
    /// it; a real label replaces a bare-id placeholder and the larger
    /// weight wins, so a fetched record can upgrade a cited-id stub.
    fn upsert_node(&mut self, kind: NodeKind, key: &str, label: &str, weight: u64) -> NodeIndex {
        if let Some(&idx) = self.key_to_node.get(&(kind, key.to_string())) {
            let attrs = &mut self.graph[idx];
            if attrs.label == key && label != key && !label.is_empty() {
                attrs.label = label.to_string();
            }
            if weight > attrs.weight {
                attrs.weight = weight;
            }
            return idx;
        }
        let idx = self.graph.add_node(NodeAttrs {
            label: label.to_string(),
            kind,
            weight,
        });
        self.key_to_node.insert((kind, key.to_string()), idx);
        idx
    }

    /// Insert an undirected edge unless it already exists or would self-loop.
    fn link(&mut self, a: NodeIndex, b: NodeIndex) {
        if a == b {
            return;
        }
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a node's attributes by identity key.
    pub fn node(&self, kind: NodeKind, key: &str) -> Option<&NodeAttrs> {
        let idx = self.key_to_node.get(&(kind, key.to_string()))?;
        self.graph.node_weight(*idx)
    }

    /// Whether an edge exists between the two identity keys.
    pub fn has_edge(&self, a: (NodeKind, &str), b: (NodeKind, &str)) -> bool {
        let Some(&ia) = self.key_to_node.get(&(a.0, a.1.to_string())) else {
            return false;
        };
        let Some(&ib) = self.key_to_node.get(&(b.0, b.1.to_string())) else {
            return false;
        };
        self.graph.find_edge(ia, ib).is_some()
    }

    /// All node attributes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeAttrs> {
        self.graph.node_weights()
    }

    /// All edges as attribute pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeAttrs, &NodeAttrs)> {
        self.graph.edge_indices().filter_map(|e| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            Some((&self.graph[a], &self.graph[b]))
        })
    }
}

/// Assemble a literature graph from accepted records.
///
/// Total over its input: records without a usable paper identity contribute
/// nothing, blank related identities are skipped, and nothing here fails.
pub fn assemble(records: &[PaperRecord], mode: GraphMode) -> PaperGraph {
    let mut graph = PaperGraph::new();

    for record in records {
        let Some((key, title)) = record_identity(record) else {
            continue;
        };
        let weight = if record.citation_count > 0 {
            record.citation_count
        } else {
            DEFAULT_PAPER_WEIGHT
        };
        let paper = graph.upsert_node(NodeKind::Paper, &key, &title, weight);

        match mode {
            GraphMode::Coauthorship => {
                for author in &record.authors {
                    let author = author.trim();
                    if author.is_empty() {
                        continue;
                    }
                    let node = graph.upsert_node(NodeKind::Author, author, author, AUTHOR_WEIGHT);
                    graph.link(paper, node);
                }
            }
            GraphMode::Citation => {
                for cited in &record.cited_ids {
                    let cited = cited.trim();
                    if cited.is_empty() {
                        continue;
                    }
                    // Stub label defaults to the id until the cited paper's
                    // own record upserts a real title.
                    let node = graph.upsert_node(NodeKind::Paper, cited, cited, DEFAULT_PAPER_WEIGHT);
                    graph.link(paper, node);
                }
            }
        }
    }

    graph
}

/// A record's graph identity: keyed by source id when present, else by
/// title. Records without a title have no unit identity.
fn record_identity(record: &PaperRecord) -> Option<(String, String)> {
    let title = record
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())?;
    let key = record
        .id
        .clone()
        .unwrap_or_else(|| title.to_string());
    Some((key, title.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::split_authors;
    use pretty_assertions::assert_eq;

    fn paper(title: &str, authors: &str, citations: u64) -> PaperRecord {
        PaperRecord {
            id: None,
            title: Some(title.into()),
            authors: split_authors(authors),
            year: None,
            citation_count: citations,
            cited_ids: Vec::new(),
        }
    }

    fn cited(id: &str, title: &str, cited_ids: &[&str]) -> PaperRecord {
        PaperRecord {
            id: Some(id.into()),
            title: Some(title.into()),
            authors: vec!["Author".into()],
            year: None,
            citation_count: 0,
            cited_ids: cited_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Structural fingerprint for idempotence comparisons.
    fn fingerprint(graph: &PaperGraph) -> (Vec<(NodeKind, String, u64)>, Vec<(String, String)>) {
        let mut nodes: Vec<_> = graph
            .nodes()
            .map(|n| (n.kind, n.label.clone(), n.weight))
            .collect();
        nodes.sort();
        let mut edges: Vec<_> = graph
            .edges()
            .map(|(a, b)| {
                let mut pair = [a.label.clone(), b.label.clone()];
                pair.sort();
                (pair[0].clone(), pair[1].clone())
            })
            .collect();
        edges.sort();
        (nodes, edges)
    }

    #[test]
    fn test_coauthorship_scenario() {
        let records = vec![paper("A", "Alice and Bob", 5), paper("B", "Bob", 1)];
        let graph = assemble(&records, GraphMode::Coauthorship);

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge((NodeKind::Paper, "A"), (NodeKind::Author, "Alice")));
        assert!(graph.has_edge((NodeKind::Paper, "A"), (NodeKind::Author, "Bob")));
        assert!(graph.has_edge((NodeKind::Paper, "B"), (NodeKind::Author, "Bob")));
        assert!(!graph.has_edge((NodeKind::Paper, "B"), (NodeKind::Author, "Alice")));
    }

    #[test]
    fn test_author_node_deduplicated_across_papers() {
        let records = vec![paper("A", "Bob", 0), paper("B", "Bob", 0), paper("C", "Bob", 0)];
        let graph = assemble(&records, GraphMode::Coauthorship);

        let authors = graph
            .nodes()
            .filter(|n| n.kind == NodeKind::Author)
            .count();
        assert_eq!(authors, 1);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_paper_weight_from_citations_with_default() {
        let records = vec![paper("Cited", "A", 42), paper("Uncited", "B", 0)];
        let graph = assemble(&records, GraphMode::Coauthorship);

        assert_eq!(graph.node(NodeKind::Paper, "Cited").unwrap().weight, 42);
        assert_eq!(
            graph.node(NodeKind::Paper, "Uncited").unwrap().weight,
            DEFAULT_PAPER_WEIGHT
        );
        assert_eq!(graph.node(NodeKind::Author, "A").unwrap().weight, AUTHOR_WEIGHT);
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let records = vec![
            paper("A", "Alice and Bob", 5),
            paper("B", "Bob, Carol", 1),
            cited("id1", "Deep Work", &["id2", "id3"]),
        ];
        let first = assemble(&records, GraphMode::Coauthorship);
        let second = assemble(&records, GraphMode::Coauthorship);
        assert_eq!(fingerprint(&first), fingerprint(&second));

        let first = assemble(&records, GraphMode::Citation);
        let second = assemble(&records, GraphMode::Citation);
        assert_eq!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn test_citation_mode_links_cited_ids() {
        let records = vec![cited("w1", "Root", &["w2", "w3"])];
        let graph = assemble(&records, GraphMode::Citation);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        // Unfetched cited papers fall back to their id as label.
        assert_eq!(graph.node(NodeKind::Paper, "w2").unwrap().label, "w2");
        assert!(graph.has_edge((NodeKind::Paper, "w1"), (NodeKind::Paper, "w2")));
    }

    #[test]
    fn test_citation_stub_upgraded_by_fetched_record() {
        let records = vec![
            cited("w1", "Citing Paper", &["w2"]),
            cited("w2", "The Real Title", &[]),
        ];
        let graph = assemble(&records, GraphMode::Citation);

        let node = graph.node(NodeKind::Paper, "w2").unwrap();
        assert_eq!(node.label, "The Real Title");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_richer_label_not_overwritten_by_placeholder() {
        let records = vec![
            cited("w2", "The Real Title", &[]),
            cited("w1", "Citing Paper", &["w2"]),
        ];
        let graph = assemble(&records, GraphMode::Citation);
        assert_eq!(
            graph.node(NodeKind::Paper, "w2").unwrap().label,
            "The Real Title"
        );
    }

    #[test]
    fn test_self_citation_makes_no_loop() {
        let records = vec![cited("w1", "Recursive", &["w1"])];
        let graph = assemble(&records, GraphMode::Citation);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_listing_makes_no_parallel_edge() {
        let records = vec![paper("A", "Bob and Bob", 0)];
        let graph = assemble(&records, GraphMode::Coauthorship);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_titleless_record_contributes_nothing() {
        let records = vec![PaperRecord {
            authors: vec!["Alice".into()],
            citation_count: 99,
            ..Default::default()
        }];
        let graph = assemble(&records, GraphMode::Coauthorship);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let graph = assemble(&[], GraphMode::Coauthorship);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_mode_from_str_loose() {
        assert_eq!(
            GraphMode::from_str_loose("co-authors"),
            Some(GraphMode::Coauthorship)
        );
        assert_eq!(
            GraphMode::from_str_loose("CITATIONS"),
            Some(GraphMode::Citation)
        );
        assert_eq!(GraphMode::from_str_loose("timeline"), None);
    }
}
