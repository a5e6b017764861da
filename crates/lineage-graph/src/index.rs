use lineage_core::{Category, LineageEdge, LineageNode};
use std::collections::{HashMap, HashSet};

/// An edge whose endpoints both resolved to nodes of the index.
#[derive(Debug, Clone, Copy)]
pub struct IndexedEdge<'a> {
    pub edge: &'a LineageEdge,
    pub source: usize,
    pub target: usize,
}

/// Read-only lookup structure over a caller-owned node/edge list.
///
/// Node ids resolve last-one-wins. Edges are deduplicated by id (first wins)
/// and dropped when either endpoint is missing.
#[derive(Debug)]
pub struct LineageIndex<'a> {
    nodes: &'a [LineageNode],
    node_map: HashMap<&'a str, usize>,
    edges: Vec<IndexedEdge<'a>>,
    outgoing: Vec<Vec<usize>>,
}

impl<'a> LineageIndex<'a> {
    pub fn build(nodes: &'a [LineageNode], edges: &'a [LineageEdge]) -> Self {
        let mut node_map = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(previous) = node_map.insert(node.id.as_str(), idx) {
                tracing::trace!(
                    "Duplicate node id {} at positions {} and {}; keeping the later one",
                    node.id,
                    previous,
                    idx
                );
            }
        }

        let mut seen_edges: HashSet<&str> = HashSet::with_capacity(edges.len());
        let mut indexed = Vec::with_capacity(edges.len());
        let mut outgoing = vec![Vec::new(); nodes.len()];

        for edge in edges {
            if !seen_edges.insert(edge.id.0.as_str()) {
                tracing::trace!("Skipping duplicate edge id {}", edge.id);
                continue;
            }
            let (Some(&source), Some(&target)) = (
                node_map.get(edge.source.as_str()),
                node_map.get(edge.target.as_str()),
            ) else {
                tracing::trace!(
                    "Dropping edge {} ({} -> {}) with a missing endpoint",
                    edge.id,
                    edge.source,
                    edge.target
                );
                continue;
            };

            outgoing[source].push(indexed.len());
            indexed.push(IndexedEdge {
                edge,
                source,
                target,
            });
        }

        Self {
            nodes,
            node_map,
            edges: indexed,
            outgoing,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &'a [LineageNode] {
        self.nodes
    }

    pub fn node(&self, idx: usize) -> &'a LineageNode {
        &self.nodes[idx]
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.node_map.get(id).copied()
    }

    /// True when `idx` is the position the id lookup resolves to.
    pub fn is_canonical(&self, idx: usize) -> bool {
        self.node_index(self.nodes[idx].id.as_str()) == Some(idx)
    }

    /// Edges that survived validation, in input order.
    pub fn edges(&self) -> &[IndexedEdge<'a>] {
        &self.edges
    }

    /// Positions into [`Self::edges`] of the edges leaving `idx`.
    pub fn outgoing(&self, idx: usize) -> &[usize] {
        &self.outgoing[idx]
    }

    pub fn children(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing[idx]
            .iter()
            .map(move |&edge_pos| self.edges[edge_pos].target)
    }

    /// Root used when the caller does not name one: the first deal node,
    /// otherwise the first node.
    pub fn default_root(&self) -> Option<&'a str> {
        let nodes = self.nodes;
        nodes
            .iter()
            .find(|node| node.category() == Category::Deal)
            .or_else(|| nodes.first())
            .map(|node| node.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_and_duplicate_edges_are_dropped() {
        let nodes = vec![
            LineageNode::new("deal:1", "deal"),
            LineageNode::new("document:1", "document"),
        ];
        let edges = vec![
            LineageEdge::new("e1", "deal:1", "document:1"),
            LineageEdge::new("e1", "deal:1", "document:1"),
            LineageEdge::new("e2", "deal:1", "document:404"),
            LineageEdge::new("e3", "ghost", "deal:1"),
        ];

        let index = LineageIndex::build(&nodes, &edges);

        assert_eq!(index.edges().len(), 1);
        assert_eq!(index.edges()[0].edge.id.0, "e1");
        assert_eq!(index.children(0).collect::<Vec<_>>(), vec![1]);
        assert!(index.outgoing(1).is_empty());
    }

    #[test]
    fn test_duplicate_node_ids_resolve_to_last() {
        let nodes = vec![
            LineageNode::new("a", "document"),
            LineageNode::new("a", "segment"),
        ];
        let index = LineageIndex::build(&nodes, &[]);

        assert_eq!(index.node_index("a"), Some(1));
        assert!(!index.is_canonical(0));
        assert!(index.is_canonical(1));
    }

    #[test]
    fn test_default_root_prefers_deal() {
        let nodes = vec![
            LineageNode::new("document:1", "document"),
            LineageNode::new("deal:9", "DEAL"),
        ];
        let index = LineageIndex::build(&nodes, &[]);
        assert_eq!(index.default_root(), Some("deal:9"));

        let only_docs = vec![LineageNode::new("document:1", "document")];
        let index = LineageIndex::build(&only_docs, &[]);
        assert_eq!(index.default_root(), Some("document:1"));

        let index = LineageIndex::build(&[], &[]);
        assert_eq!(index.default_root(), None);
    }
}
