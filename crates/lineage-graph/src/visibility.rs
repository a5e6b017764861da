use crate::index::LineageIndex;
use lineage_core::{LineageEdge, LineageNode, NodeId};
use std::collections::HashMap;

/// Sparse per-node expand flags owned by the interaction layer.
pub type ExpandedState = HashMap<NodeId, bool>;

/// Effective expand flag: explicit state, then the node's own `data.expanded`,
/// then the category default.
pub fn is_expanded(node: &LineageNode, expanded: &ExpandedState) -> bool {
    expanded
        .get(&node.id)
        .copied()
        .or_else(|| node.data_expanded())
        .unwrap_or_else(|| node.category().default_expanded())
}

/// Nodes and edges currently in view, borrowed from the caller's lists.
#[derive(Debug, Default)]
pub struct VisibleGraph<'a> {
    pub nodes: Vec<&'a LineageNode>,
    pub edges: Vec<&'a LineageEdge>,
    /// Visible nodes whose subtree is folded away.
    pub collapsed: Vec<&'a NodeId>,
}

impl VisibleGraph<'_> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id.as_str() == id)
    }
}

pub struct VisibilityResolver<'g, 'a> {
    index: &'g LineageIndex<'a>,
}

impl<'g, 'a> VisibilityResolver<'g, 'a> {
    pub fn new(index: &'g LineageIndex<'a>) -> Self {
        Self { index }
    }

    /// Walk from `root` through expanded nodes only.
    ///
    /// Output keeps the input order of nodes and edges. An unknown root gives
    /// an empty graph.
    pub fn resolve(&self, root: &str, expanded: &ExpandedState) -> VisibleGraph<'a> {
        let Some(root_idx) = self.index.node_index(root) else {
            tracing::debug!("Root {} not found, nothing is visible", root);
            return VisibleGraph::default();
        };

        let node_count = self.index.node_count();
        let edges = self.index.edges();
        let mut visible = vec![false; node_count];
        let mut folded = vec![false; node_count];
        let mut connected = vec![false; edges.len()];

        visible[root_idx] = true;
        let mut stack = vec![root_idx];

        while let Some(current) = stack.pop() {
            if !is_expanded(self.index.node(current), expanded) {
                folded[current] = true;
                continue;
            }

            for &edge_pos in self.index.outgoing(current) {
                connected[edge_pos] = true;
                let target = edges[edge_pos].target;
                if !visible[target] {
                    visible[target] = true;
                    stack.push(target);
                }
            }
        }

        let mut graph = VisibleGraph::default();
        for (pos, node) in self.index.nodes().iter().enumerate() {
            // Earlier copies of a duplicated id are shadowed by the last one.
            if !self.index.is_canonical(pos) || !visible[pos] {
                continue;
            }
            graph.nodes.push(node);
            if folded[pos] {
                graph.collapsed.push(&node.id);
            }
        }
        graph.edges = edges
            .iter()
            .zip(&connected)
            .filter(|(_, is_connected)| **is_connected)
            .map(|(indexed, _)| indexed.edge)
            .collect();

        tracing::debug!(
            "Resolved {} visible nodes and {} edges from root {}",
            graph.nodes.len(),
            graph.edges.len(),
            root
        );
        graph
    }
}
