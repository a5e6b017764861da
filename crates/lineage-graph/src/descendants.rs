//! Subtree sizes for every node of the full lineage graph.
//!
//! The UI shows a "+N" badge on each collapsed node, so counts are computed
//! for all nodes in one pass, before any visibility pruning.

use crate::index::LineageIndex;
use lineage_core::NodeId;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Recursion guard for malformed, extremely deep chains.
const MAX_TRAVERSAL_DEPTH: usize = 4096;

/// Descendant count per node id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DescendantCounts(BTreeMap<NodeId, usize>);

impl DescendantCounts {
    /// Count for `id`; unknown ids count 0.
    pub fn get(&self, id: &NodeId) -> usize {
        self.0.get(id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &usize)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<NodeId, usize> {
        self.0
    }
}

pub struct DescendantCounter<'g, 'a> {
    index: &'g LineageIndex<'a>,
}

struct CountState {
    /// Distinct descendants per node, filled once per node.
    reach: Vec<Option<HashSet<usize>>>,
    /// Nodes on the current recursion path.
    visiting: Vec<bool>,
}

impl<'g, 'a> DescendantCounter<'g, 'a> {
    pub fn new(index: &'g LineageIndex<'a>) -> Self {
        Self { index }
    }

    /// Number of distinct nodes reachable from `id` through outgoing edges.
    pub fn count(&self, id: &str) -> usize {
        let Some(idx) = self.index.node_index(id) else {
            return 0;
        };
        let mut state = self.new_state();
        self.collect(idx, &mut state, 0);
        state.reach[idx].as_ref().map_or(0, HashSet::len)
    }

    /// Counts for every node, sharing one memo table.
    pub fn count_all(&self) -> DescendantCounts {
        let mut state = self.new_state();
        let mut counts = BTreeMap::new();

        for idx in 0..self.index.node_count() {
            if !self.index.is_canonical(idx) {
                continue;
            }
            self.collect(idx, &mut state, 0);
            let count = state.reach[idx].as_ref().map_or(0, HashSet::len);
            counts.insert(self.index.node(idx).id.clone(), count);
        }

        tracing::debug!("Counted descendants for {} nodes", counts.len());
        DescendantCounts(counts)
    }

    fn new_state(&self) -> CountState {
        let n = self.index.node_count();
        CountState {
            reach: vec![None; n],
            visiting: vec![false; n],
        }
    }

    fn collect(&self, node: usize, state: &mut CountState, depth: usize) {
        if state.reach[node].is_some() {
            return;
        }

        state.visiting[node] = true;
        let mut reach = HashSet::new();

        for child in self.index.children(node) {
            // A node already on the path (self-loops included) adds nothing.
            if state.visiting[child] {
                continue;
            }

            if depth >= MAX_TRAVERSAL_DEPTH {
                tracing::warn!(
                    "Maximum traversal depth ({}) exceeded below node {}, truncating count",
                    MAX_TRAVERSAL_DEPTH,
                    self.index.node(node).id
                );
                reach.insert(child);
                continue;
            }

            self.collect(child, state, depth + 1);
            reach.insert(child);
            if let Some(child_reach) = &state.reach[child] {
                reach.extend(child_reach.iter().copied());
            }
        }

        // Cycles through an ancestor can leave `node` itself in the set.
        reach.remove(&node);
        state.visiting[node] = false;
        state.reach[node] = Some(reach);
    }
}
