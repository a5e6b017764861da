//! Top-down hierarchical layout.
//!
//! Each parent is centred over its children and every subtree gets a
//! horizontal envelope wide enough for all of its descendants, computed
//! bottom-up. Rows are fixed per category rather than by depth, so nodes of
//! the same kind line up across the whole chart.

use crate::config::LayoutConfig;
use crate::layout::{LayoutGraph, Layouter};
use lineage_core::{Category, Vec2};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Recursion guard for malformed, extremely deep chains.
const MAX_TREE_DEPTH: usize = 4096;

pub struct TreeLayouter<'c> {
    config: &'c LayoutConfig,
}

/// Parent → ordered children, built from the visible edges.
#[derive(Debug, Default)]
struct Forest {
    children: Vec<Vec<usize>>,
    has_parent: Vec<bool>,
}

struct WidthState {
    widths: Vec<Option<f32>>,
    visiting: Vec<bool>,
}

impl<'c> TreeLayouter<'c> {
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    /// Sibling order: category, then case-insensitive label, then id.
    fn sibling_order(graph: &LayoutGraph<'_>, a: usize, b: usize) -> Ordering {
        let (left, right) = (&graph.nodes[a], &graph.nodes[b]);
        left.category
            .cmp(&right.category)
            .then_with(|| {
                left.node
                    .label()
                    .to_lowercase()
                    .cmp(&right.node.label().to_lowercase())
            })
            .then_with(|| left.node.id.cmp(&right.node.id))
            .then_with(|| a.cmp(&b))
    }

    fn build_forest(graph: &LayoutGraph<'_>) -> Forest {
        let n = graph.len();
        let mut forest = Forest {
            children: vec![Vec::new(); n],
            has_parent: vec![false; n],
        };

        let mut seen = HashSet::with_capacity(graph.edges.len());
        for &(parent, child) in &graph.edges {
            if parent == child || !seen.insert((parent, child)) {
                continue;
            }
            forest.children[parent].push(child);
            forest.has_parent[child] = true;
        }

        for children in &mut forest.children {
            children.sort_by(|&a, &b| Self::sibling_order(graph, a, b));
        }
        forest
    }

    /// Every deal node; without deals, every node nothing points at.
    fn roots(graph: &LayoutGraph<'_>, forest: &Forest) -> Vec<usize> {
        let mut roots: Vec<usize> = (0..graph.len())
            .filter(|&idx| graph.nodes[idx].category == Category::Deal)
            .collect();
        if roots.is_empty() {
            roots = (0..graph.len())
                .filter(|&idx| !forest.has_parent[idx])
                .collect();
        }
        roots.sort_by(|&a, &b| Self::sibling_order(graph, a, b));
        roots
    }

    fn children_extent(&self, children: &[usize], widths: &[f32], gap: f32) -> f32 {
        let sum: f32 = children.iter().map(|&c| widths[c]).sum();
        sum + gap * children.len().saturating_sub(1) as f32
    }

    fn subtree_width(
        &self,
        graph: &LayoutGraph<'_>,
        forest: &Forest,
        node: usize,
        state: &mut WidthState,
        depth: usize,
    ) -> f32 {
        if let Some(width) = state.widths[node] {
            return width;
        }

        let own = graph.nodes[node].size.width;
        // Revisiting a node that is still being measured means a cycle.
        if state.visiting[node] {
            return own;
        }
        if depth > MAX_TREE_DEPTH {
            tracing::warn!(
                "Maximum tree depth ({}) exceeded at node {}, using its own width",
                MAX_TREE_DEPTH,
                graph.nodes[node].node.id
            );
            return own;
        }

        state.visiting[node] = true;
        let children = &forest.children[node];
        let mut sum = 0.0;
        for &child in children {
            sum += self.subtree_width(graph, forest, child, state, depth + 1);
        }
        if children.len() > 1 {
            sum += self.config.child_gap(graph.nodes[node].category) * (children.len() - 1) as f32;
        }
        state.visiting[node] = false;

        let width = own.max(sum);
        state.widths[node] = Some(width);
        width
    }

    #[allow(clippy::too_many_arguments)]
    fn place_subtree(
        &self,
        graph: &LayoutGraph<'_>,
        forest: &Forest,
        widths: &[f32],
        node: usize,
        center_x: f32,
        positions: &mut [Option<Vec2>],
        depth: usize,
    ) {
        // Shared children keep the slot of the first parent that reached them.
        if positions[node].is_some() {
            return;
        }

        let layout_node = &graph.nodes[node];
        positions[node] = Some(Vec2::new(
            center_x - layout_node.size.width / 2.0,
            self.config.rows.y(layout_node.category),
        ));

        let children = &forest.children[node];
        if children.is_empty() || depth >= MAX_TREE_DEPTH {
            return;
        }

        let gap = self.config.child_gap(layout_node.category);
        let extent = self.children_extent(children, widths, gap);
        let mut cursor = center_x - extent / 2.0;
        for &child in children {
            let share = widths[child];
            self.place_subtree(
                graph,
                forest,
                widths,
                child,
                cursor + share / 2.0,
                positions,
                depth + 1,
            );
            cursor += share + gap;
        }
    }

    /// Nodes no root reaches go to the right of everything placed so far, on
    /// their own category row, in id order.
    fn place_detached(&self, graph: &LayoutGraph<'_>, positions: &mut [Option<Vec2>]) {
        let mut detached: Vec<usize> = (0..graph.len())
            .filter(|&idx| positions[idx].is_none())
            .collect();
        if detached.is_empty() {
            return;
        }
        detached.sort_by(|&a, &b| {
            graph.nodes[a]
                .node
                .id
                .cmp(&graph.nodes[b].node.id)
                .then(a.cmp(&b))
        });

        let start_x = graph
            .bounds(positions)
            .map_or(0.0, |bounds| bounds.max.x + self.config.detached_offset);
        let mut row_cursor = [start_x; 5];

        tracing::debug!(
            "Appending {} nodes unreachable from any root",
            detached.len()
        );
        for idx in detached {
            let node = &graph.nodes[idx];
            let row = node.category.layer();
            positions[idx] = Some(Vec2::new(row_cursor[row], self.config.rows.y(node.category)));
            row_cursor[row] += node.size.width + self.config.sibling_gap;
        }
    }
}

impl Layouter for TreeLayouter<'_> {
    fn execute(&self, graph: &LayoutGraph<'_>) -> Vec<Option<Vec2>> {
        let n = graph.len();
        let mut positions = vec![None; n];
        if n == 0 {
            return positions;
        }

        let forest = Self::build_forest(graph);
        let roots = Self::roots(graph, &forest);

        let mut state = WidthState {
            widths: vec![None; n],
            visiting: vec![false; n],
        };
        let root_widths: Vec<f32> = roots
            .iter()
            .map(|&root| self.subtree_width(graph, &forest, root, &mut state, 0))
            .collect();
        let widths: Vec<f32> = state
            .widths
            .iter()
            .zip(&graph.nodes)
            .map(|(width, node)| width.unwrap_or(node.size.width))
            .collect();

        let total = root_widths.iter().sum::<f32>()
            + self.config.root_gap * roots.len().saturating_sub(1) as f32;
        let mut cursor = -total / 2.0;
        for (&root, &width) in roots.iter().zip(&root_widths) {
            self.place_subtree(
                graph,
                &forest,
                &widths,
                root,
                cursor + width / 2.0,
                &mut positions,
                0,
            );
            cursor += width + self.config.root_gap;
        }

        self.place_detached(graph, &mut positions);
        positions
    }
}
