//! Layered (Sugiyama-style) layout for directions the tree layout does not
//! cover.
//!
//! The layered algorithm itself sits behind [`LayeredLayout`] so a different
//! rank/ordering engine can be swapped in. [`RankedLayered`] is the built-in
//! one: longest-path ranking, barycenter ordering, centred ranks.

use crate::config::{LayeredSpacing, LayoutConfig};
use crate::layout::{LayoutGraph, Layouter};
use lineage_core::{LayoutDirection, Vec2};
use std::collections::BTreeMap;

/// One node as the layered engine sees it.
#[derive(Debug, Clone, Copy)]
pub struct LayeredNode<'a> {
    pub id: &'a str,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct LayeredInput<'a> {
    pub direction: LayoutDirection,
    pub nodes: Vec<LayeredNode<'a>>,
    /// `(source, target)` positions into `nodes`.
    pub edges: Vec<(usize, usize)>,
    pub spacing: LayeredSpacing,
}

/// A layered graph layout: ranks nodes along the flow direction, orders each
/// rank to reduce crossings and returns one **center** point per input node.
///
/// Implementations may return non-finite coordinates for nodes they could not
/// place; the adapter leaves those nodes where they were.
pub trait LayeredLayout: Send + Sync {
    fn centers(&self, input: &LayeredInput<'_>) -> Vec<Vec2>;
}

/// Built-in layered engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedLayered;

/// Maximum iterations for ranking convergence
const MAX_RANKING_ITERATIONS: usize = 1000;
/// Down/up barycenter sweeps.
const BARYCENTER_PASSES: usize = 2;

impl RankedLayered {
    fn assign_ranks(input: &LayeredInput<'_>) -> Vec<i32> {
        let n = input.nodes.len();
        let mut ranks = vec![0i32; n];

        let max_iterations = (n + 2).min(MAX_RANKING_ITERATIONS);
        let mut converged = false;
        for _ in 0..max_iterations {
            let mut changed = false;
            for &(source, target) in &input.edges {
                if source != target && ranks[target] <= ranks[source] {
                    ranks[target] = ranks[source] + 1;
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::warn!(
                "Layered ranking did not converge after {} iterations (cyclic input?)",
                max_iterations
            );
        }

        Self::compress_ranks(&mut ranks);
        ranks
    }

    fn compress_ranks(ranks: &mut [i32]) {
        let mut unique: Vec<i32> = ranks.to_vec();
        unique.sort_unstable();
        unique.dedup();
        for rank in ranks.iter_mut() {
            if let Ok(pos) = unique.binary_search(rank) {
                *rank = pos as i32;
            }
        }
    }

    fn build_layers(input: &LayeredInput<'_>, ranks: &[i32]) -> BTreeMap<i32, Vec<usize>> {
        let mut layers: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (idx, &rank) in ranks.iter().enumerate() {
            layers.entry(rank).or_default().push(idx);
        }
        for nodes in layers.values_mut() {
            nodes.sort_by(|&a, &b| input.nodes[a].id.cmp(input.nodes[b].id).then(a.cmp(&b)));
        }
        layers
    }

    fn order_by_barycenter(layer: &mut [usize], order: &[f32], neighbors: &[Vec<usize>]) {
        let barycenter = |node: usize| -> f32 {
            let adjacent = &neighbors[node];
            if adjacent.is_empty() {
                order[node]
            } else {
                adjacent.iter().map(|&n| order[n]).sum::<f32>() / adjacent.len() as f32
            }
        };
        // Stable sort keeps the previous order for equal barycenters.
        layer.sort_by(|&a, &b| barycenter(a).total_cmp(&barycenter(b)));
    }

    fn refresh_order(layer: &[usize], order: &mut [f32]) {
        for (pos, &node) in layer.iter().enumerate() {
            order[node] = pos as f32;
        }
    }

    fn run_barycenter_passes(input: &LayeredInput<'_>, layers: &mut BTreeMap<i32, Vec<usize>>) {
        let n = input.nodes.len();
        let mut incoming = vec![Vec::new(); n];
        let mut outgoing = vec![Vec::new(); n];
        for &(source, target) in &input.edges {
            if source != target {
                outgoing[source].push(target);
                incoming[target].push(source);
            }
        }

        let mut order = vec![0.0f32; n];
        for layer in layers.values() {
            Self::refresh_order(layer, &mut order);
        }

        let ranks: Vec<i32> = layers.keys().copied().collect();
        for _ in 0..BARYCENTER_PASSES {
            for rank in ranks.iter().skip(1) {
                if let Some(layer) = layers.get_mut(rank) {
                    Self::order_by_barycenter(layer, &order, &incoming);
                    Self::refresh_order(layer, &mut order);
                }
            }
            for rank in ranks.iter().rev().skip(1) {
                if let Some(layer) = layers.get_mut(rank) {
                    Self::order_by_barycenter(layer, &order, &outgoing);
                    Self::refresh_order(layer, &mut order);
                }
            }
        }
    }
}

impl LayeredLayout for RankedLayered {
    fn centers(&self, input: &LayeredInput<'_>) -> Vec<Vec2> {
        let n = input.nodes.len();
        let mut centers = vec![Vec2::default(); n];
        if n == 0 {
            return centers;
        }

        let ranks = Self::assign_ranks(input);
        let mut layers = Self::build_layers(input, &ranks);
        Self::run_barycenter_passes(input, &mut layers);

        let vertical = input.direction.is_vertical();
        let cross_size = |idx: usize| {
            let node = &input.nodes[idx];
            if vertical { node.width } else { node.height }
        };
        let main_size = |idx: usize| {
            let node = &input.nodes[idx];
            if vertical { node.height } else { node.width }
        };

        let mut main_offset = 0.0f32;
        for layer in layers.values() {
            let thickness = layer.iter().map(|&idx| main_size(idx)).fold(0.0, f32::max);
            let main_center = main_offset + thickness / 2.0;

            let extent = layer.iter().map(|&idx| cross_size(idx)).sum::<f32>()
                + input.spacing.node_sep * layer.len().saturating_sub(1) as f32;
            let mut cross = -extent / 2.0;
            for &idx in layer {
                let cross_center = cross + cross_size(idx) / 2.0;
                centers[idx] = match input.direction {
                    LayoutDirection::TopBottom => Vec2::new(cross_center, main_center),
                    LayoutDirection::BottomTop => Vec2::new(cross_center, -main_center),
                    LayoutDirection::LeftRight => Vec2::new(main_center, cross_center),
                    LayoutDirection::RightLeft => Vec2::new(-main_center, cross_center),
                };
                cross += cross_size(idx) + input.spacing.node_sep;
            }

            main_offset += thickness + input.spacing.rank_sep;
        }

        centers
    }
}

/// Runs a [`LayeredLayout`] and converts its centers to top-left anchors.
pub struct LayeredLayouter<'c> {
    config: &'c LayoutConfig,
    engine: &'c dyn LayeredLayout,
    direction: LayoutDirection,
}

impl<'c> LayeredLayouter<'c> {
    pub fn new(
        config: &'c LayoutConfig,
        engine: &'c dyn LayeredLayout,
        direction: LayoutDirection,
    ) -> Self {
        Self {
            config,
            engine,
            direction,
        }
    }

    fn input<'a>(&self, graph: &'a LayoutGraph<'_>) -> LayeredInput<'a> {
        LayeredInput {
            direction: self.direction,
            nodes: graph
                .nodes
                .iter()
                .map(|node| LayeredNode {
                    id: node.node.id.as_str(),
                    width: node.size.width,
                    height: node.size.height,
                })
                .collect(),
            edges: graph.edges.clone(),
            spacing: self.config.layered.clone(),
        }
    }
}

impl Layouter for LayeredLayouter<'_> {
    fn execute(&self, graph: &LayoutGraph<'_>) -> Vec<Option<Vec2>> {
        let centers = self.engine.centers(&self.input(graph));

        graph
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| match centers.get(idx) {
                Some(center) if center.is_finite() => Some(Vec2::new(
                    center.x - node.size.width / 2.0,
                    center.y - node.size.height / 2.0,
                )),
                _ => {
                    tracing::debug!(
                        "Layered layout left node {} unplaced, keeping its position",
                        node.node.id
                    );
                    node.node.position
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutNode;
    use lineage_core::{Category, LineageNode, Size};

    fn input_of(direction: LayoutDirection, n: usize, edges: &[(usize, usize)]) -> LayeredInput<'static> {
        const IDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
        LayeredInput {
            direction,
            nodes: IDS[..n]
                .iter()
                .map(|&id| LayeredNode {
                    id,
                    width: 100.0,
                    height: 40.0,
                })
                .collect(),
            edges: edges.to_vec(),
            spacing: LayeredSpacing::default(),
        }
    }

    #[test]
    fn test_chain_ranks_follow_direction() {
        let edges = [(0, 1), (1, 2)];

        let tb = RankedLayered.centers(&input_of(LayoutDirection::TopBottom, 3, &edges));
        assert!(tb[0].y < tb[1].y && tb[1].y < tb[2].y);

        let bt = RankedLayered.centers(&input_of(LayoutDirection::BottomTop, 3, &edges));
        assert!(bt[0].y > bt[1].y && bt[1].y > bt[2].y);

        let lr = RankedLayered.centers(&input_of(LayoutDirection::LeftRight, 3, &edges));
        assert!(lr[0].x < lr[1].x && lr[1].x < lr[2].x);

        let rl = RankedLayered.centers(&input_of(LayoutDirection::RightLeft, 3, &edges));
        assert!(rl[0].x > rl[1].x && rl[1].x > rl[2].x);
    }

    #[test]
    fn test_rank_members_do_not_overlap() {
        let centers = RankedLayered.centers(&input_of(
            LayoutDirection::TopBottom,
            4,
            &[(0, 1), (0, 2), (0, 3)],
        ));
        let mut xs: Vec<f32> = centers[1..].iter().map(|c| c.x).collect();
        xs.sort_by(f32::total_cmp);
        assert!(xs.windows(2).all(|w| w[1] - w[0] >= 100.0));
        assert_eq!(centers[1].y, centers[2].y);
    }

    #[test]
    fn test_cyclic_input_still_places_every_node() {
        let centers =
            RankedLayered.centers(&input_of(LayoutDirection::LeftRight, 3, &[(0, 1), (1, 2), (2, 0)]));
        assert_eq!(centers.len(), 3);
        assert!(centers.iter().all(Vec2::is_finite));
    }

    struct BrokenEngine;

    impl LayeredLayout for BrokenEngine {
        fn centers(&self, input: &LayeredInput<'_>) -> Vec<Vec2> {
            input
                .nodes
                .iter()
                .enumerate()
                .map(|(idx, _)| {
                    if idx == 0 {
                        Vec2::new(f32::NAN, 0.0)
                    } else {
                        Vec2::new(200.0, 100.0)
                    }
                })
                .collect()
        }
    }

    #[test]
    fn test_adapter_converts_centers_and_passes_through_non_finite() {
        let mut placed_before = LineageNode::new("document:1", "document");
        placed_before.position = Some(Vec2::new(7.0, 9.0));
        let nodes = vec![placed_before, LineageNode::new("segment:1", "segment")];
        let graph = LayoutGraph {
            nodes: nodes
                .iter()
                .map(|node| LayoutNode {
                    node,
                    category: Category::classify(&node.kind),
                    size: Size::new(100.0, 40.0),
                })
                .collect(),
            edges: vec![(0, 1)],
        };
        let config = LayoutConfig::default();

        let positions =
            LayeredLayouter::new(&config, &BrokenEngine, LayoutDirection::LeftRight).execute(&graph);

        assert_eq!(positions[0], Some(Vec2::new(7.0, 9.0)));
        assert_eq!(positions[1], Some(Vec2::new(150.0, 80.0)));
    }
}
