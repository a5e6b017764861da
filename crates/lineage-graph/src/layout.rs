use crate::collision::{CollisionAxis, CollisionItem, CollisionResolver};
use crate::config::LayoutConfig;
use crate::layered::{LayeredLayout, LayeredLayouter};
use crate::sizing::SizeResolver;
use crate::tree::TreeLayouter;
use crate::visibility::VisibleGraph;
use lineage_core::{Category, LayoutDirection, LayoutStrategy, LineageNode, Rect, Size, Vec2};
use std::collections::{HashMap, HashSet};

/// A visible node prepared for layout.
#[derive(Debug, Clone)]
pub struct LayoutNode<'a> {
    pub node: &'a LineageNode,
    pub category: Category,
    pub size: Size,
}

/// The visible subgraph in the shape the layouters consume: positional
/// nodes and deduplicated `(source, target)` index pairs.
#[derive(Debug, Default)]
pub struct LayoutGraph<'a> {
    pub nodes: Vec<LayoutNode<'a>>,
    pub edges: Vec<(usize, usize)>,
}

impl<'a> LayoutGraph<'a> {
    pub fn build(visible: &VisibleGraph<'a>, sizes: &SizeResolver<'_>) -> Self {
        let nodes: Vec<LayoutNode<'a>> = visible
            .nodes
            .iter()
            .map(|&node| LayoutNode {
                node,
                category: node.category(),
                size: sizes.resolve(node),
            })
            .collect();

        let node_map: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, layout_node)| (layout_node.node.id.as_str(), idx))
            .collect();

        let mut seen = HashSet::new();
        let mut edges = Vec::with_capacity(visible.edges.len());
        for edge in &visible.edges {
            let (Some(&source), Some(&target)) = (
                node_map.get(edge.source.as_str()),
                node_map.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if seen.insert((source, target)) {
                edges.push((source, target));
            }
        }

        Self { nodes, edges }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounding box of every placed node.
    pub fn bounds(&self, positions: &[Option<Vec2>]) -> Option<Rect> {
        self.nodes
            .iter()
            .zip(positions)
            .filter_map(|(node, position)| position.map(|p| Rect::from_pos_size(p, node.size)))
            .reduce(|acc, rect| acc.union(&rect))
    }
}

/// Assigns top-left positions to every node of a [`LayoutGraph`].
///
/// `None` leaves the node where it was before layout.
pub trait Layouter {
    fn execute(&self, graph: &LayoutGraph<'_>) -> Vec<Option<Vec2>>;
}

/// Picks a strategy for a request and runs it followed by the collision pass.
pub struct LayoutEngine<'c> {
    config: &'c LayoutConfig,
    layered: &'c dyn LayeredLayout,
}

impl<'c> LayoutEngine<'c> {
    pub fn new(config: &'c LayoutConfig, layered: &'c dyn LayeredLayout) -> Self {
        Self { config, layered }
    }

    /// The tree layout only exists top-to-bottom; every other direction is
    /// handed to the layered layout.
    pub fn effective_strategy(
        direction: LayoutDirection,
        requested: LayoutStrategy,
    ) -> LayoutStrategy {
        match (direction, requested) {
            (LayoutDirection::TopBottom, LayoutStrategy::Auto | LayoutStrategy::Tree) => {
                LayoutStrategy::Tree
            }
            _ => LayoutStrategy::Layered,
        }
    }

    pub fn layout(
        &self,
        graph: &LayoutGraph<'_>,
        direction: LayoutDirection,
        strategy: LayoutStrategy,
    ) -> Vec<Option<Vec2>> {
        if graph.is_empty() {
            return Vec::new();
        }

        let strategy = Self::effective_strategy(direction, strategy);
        let mut positions = match strategy {
            LayoutStrategy::Layered => {
                LayeredLayouter::new(self.config, self.layered, direction).execute(graph)
            }
            _ => TreeLayouter::new(self.config).execute(graph),
        };

        let shifted = self.resolve_collisions(graph, &mut positions, direction, strategy);
        tracing::debug!(
            "Laid out {} nodes with {:?} strategy ({}), {} shifted by collision pass",
            graph.len(),
            strategy,
            direction,
            shifted
        );
        positions
    }

    /// Tree rows are grouped by category; layered ranks by their shared
    /// coordinate on the flow axis.
    fn resolve_collisions(
        &self,
        graph: &LayoutGraph<'_>,
        positions: &mut [Option<Vec2>],
        direction: LayoutDirection,
        strategy: LayoutStrategy,
    ) -> usize {
        let axis = if direction.is_vertical() {
            CollisionAxis::Horizontal
        } else {
            CollisionAxis::Vertical
        };

        let mut items = Vec::with_capacity(graph.len());
        let mut owners = Vec::with_capacity(graph.len());
        for (idx, node) in graph.nodes.iter().enumerate() {
            let Some(position) = positions[idx] else {
                continue;
            };
            let layer = match strategy {
                LayoutStrategy::Layered if direction.is_vertical() => {
                    (position.y + node.size.height / 2.0).round() as i64
                }
                LayoutStrategy::Layered => (position.x + node.size.width / 2.0).round() as i64,
                _ => node.category.layer() as i64,
            };
            items.push(CollisionItem {
                layer,
                position,
                size: node.size,
            });
            owners.push(idx);
        }

        let shifted = CollisionResolver::new(self.config.collision_gap, axis).resolve(&mut items);
        for (item, idx) in items.iter().zip(owners) {
            positions[idx] = Some(item.position);
        }
        shifted
    }
}
