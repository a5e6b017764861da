use crate::config::LayoutConfig;
use crate::descendants::{DescendantCounter, DescendantCounts};
use crate::index::LineageIndex;
use crate::layered::{LayeredLayout, RankedLayered};
use crate::layout::{LayoutEngine, LayoutGraph};
use crate::sizing::SizeResolver;
use crate::visibility::{ExpandedState, VisibilityResolver, VisibleGraph};
use lineage_core::{
    DATA_DESCENDANT_COUNT, LayoutDirection, LayoutStrategy, LineageEdge, LineageError,
    LineageNode, NodeId, Rect,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One layout request as stored on disk or sent over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineageDocument {
    pub nodes: Vec<LineageNode>,
    #[serde(default)]
    pub edges: Vec<LineageEdge>,
    #[serde(default)]
    pub root: Option<NodeId>,
    #[serde(default)]
    pub expanded: ExpandedState,
}

impl LineageDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LineageError> {
        let document: Self = LineageError::read_json(path.as_ref())?;
        tracing::debug!(
            "Loaded {} nodes and {} edges from {}",
            document.nodes.len(),
            document.edges.len(),
            path.as_ref().display()
        );
        Ok(document)
    }

    pub fn request(&self) -> LayoutRequest<'_> {
        LayoutRequest {
            nodes: &self.nodes,
            edges: &self.edges,
            root: self.root.as_ref().map(NodeId::as_str),
            expanded: &self.expanded,
            direction: None,
            strategy: None,
        }
    }
}

/// Inputs of a single layout call. Everything is borrowed and left untouched.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRequest<'a> {
    pub nodes: &'a [LineageNode],
    pub edges: &'a [LineageEdge],
    /// Root to expand from; `None` picks the first deal node.
    pub root: Option<&'a str>,
    pub expanded: &'a ExpandedState,
    /// Overrides the configured direction.
    pub direction: Option<LayoutDirection>,
    /// Overrides the configured strategy.
    pub strategy: Option<LayoutStrategy>,
}

impl<'a> LayoutRequest<'a> {
    pub fn new(
        nodes: &'a [LineageNode],
        edges: &'a [LineageEdge],
        expanded: &'a ExpandedState,
    ) -> Self {
        Self {
            nodes,
            edges,
            root: None,
            expanded,
            direction: None,
            strategy: None,
        }
    }

    pub fn with_root(mut self, root: &'a str) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Visible nodes in input order, positioned and annotated.
    pub nodes: Vec<LineageNode>,
    /// Edges between visible nodes.
    pub edges: Vec<LineageEdge>,
    /// Subtree size of every node in the full graph.
    pub descendant_counts: DescendantCounts,
    /// Descendant count of each visible collapsed node, for "+N" badges.
    pub hidden: BTreeMap<NodeId, usize>,
    pub bounds: Option<Rect>,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&LineageNode> {
        self.nodes.iter().find(|node| node.id.as_str() == id)
    }

    pub fn hidden_descendants(&self, id: &str) -> usize {
        self.hidden.get(&NodeId::from(id)).copied().unwrap_or(0)
    }
}

/// Entry point: classify, count, prune and lay out a lineage graph.
///
/// Holds configuration only; every call builds its own memo tables.
pub struct LineageLayout {
    config: LayoutConfig,
    layered: Box<dyn LayeredLayout>,
}

impl Default for LineageLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LineageLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_layered(config, Box::new(RankedLayered))
    }

    /// Use a different layered layout implementation for non-tree requests.
    pub fn with_layered(config: LayoutConfig, layered: Box<dyn LayeredLayout>) -> Self {
        Self { config, layered }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn descendant_counts(&self, nodes: &[LineageNode], edges: &[LineageEdge]) -> DescendantCounts {
        let index = LineageIndex::build(nodes, edges);
        DescendantCounter::new(&index).count_all()
    }

    /// Visible nodes and edges for a request, without positions.
    pub fn visible<'a>(&self, request: &LayoutRequest<'a>) -> VisibleGraph<'a> {
        let index = LineageIndex::build(request.nodes, request.edges);
        Self::resolve_visible(&index, request)
    }

    fn resolve_visible<'a>(index: &LineageIndex<'a>, request: &LayoutRequest<'a>) -> VisibleGraph<'a> {
        match request.root.or_else(|| index.default_root()) {
            Some(root) => VisibilityResolver::new(index).resolve(root, request.expanded),
            None => VisibleGraph::default(),
        }
    }

    pub fn arrange(&self, request: &LayoutRequest<'_>) -> LayoutResult {
        let direction = request.direction.unwrap_or(self.config.direction);
        let strategy = request.strategy.unwrap_or(self.config.strategy);

        let index = LineageIndex::build(request.nodes, request.edges);
        let descendant_counts = DescendantCounter::new(&index).count_all();
        let visible = Self::resolve_visible(&index, request);

        let sizes = SizeResolver::new(&self.config.sizes, request.expanded);
        let graph = LayoutGraph::build(&visible, &sizes);
        let positions = LayoutEngine::new(&self.config, self.layered.as_ref())
            .layout(&graph, direction, strategy);
        let bounds = graph.bounds(&positions);

        let (source_position, target_position) = direction.handles();
        let nodes: Vec<LineageNode> = graph
            .nodes
            .iter()
            .zip(&positions)
            .map(|(layout_node, position)| {
                let mut node = layout_node.node.clone();
                if let Some(position) = position {
                    node.position = Some(*position);
                }
                node.source_position = Some(source_position);
                node.target_position = Some(target_position);
                node.data.insert(
                    DATA_DESCENDANT_COUNT.to_string(),
                    descendant_counts.get(&node.id).into(),
                );
                node
            })
            .collect();

        let hidden = visible
            .collapsed
            .iter()
            .map(|&id| (id.clone(), descendant_counts.get(id)))
            .filter(|&(_, count)| count > 0)
            .collect();

        tracing::debug!(
            "Arranged {} of {} nodes ({} edges) in {} direction",
            nodes.len(),
            request.nodes.len(),
            visible.edges.len(),
            direction
        );

        LayoutResult {
            nodes,
            edges: visible.edges.into_iter().cloned().collect(),
            descendant_counts,
            hidden,
            bounds,
        }
    }
}
