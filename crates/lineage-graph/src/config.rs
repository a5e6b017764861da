use crate::sizing::SizeTable;
use lineage_core::{Category, LayoutDirection, LayoutStrategy, LineageError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed y coordinate of each category row in the tree layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowOffsets {
    pub deal: f32,
    pub document: f32,
    pub segment: f32,
    pub visual: f32,
    pub evidence: f32,
}

impl Default for RowOffsets {
    fn default() -> Self {
        Self {
            deal: 0.0,
            document: 220.0,
            segment: 440.0,
            visual: 660.0,
            evidence: 1000.0,
        }
    }
}

impl RowOffsets {
    pub fn y(&self, category: Category) -> f32 {
        match category {
            Category::Deal => self.deal,
            Category::Document => self.document,
            Category::Segment => self.segment,
            Category::Visual | Category::Default => self.visual,
            Category::Evidence => self.evidence,
        }
    }
}

/// Spacing handed to the layered layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredSpacing {
    /// Gap between neighbours within a rank.
    pub node_sep: f32,
    /// Gap between consecutive ranks.
    pub rank_sep: f32,
}

impl Default for LayeredSpacing {
    fn default() -> Self {
        Self {
            node_sep: 60.0,
            rank_sep: 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub direction: LayoutDirection,
    pub strategy: LayoutStrategy,
    /// Gap between sibling subtrees.
    pub sibling_gap: f32,
    /// Sibling gap under deal and document parents.
    pub wide_sibling_gap: f32,
    /// Gap between root subtrees.
    pub root_gap: f32,
    /// Horizontal clearance between the main tree and detached nodes.
    pub detached_offset: f32,
    /// Minimum gap the collision pass opens between overlapping nodes.
    pub collision_gap: f32,
    pub rows: RowOffsets,
    pub sizes: SizeTable,
    pub layered: LayeredSpacing,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::TopBottom,
            strategy: LayoutStrategy::Auto,
            sibling_gap: 40.0,
            wide_sibling_gap: 80.0,
            root_gap: 120.0,
            detached_offset: 160.0,
            collision_gap: 24.0,
            rows: RowOffsets::default(),
            sizes: SizeTable::default(),
            layered: LayeredSpacing::default(),
        }
    }
}

impl LayoutConfig {
    /// Load a JSON config; missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LineageError> {
        let config: Self = LineageError::read_json(path.as_ref())?;
        tracing::debug!("Loaded layout config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn child_gap(&self, parent: Category) -> f32 {
        if parent.uses_wide_child_gap() {
            self.wide_sibling_gap
        } else {
            self.sibling_gap
        }
    }
}
