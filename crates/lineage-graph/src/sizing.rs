use crate::visibility::{ExpandedState, is_expanded};
use lineage_core::{Category, LineageNode, Size};
use serde::{Deserialize, Serialize};

/// Default node footprint per category, used until the renderer reports a
/// measured size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeTable {
    pub deal: Size,
    pub document: Size,
    pub segment: Size,
    pub visual: Size,
    /// Expanded visual nodes render their thumbnail grid inline.
    pub visual_expanded: Size,
    pub evidence: Size,
    pub default: Size,
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            deal: Size::new(320.0, 140.0),
            document: Size::new(280.0, 120.0),
            segment: Size::new(260.0, 100.0),
            visual: Size::new(220.0, 90.0),
            visual_expanded: Size::new(360.0, 280.0),
            evidence: Size::new(240.0, 90.0),
            default: Size::new(220.0, 80.0),
        }
    }
}

impl SizeTable {
    pub fn for_category(&self, category: Category, expanded: bool) -> Size {
        match category {
            Category::Deal => self.deal,
            Category::Document => self.document,
            Category::Segment => self.segment,
            Category::Visual if expanded => self.visual_expanded,
            Category::Visual => self.visual,
            Category::Evidence => self.evidence,
            Category::Default => self.default,
        }
    }
}

fn usable(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Resolves node sizes: measured size, then explicit width/height, then the
/// category table.
pub struct SizeResolver<'c> {
    table: &'c SizeTable,
    expanded: &'c ExpandedState,
}

impl<'c> SizeResolver<'c> {
    pub fn new(table: &'c SizeTable, expanded: &'c ExpandedState) -> Self {
        Self { table, expanded }
    }

    pub fn resolve(&self, node: &LineageNode) -> Size {
        if let Some(measured) = node.measured
            && let (Some(width), Some(height)) =
                (usable(Some(measured.width)), usable(Some(measured.height)))
        {
            return Size::new(width, height);
        }

        let fallback = self
            .table
            .for_category(node.category(), is_expanded(node, self.expanded));
        Size::new(
            usable(node.width).unwrap_or(fallback.width),
            usable(node.height).unwrap_or(fallback.height),
        )
    }
}
