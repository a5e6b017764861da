//! Canonical node categories of the lineage graph.
//!
//! Upstream producers have used several spellings for the same kind over time
//! (`VISUAL_ASSET`, `visual_asset`, `visual-group`, ...). Everything that
//! dispatches on a node's kind goes through [`Category::classify`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Deal,
    Document,
    Segment,
    Visual,
    Evidence,
    Default,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Deal,
        Category::Document,
        Category::Segment,
        Category::Visual,
        Category::Evidence,
        Category::Default,
    ];

    /// Map a raw kind string to its category. Unknown kinds map to `Default`.
    pub fn classify(kind: &str) -> Self {
        let normalized = kind.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "deal" => Category::Deal,
            "document" => Category::Document,
            "segment" => Category::Segment,
            "visual" | "visual_asset" | "visual_group" => Category::Visual,
            "evidence" | "evidence_group" => Category::Evidence,
            _ => Category::Default,
        }
    }

    /// Row index, top to bottom. Unrecognized kinds share the visual row.
    pub fn layer(self) -> usize {
        match self {
            Category::Deal => 0,
            Category::Document => 1,
            Category::Segment => 2,
            Category::Visual | Category::Default => 3,
            Category::Evidence => 4,
        }
    }

    /// Expand flag used when neither the caller nor the node sets one.
    pub fn default_expanded(self) -> bool {
        match self {
            Category::Deal | Category::Document | Category::Segment => true,
            Category::Visual | Category::Evidence | Category::Default => false,
        }
    }

    /// Parents of these categories spread their children further apart.
    pub fn uses_wide_child_gap(self) -> bool {
        matches!(self, Category::Deal | Category::Document)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Deal => "deal",
            Category::Document => "document",
            Category::Segment => "segment",
            Category::Visual => "visual",
            Category::Evidence => "evidence",
            Category::Default => "default",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_accepts_legacy_and_canonical_kinds() {
        assert_eq!(Category::classify("DEAL"), Category::Deal);
        assert_eq!(Category::classify("deal"), Category::Deal);
        assert_eq!(Category::classify("DOCUMENT"), Category::Document);
        assert_eq!(Category::classify("segment"), Category::Segment);
        assert_eq!(Category::classify("VISUAL_ASSET"), Category::Visual);
        assert_eq!(Category::classify("visual_asset"), Category::Visual);
        assert_eq!(Category::classify("visual_group"), Category::Visual);
        assert_eq!(Category::classify("EVIDENCE_GROUP"), Category::Evidence);
        assert_eq!(Category::classify(" evidence-group "), Category::Evidence);
    }

    #[test]
    fn test_unknown_kind_is_default_on_visual_row() {
        let category = Category::classify("spreadsheet");
        assert_eq!(category, Category::Default);
        assert_eq!(category.layer(), Category::Visual.layer());
        assert_eq!(Category::classify("").layer(), 3);
    }

    #[test]
    fn test_layers_are_ordered_top_to_bottom() {
        let layers: Vec<usize> = [
            Category::Deal,
            Category::Document,
            Category::Segment,
            Category::Visual,
            Category::Evidence,
        ]
        .iter()
        .map(|c| c.layer())
        .collect();
        assert_eq!(layers, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_default_expansion_by_category() {
        assert!(Category::Deal.default_expanded());
        assert!(Category::Document.default_expanded());
        assert!(Category::Segment.default_expanded());
        assert!(!Category::Visual.default_expanded());
        assert!(!Category::Evidence.default_expanded());
    }
}
