pub mod collision;
pub mod config;
pub mod descendants;
pub mod index;
pub mod layered;
pub mod layout;
pub mod pipeline;
pub mod sizing;
pub mod tree;
pub mod visibility;

pub use collision::{CollisionAxis, CollisionItem, CollisionResolver};
pub use config::{LayeredSpacing, LayoutConfig, RowOffsets};
pub use descendants::{DescendantCounter, DescendantCounts};
pub use index::LineageIndex;
pub use layered::{LayeredInput, LayeredLayout, LayeredLayouter, LayeredNode, RankedLayered};
pub use layout::{LayoutEngine, LayoutGraph, LayoutNode, Layouter};
pub use pipeline::{LayoutRequest, LayoutResult, LineageDocument, LineageLayout};
pub use sizing::{SizeResolver, SizeTable};
pub use tree::TreeLayouter;
pub use visibility::{ExpandedState, VisibilityResolver, VisibleGraph, is_expanded};
