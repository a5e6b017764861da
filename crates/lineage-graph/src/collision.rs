use lineage_core::{Rect, Size, Vec2};
use std::collections::BTreeMap;

/// Axis along which overlapping nodes are pushed apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionAxis {
    /// Sort by (y, x) and push later nodes down.
    Vertical,
    /// Sort by (x, y) and push later nodes right.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionItem {
    /// Nodes only collide with nodes of the same layer.
    pub layer: i64,
    pub position: Vec2,
    pub size: Size,
}

impl CollisionItem {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

/// Single forward pass per layer: after sorting, each node that starts at or
/// before the trailing edge of its predecessor is moved past it by `gap`.
///
/// This removes overlap between consecutive nodes in sort order. It does not
/// re-sort after shifting.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    pub gap: f32,
    pub axis: CollisionAxis,
}

impl CollisionResolver {
    pub fn new(gap: f32, axis: CollisionAxis) -> Self {
        Self { gap, axis }
    }

    /// Returns how many items moved.
    pub fn resolve(&self, items: &mut [CollisionItem]) -> usize {
        let mut layers: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, item) in items.iter().enumerate() {
            layers.entry(item.layer).or_default().push(idx);
        }

        let mut shifted = 0;
        for (layer, mut members) in layers {
            if members.len() < 2 {
                continue;
            }
            let moved = self.resolve_layer(items, &mut members);
            if moved > 0 {
                tracing::trace!("Collision pass moved {} nodes in layer {}", moved, layer);
            }
            shifted += moved;
        }
        shifted
    }

    fn lead(&self, item: &CollisionItem) -> f32 {
        match self.axis {
            CollisionAxis::Vertical => item.position.y,
            CollisionAxis::Horizontal => item.position.x,
        }
    }

    fn trail(&self, item: &CollisionItem) -> f32 {
        match self.axis {
            CollisionAxis::Vertical => item.position.y + item.size.height,
            CollisionAxis::Horizontal => item.position.x + item.size.width,
        }
    }

    fn resolve_layer(&self, items: &mut [CollisionItem], members: &mut [usize]) -> usize {
        members.sort_by(|&a, &b| {
            let (pa, pb) = (items[a].position, items[b].position);
            let ordering = match self.axis {
                CollisionAxis::Vertical => pa.y.total_cmp(&pb.y).then(pa.x.total_cmp(&pb.x)),
                CollisionAxis::Horizontal => pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y)),
            };
            ordering.then(a.cmp(&b))
        });

        let mut moved = 0;
        let mut previous_trail = self.trail(&items[members[0]]);
        for &idx in &members[1..] {
            let lead = self.lead(&items[idx]);
            if previous_trail >= lead {
                // Lands exactly `gap` past the previous trailing edge.
                let target = previous_trail + self.gap;
                match self.axis {
                    CollisionAxis::Vertical => items[idx].position.y = target,
                    CollisionAxis::Horizontal => items[idx].position.x = target,
                }
                moved += 1;
            }
            previous_trail = self.trail(&items[idx]);
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(layer: i64, x: f32, y: f32, w: f32, h: f32) -> CollisionItem {
        CollisionItem {
            layer,
            position: Vec2::new(x, y),
            size: Size::new(w, h),
        }
    }

    #[test]
    fn test_vertical_pass_pushes_down_by_overlap_plus_gap() {
        let mut items = vec![item(0, 0.0, 0.0, 100.0, 50.0), item(0, 0.0, 30.0, 100.0, 50.0)];
        let moved = CollisionResolver::new(10.0, CollisionAxis::Vertical).resolve(&mut items);

        assert_eq!(moved, 1);
        assert_eq!(items[0].position, Vec2::new(0.0, 0.0));
        assert_eq!(items[1].position, Vec2::new(0.0, 60.0));
    }

    #[test]
    fn test_touching_edges_count_as_overlap() {
        let mut items = vec![item(0, 0.0, 0.0, 100.0, 50.0), item(0, 0.0, 50.0, 100.0, 50.0)];
        CollisionResolver::new(8.0, CollisionAxis::Vertical).resolve(&mut items);
        assert_eq!(items[1].position.y, 58.0);
    }

    #[test]
    fn test_layers_are_independent() {
        let mut items = vec![item(0, 0.0, 0.0, 100.0, 50.0), item(1, 10.0, 0.0, 100.0, 50.0)];
        let moved = CollisionResolver::new(10.0, CollisionAxis::Horizontal).resolve(&mut items);

        assert_eq!(moved, 0);
        assert_eq!(items[1].position.x, 10.0);
    }

    #[test]
    fn test_horizontal_pass_preserves_order() {
        let mut items = vec![
            item(3, 50.0, 0.0, 100.0, 40.0),
            item(3, 0.0, 0.0, 100.0, 40.0),
            item(3, 300.0, 0.0, 100.0, 40.0),
        ];
        CollisionResolver::new(20.0, CollisionAxis::Horizontal).resolve(&mut items);

        assert_eq!(items[1].position.x, 0.0);
        assert_eq!(items[0].position.x, 120.0);
        assert_eq!(items[2].position.x, 300.0);
    }

    #[test]
    fn test_separated_layer_is_untouched() {
        let mut items = vec![item(0, 0.0, 0.0, 100.0, 40.0), item(0, 150.0, 0.0, 100.0, 40.0)];
        let before = items.clone();
        let moved = CollisionResolver::new(20.0, CollisionAxis::Horizontal).resolve(&mut items);

        assert_eq!(moved, 0);
        assert_eq!(items, before);
    }

    proptest! {
        #[test]
        fn prop_no_overlap_within_a_row_after_pass(
            boxes in proptest::collection::vec(
                (-500.0f32..500.0, 10.0f32..200.0, 10.0f32..120.0),
                1..40,
            ),
            gap in 0.0f32..50.0,
        ) {
            let mut items: Vec<CollisionItem> = boxes
                .iter()
                .map(|&(x, w, h)| item(2, x, 100.0, w, h))
                .collect();
            let order_before: Vec<usize> = {
                let mut idx: Vec<usize> = (0..items.len()).collect();
                idx.sort_by(|&a, &b| items[a].position.x.total_cmp(&items[b].position.x).then(a.cmp(&b)));
                idx
            };

            CollisionResolver::new(gap, CollisionAxis::Horizontal).resolve(&mut items);

            for i in 0..items.len() {
                for j in (i + 1)..items.len() {
                    prop_assert!(!items[i].rect().intersects(&items[j].rect()));
                }
            }
            for pair in order_before.windows(2) {
                prop_assert!(items[pair[0]].position.x < items[pair[1]].position.x);
            }
        }
    }
}
