//! Uniform-grid spatial index over world-space element bounds.
//!
//! Rebuilt at the start of every drag or resize (excluding the elements
//! being manipulated) and queried on each pointer-move frame for nearby
//! snap candidates.

use crate::geometry::{Bounds, rotated_aabb};
use crate::id::NodeId;
use std::collections::{HashMap, HashSet};

/// An element's placement in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl WorldBounds {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Axis-aligned box after rotation, used for indexing and snapping.
    pub fn aabb(&self) -> Bounds {
        rotated_aabb(self.bounds(), self.rotation)
    }
}

pub const DEFAULT_CELL_SIZE: f32 = 240.0;

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    cell_size: f32,
    items: Vec<WorldBounds>,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialIndex {
    /// Insert every item into each grid cell its box overlaps.
    pub fn build(items: Vec<WorldBounds>, cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        let mut cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            let (x0, y0, x1, y1) = cell_range(&item.aabb(), cell_size);
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    cells.entry((cx, cy)).or_default().push(i);
                }
            }
        }
        Self {
            cell_size,
            items,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in any cell touched by `rect` grown by `padding`.
    ///
    /// Cells are visited x-major then y; each item appears once, at its
    /// first encounter. Results are candidates: callers filter by distance.
    pub fn query(&self, rect: &Bounds, padding: f32) -> Vec<WorldBounds> {
        let (x0, y0, x1, y1) = cell_range(&rect.inflate(padding), self.cell_size);
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &i in bucket {
                    if seen.insert(self.items[i].id) {
                        out.push(self.items[i]);
                    }
                }
            }
        }
        out
    }
}

fn cell_range(b: &Bounds, cell: f32) -> (i32, i32, i32, i32) {
    let c = |v: f32| (v / cell).floor() as i32;
    (c(b.left()), c(b.top()), c(b.right()), c(b.bottom()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wb(id: &str, x: f32, y: f32, w: f32, h: f32) -> WorldBounds {
        WorldBounds {
            id: NodeId::intern(id),
            x,
            y,
            width: w,
            height: h,
            rotation: 0.0,
        }
    }

    #[test]
    fn spanning_items_are_returned_once() {
        let index = SpatialIndex::build(
            vec![wb("sp_wide", 0.0, 0.0, 1000.0, 10.0), wb("sp_small", 10.0, 10.0, 5.0, 5.0)],
            240.0,
        );
        let hits = index.query(&Bounds::new(0.0, 0.0, 600.0, 20.0), 0.0);
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["sp_wide", "sp_small"]);
    }

    #[test]
    fn far_items_are_not_candidates() {
        let index = SpatialIndex::build(
            vec![wb("sp_near", 100.0, 100.0, 10.0, 10.0), wb("sp_far", 5000.0, 5000.0, 10.0, 10.0)],
            240.0,
        );
        let hits = index.query(&Bounds::new(90.0, 90.0, 10.0, 10.0), 80.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, NodeId::intern("sp_near"));
    }

    #[test]
    fn negative_coordinates_land_in_negative_cells() {
        let index = SpatialIndex::build(vec![wb("sp_neg", -300.0, -10.0, 20.0, 20.0)], 240.0);
        assert_eq!(index.query(&Bounds::new(-290.0, 0.0, 1.0, 1.0), 0.0).len(), 1);
        assert!(index.query(&Bounds::new(10.0, 10.0, 1.0, 1.0), 0.0).is_empty());
    }
}
