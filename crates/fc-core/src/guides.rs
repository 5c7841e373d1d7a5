//! Smart guides: edge/center alignment snapping and gap measurement.
//!
//! Both are pure functions of the moving box and a candidate list; the
//! editor feeds them candidates from a `SpatialIndex` on every drag frame
//! and the renderer draws the resulting `GuideLine`s and `Measurement`s.

use crate::geometry::Bounds;
use crate::spatial::WorldBounds;
use serde::{Deserialize, Serialize};

/// Tuning for snapping during drag and resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuideConfig {
    /// Maximum edge distance (world units) that still snaps. Inclusive.
    pub snap_threshold: f32,
    /// Padding around the moving box when querying for candidates.
    pub search_radius: f32,
    /// Spatial index grid size.
    pub cell_size: f32,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 4.0,
            search_radius: 80.0,
            cell_size: crate::spatial::DEFAULT_CELL_SIZE,
        }
    }
}

/// Which edges of the moving box may snap. A move enables all six; a
/// resize enables only the edges its handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeMask {
    pub left: bool,
    pub center_x: bool,
    pub right: bool,
    pub top: bool,
    pub center_y: bool,
    pub bottom: bool,
}

impl EdgeMask {
    pub const ALL: EdgeMask = EdgeMask {
        left: true,
        center_x: true,
        right: true,
        top: true,
        center_y: true,
        bottom: true,
    };

    pub const NONE: EdgeMask = EdgeMask {
        left: false,
        center_x: false,
        right: false,
        top: false,
        center_y: false,
        bottom: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Snaps horizontally; drawn as a vertical line.
    X,
    /// Snaps vertically; drawn as a horizontal line.
    Y,
}

/// Which edge of the moving box produced a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    CenterX,
    Right,
    Top,
    CenterY,
    Bottom,
}

/// A guide segment in world space. For `Axis::X` it is the vertical line
/// `x = position` from `y = start` to `y = end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub axis: Axis,
    pub position: f32,
    pub start: f32,
    pub end: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    /// Signed correction to add to the moving box along the axis.
    pub delta: f32,
    pub edge: Edge,
    pub guide: GuideLine,
}

/// At most one snap per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Alignment {
    pub x: Option<Snap>,
    pub y: Option<Snap>,
}

impl Alignment {
    pub fn dx(&self) -> f32 {
        self.x.map_or(0.0, |s| s.delta)
    }

    pub fn dy(&self) -> f32 {
        self.y.map_or(0.0, |s| s.delta)
    }

    pub fn guides(&self) -> Vec<GuideLine> {
        self.x.iter().chain(self.y.iter()).map(|s| s.guide).collect()
    }
}

struct Best {
    delta: f32,
    edge: Edge,
    target: Bounds,
}

/// Find the closest candidate edge within `threshold` for each axis.
///
/// Every enabled moving edge is compared with the left/center/right (or
/// top/center/bottom) of each candidate. Candidates are scanned in the
/// given order and only a strictly smaller distance replaces the current
/// best, so ties resolve to the first one found.
pub fn compute_alignment(
    moving: &Bounds,
    candidates: &[WorldBounds],
    mask: EdgeMask,
    threshold: f32,
) -> Alignment {
    let (mcx, mcy) = moving.center();
    let x_edges: Vec<(Edge, f32)> = [
        (mask.left, Edge::Left, moving.left()),
        (mask.center_x, Edge::CenterX, mcx),
        (mask.right, Edge::Right, moving.right()),
    ]
    .into_iter()
    .filter(|(on, ..)| *on)
    .map(|(_, e, v)| (e, v))
    .collect();
    let y_edges: Vec<(Edge, f32)> = [
        (mask.top, Edge::Top, moving.top()),
        (mask.center_y, Edge::CenterY, mcy),
        (mask.bottom, Edge::Bottom, moving.bottom()),
    ]
    .into_iter()
    .filter(|(on, ..)| *on)
    .map(|(_, e, v)| (e, v))
    .collect();

    let mut best_x: Option<Best> = None;
    let mut best_y: Option<Best> = None;

    for cand in candidates {
        let c = cand.aabb();
        let (ccx, ccy) = c.center();
        consider(&mut best_x, &x_edges, [c.left(), ccx, c.right()], c, threshold);
        consider(&mut best_y, &y_edges, [c.top(), ccy, c.bottom()], c, threshold);
    }

    let dx = best_x.as_ref().map_or(0.0, |b| b.delta);
    let dy = best_y.as_ref().map_or(0.0, |b| b.delta);
    let snapped = moving.translate(dx, dy);

    Alignment {
        x: best_x.map(|b| Snap {
            delta: b.delta,
            edge: b.edge,
            guide: GuideLine {
                axis: Axis::X,
                position: edge_value(&snapped, b.edge),
                start: snapped.top().min(b.target.top()),
                end: snapped.bottom().max(b.target.bottom()),
            },
        }),
        y: best_y.map(|b| Snap {
            delta: b.delta,
            edge: b.edge,
            guide: GuideLine {
                axis: Axis::Y,
                position: edge_value(&snapped, b.edge),
                start: snapped.left().min(b.target.left()),
                end: snapped.right().max(b.target.right()),
            },
        }),
    }
}

fn consider(
    best: &mut Option<Best>,
    sources: &[(Edge, f32)],
    targets: [f32; 3],
    target: Bounds,
    threshold: f32,
) {
    for &(edge, from) in sources {
        for to in targets {
            let delta = to - from;
            if delta.abs() > threshold {
                continue;
            }
            if best.as_ref().is_none_or(|b| delta.abs() < b.delta.abs()) {
                *best = Some(Best {
                    delta,
                    edge,
                    target,
                });
            }
        }
    }
}

fn edge_value(b: &Bounds, edge: Edge) -> f32 {
    let (cx, cy) = b.center();
    match edge {
        Edge::Left => b.left(),
        Edge::CenterX => cx,
        Edge::Right => b.right(),
        Edge::Top => b.top(),
        Edge::CenterY => cy,
        Edge::Bottom => b.bottom(),
    }
}

// ─── Measurement ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// A gap annotation from the moving box to its nearest neighbor on one
/// side, drawn as a segment from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub side: Side,
    pub distance: f32,
    pub from: (f32, f32),
    pub to: (f32, f32),
}

/// Nearest neighbor in each of the four directions.
///
/// A neighbor qualifies only with a positive gap and positive overlap on
/// the perpendicular axis. Sides are resolved independently.
pub fn measure_gaps(moving: &Bounds, candidates: &[WorldBounds]) -> Vec<Measurement> {
    let mut best: [Option<Measurement>; 4] = [None; 4];

    for cand in candidates {
        let c = cand.aabb();

        let overlap_y0 = moving.top().max(c.top());
        let overlap_y1 = moving.bottom().min(c.bottom());
        if overlap_y1 - overlap_y0 > 0.0 {
            let y = (overlap_y0 + overlap_y1) / 2.0;
            let right_gap = c.left() - moving.right();
            if right_gap > 0.0 {
                keep_nearest(&mut best[1], Side::Right, right_gap, (moving.right(), y), (c.left(), y));
            }
            let left_gap = moving.left() - c.right();
            if left_gap > 0.0 {
                keep_nearest(&mut best[0], Side::Left, left_gap, (moving.left(), y), (c.right(), y));
            }
        }

        let overlap_x0 = moving.left().max(c.left());
        let overlap_x1 = moving.right().min(c.right());
        if overlap_x1 - overlap_x0 > 0.0 {
            let x = (overlap_x0 + overlap_x1) / 2.0;
            let bottom_gap = c.top() - moving.bottom();
            if bottom_gap > 0.0 {
                keep_nearest(&mut best[3], Side::Bottom, bottom_gap, (x, moving.bottom()), (x, c.top()));
            }
            let top_gap = moving.top() - c.bottom();
            if top_gap > 0.0 {
                keep_nearest(&mut best[2], Side::Top, top_gap, (x, moving.top()), (x, c.bottom()));
            }
        }
    }

    best.into_iter().flatten().collect()
}

fn keep_nearest(
    slot: &mut Option<Measurement>,
    side: Side,
    distance: f32,
    from: (f32, f32),
    to: (f32, f32),
) {
    if slot.is_none_or(|m| distance < m.distance) {
        *slot = Some(Measurement {
            side,
            distance,
            from,
            to,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
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
    fn snaps_right_edge_to_neighbor_left_edge() {
        let b = wb("gd_b", 200.0, 0.0, 100.0, 100.0);
        let moving = Bounds::new(97.5, 0.0, 100.0, 100.0);
        let a = compute_alignment(&moving, &[b], EdgeMask::ALL, 4.0);
        assert_eq!(a.dx(), 2.5);
        assert_eq!(a.x.map(|s| s.edge), Some(Edge::Right));
        assert_eq!(moving.x + a.dx(), 100.0);
        let guide = a.x.unwrap().guide;
        assert_eq!((guide.position, guide.start, guide.end), (200.0, 0.0, 100.0));
    }

    #[test]
    fn threshold_is_inclusive() {
        let b = wb("gd_t", 200.0, 500.0, 100.0, 100.0);
        let at = Bounds::new(96.0, 0.0, 100.0, 100.0);
        let past = Bounds::new(95.99, 0.0, 100.0, 100.0);
        assert_eq!(compute_alignment(&at, &[b], EdgeMask::ALL, 4.0).dx(), 4.0);
        assert!(compute_alignment(&past, &[b], EdgeMask::ALL, 4.0).x.is_none());
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        // Left edges at 103 and right edge at 97: both 3 away from x = 100.
        let first = wb("gd_first", 103.0, 300.0, 40.0, 10.0);
        let second = wb("gd_second", 57.0, 400.0, 40.0, 10.0);
        let moving = Bounds::new(100.0, 0.0, 50.0, 50.0);
        let mask = EdgeMask {
            left: true,
            ..EdgeMask::NONE
        };
        let a = compute_alignment(&moving, &[first, second], mask, 4.0);
        assert_eq!(a.dx(), 3.0);
        let a = compute_alignment(&moving, &[second, first], mask, 4.0);
        assert_eq!(a.dx(), -3.0);
    }

    #[test]
    fn masked_edges_never_snap() {
        let b = wb("gd_m", 200.0, 0.0, 100.0, 100.0);
        let moving = Bounds::new(98.0, 0.0, 100.0, 100.0);
        let mask = EdgeMask {
            left: true,
            top: true,
            ..EdgeMask::NONE
        };
        let a = compute_alignment(&moving, &[b], mask, 4.0);
        assert!(a.x.is_none());
        assert_eq!(a.dy(), 0.0);
        assert!(a.y.is_some());
    }

    #[test]
    fn gaps_need_cross_axis_overlap() {
        let moving = Bounds::new(100.0, 100.0, 50.0, 50.0);
        let cands = [
            wb("gd_right_near", 180.0, 120.0, 10.0, 10.0),
            wb("gd_right_far", 300.0, 100.0, 10.0, 10.0),
            wb("gd_below_offset", 400.0, 400.0, 10.0, 10.0),
            wb("gd_above", 110.0, 20.0, 10.0, 10.0),
        ];
        let gaps = measure_gaps(&moving, &cands);
        assert_eq!(gaps.len(), 2);
        assert_eq!((gaps[0].side, gaps[0].distance), (Side::Right, 30.0));
        assert_eq!((gaps[1].side, gaps[1].distance), (Side::Top, 70.0));
        assert_eq!(gaps[0].from, (150.0, 125.0));
    }
}
