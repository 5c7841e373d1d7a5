//! Pointer gestures: marquee, move, pan, and resize.
//!
//! A gesture starts on pointer-down from `Idle` and ends on pointer-up or
//! cancel. Move and resize stage their writes in `PendingUpdates`; the
//! host flushes them once per animation frame and pointer-up flushes the
//! rest. History is pushed on the first frame with a real delta, so a
//! click without movement leaves no undo entry.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Move | Resize | Marquee |
//! |----------|------|--------|---------|
//! | **Shift** | Lock to dominant axis | Keep aspect ratio | Add to selection |
//! | **Alt** | Measure gaps, no snapping | — | — |

use crate::input::{Modifiers, PointerButton};
use crate::session::EditorSession;
use fc_core::geometry::Bounds;
use fc_core::guides::{Axis, EdgeMask, compute_alignment, measure_gaps};
use fc_core::id::NodeId;
use fc_core::scene::ElementPatch;
use fc_core::spatial::SpatialIndex;
use fc_render::{ResizeHandle, hit_test};
use smallvec::SmallVec;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Marquee(MarqueeState),
    Move(MoveState),
    /// Last pointer position in screen pixels.
    Pan { last: (f32, f32) },
    Resize(ResizeState),
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Marquee(_) => "marquee",
            Gesture::Move(_) => "move",
            Gesture::Pan { .. } => "pan",
            Gesture::Resize(_) => "resize",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The rubber band, in world space, while a marquee is active.
    pub fn marquee_rect(&self) -> Option<Bounds> {
        match self {
            Gesture::Marquee(m) => Some(Bounds::from_corners(m.start.0, m.start.1, m.current.0, m.current.1)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct MarqueeState {
    start: (f32, f32),
    current: (f32, f32),
    additive: bool,
    /// Selection at drag start, kept when `additive`.
    base: Vec<NodeId>,
}

#[derive(Debug)]
pub struct MoveState {
    start: (f32, f32),
    /// Parent-local start position of each dragged element.
    origins: SmallVec<[(NodeId, f32, f32); 4]>,
    /// Union of the dragged elements' world boxes at drag start.
    start_bounds: Bounds,
    index: SpatialIndex,
    pushed: bool,
}

#[derive(Debug)]
pub struct ResizeState {
    id: NodeId,
    handle: ResizeHandle,
    start: (f32, f32),
    start_bounds: Bounds,
    /// World position of the element's parent origin.
    parent_origin: (f32, f32),
    aspect: f32,
    index: SpatialIndex,
    pushed: bool,
}

/// Mutable box edges in world space.
#[derive(Debug, Clone, Copy)]
struct Edges {
    l: f32,
    t: f32,
    r: f32,
    b: f32,
}

impl Edges {
    fn of(b: &Bounds) -> Self {
        Self {
            l: b.left(),
            t: b.top(),
            r: b.right(),
            b: b.bottom(),
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.l, self.t, self.r - self.l, self.b - self.t)
    }

    fn round(&mut self) {
        self.l = self.l.round();
        self.t = self.t.round();
        self.r = self.r.round();
        self.b = self.b.round();
    }

    /// Re-derive the dimension not on `axis` from the one that is, keeping
    /// the handle's opposite edge (or the start center) fixed.
    fn fit_aspect(&mut self, handle: ResizeHandle, axis: Axis, aspect: f32, center: (f32, f32)) {
        match axis {
            Axis::X => {
                let h = (self.r - self.l) / aspect;
                if handle.moves_top() {
                    self.t = self.b - h;
                } else if handle.moves_bottom() {
                    self.b = self.t + h;
                } else {
                    self.t = center.1 - h / 2.0;
                    self.b = center.1 + h / 2.0;
                }
            }
            Axis::Y => {
                let w = (self.b - self.t) * aspect;
                if handle.moves_left() {
                    self.l = self.r - w;
                } else if handle.moves_right() {
                    self.r = self.l + w;
                } else {
                    self.l = center.0 - w / 2.0;
                    self.r = center.0 + w / 2.0;
                }
            }
        }
    }

    fn clamp_min(&mut self, handle: ResizeHandle, min: f32, center: (f32, f32)) {
        if self.r - self.l < min {
            if handle.moves_left() {
                self.l = self.r - min;
            } else if handle.moves_right() {
                self.r = self.l + min;
            } else {
                self.l = center.0 - min / 2.0;
                self.r = center.0 + min / 2.0;
            }
        }
        if self.b - self.t < min {
            if handle.moves_top() {
                self.t = self.b - min;
            } else if handle.moves_bottom() {
                self.b = self.t + min;
            } else {
                self.t = center.1 - min / 2.0;
                self.b = center.1 + min / 2.0;
            }
        }
    }
}

impl EditorSession {
    // ─── Pointer events (screen coordinates) ─────────────────────────────

    pub fn pointer_down(&mut self, sx: f32, sy: f32, button: PointerButton, mods: Modifiers) {
        if !self.gesture.is_idle() || button == PointerButton::Secondary {
            return;
        }
        self.commit_pending();
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);

        if button == PointerButton::Primary {
            if let Some((id, handle)) = self.handle_at(wx, wy) {
                self.begin_resize(id, handle, wx, wy);
                return;
            }
            if let Some(hit) = hit_test(&self.document.scene, wx, wy) {
                self.begin_move(hit, wx, wy, mods);
                return;
            }
        }

        if self.space_held || button == PointerButton::Middle {
            self.gesture = Gesture::Pan { last: (sx, sy) };
            return;
        }

        if !mods.shift {
            self.selection.clear();
        }
        self.gesture = Gesture::Marquee(MarqueeState {
            start: (wx, wy),
            current: (wx, wy),
            additive: mods.shift,
            base: self.selection.clone(),
        });
    }

    pub fn pointer_move(&mut self, sx: f32, sy: f32, mods: Modifiers) {
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);
        let mut gesture = std::mem::take(&mut self.gesture);
        match &mut gesture {
            Gesture::Idle => {}
            Gesture::Marquee(m) => m.current = (wx, wy),
            Gesture::Pan { last } => {
                self.viewport.pan(sx - last.0, sy - last.1);
                *last = (sx, sy);
            }
            Gesture::Move(st) => self.drag_move(st, wx, wy, mods),
            Gesture::Resize(st) => self.drag_resize(st, wx, wy, mods),
        }
        self.gesture = gesture;
    }

    pub fn pointer_up(&mut self, sx: f32, sy: f32, mods: Modifiers) {
        self.pointer_move(sx, sy, mods);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Pan { .. } => {}
            Gesture::Marquee(m) => self.finish_marquee(m),
            Gesture::Move(st) => {
                self.commit_pending();
                log::debug!("move finished ({} element(s))", st.origins.len());
            }
            Gesture::Resize(st) => {
                self.commit_pending();
                log::debug!("resize of {} finished", st.id);
            }
        }
        self.guides.clear();
        self.measurements.clear();
    }

    /// Pointer left the canvas or the host cancelled: end the gesture,
    /// keeping whatever it already applied.
    pub fn pointer_cancel(&mut self) {
        self.commit_pending();
        self.gesture = Gesture::Idle;
        self.guides.clear();
        self.measurements.clear();
    }

    /// Drop the gesture and anything it staged.
    pub(crate) fn cancel_gesture(&mut self) {
        self.gesture = Gesture::Idle;
        self.pending.clear();
        self.guides.clear();
        self.measurements.clear();
    }

    // ─── Gesture starts ──────────────────────────────────────────────────

    /// Resize handle under a world point, for a single selection only.
    fn handle_at(&self, wx: f32, wy: f32) -> Option<(NodeId, ResizeHandle)> {
        let [id] = self.selection.as_slice() else {
            return None;
        };
        let bounds = self.document.scene.world_bounds(*id)?;
        let half = self.config.handle_size / self.viewport.zoom;
        let (corners, edges): (Vec<ResizeHandle>, Vec<ResizeHandle>) =
            ResizeHandle::ALL.into_iter().partition(|h| h.is_corner());
        corners
            .into_iter()
            .chain(edges)
            .find(|h| {
                let (ax, ay) = h.anchor(&bounds);
                (wx - ax).abs() <= half && (wy - ay).abs() <= half
            })
            .map(|h| (*id, h))
    }

    fn begin_resize(&mut self, id: NodeId, handle: ResizeHandle, wx: f32, wy: f32) {
        let scene = &self.document.scene;
        let (Some(bounds), Some(el)) = (scene.world_bounds(id), scene.get(id)) else {
            return;
        };
        let aspect = if bounds.width > 0.0 && bounds.height > 0.0 {
            bounds.width / bounds.height
        } else {
            1.0
        };
        let exclude = HashSet::from([id]);
        let index = SpatialIndex::build(scene.world_bounds_excluding(&exclude), self.config.guides.cell_size);
        log::debug!("resize {id} from {handle:?}");
        self.gesture = Gesture::Resize(ResizeState {
            id,
            handle,
            start: (wx, wy),
            start_bounds: bounds,
            parent_origin: (bounds.x - el.x, bounds.y - el.y),
            aspect,
            index,
            pushed: false,
        });
    }

    fn begin_move(&mut self, hit: NodeId, wx: f32, wy: f32, mods: Modifiers) {
        if !self.selection.contains(&hit) {
            if mods.shift {
                let mut ids = self.selection.clone();
                ids.push(hit);
                self.set_selection(&ids);
            } else {
                self.selection = vec![hit];
            }
        }

        let scene = &self.document.scene;
        let moving = scene.top_level_selection(&self.selection);
        let origins: SmallVec<[(NodeId, f32, f32); 4]> = moving
            .iter()
            .filter_map(|&id| scene.get(id).map(|el| (id, el.x, el.y)))
            .collect();
        let Some(start_bounds) = Bounds::union_all(moving.iter().filter_map(|&id| scene.world_aabb(id))) else {
            return;
        };
        let exclude: HashSet<NodeId> = moving.into_iter().collect();
        let index = SpatialIndex::build(scene.world_bounds_excluding(&exclude), self.config.guides.cell_size);
        log::debug!("move started ({} element(s))", origins.len());
        self.gesture = Gesture::Move(MoveState {
            start: (wx, wy),
            origins,
            start_bounds,
            index,
            pushed: false,
        });
    }

    // ─── Gesture updates ─────────────────────────────────────────────────

    fn push_once(&mut self, pushed: &mut bool) {
        if !*pushed {
            let before = self.snapshot();
            self.history.push(before);
            *pushed = true;
        }
    }

    fn drag_move(&mut self, st: &mut MoveState, wx: f32, wy: f32, mods: Modifiers) {
        let (mut dx, mut dy) = (wx - st.start.0, wy - st.start.1);
        let lock = mods
            .shift
            .then(|| if dx.abs() >= dy.abs() { Axis::X } else { Axis::Y });
        match lock {
            Some(Axis::X) => dy = 0.0,
            Some(Axis::Y) => dx = 0.0,
            None => {}
        }
        if !st.pushed && dx == 0.0 && dy == 0.0 {
            return;
        }
        self.push_once(&mut st.pushed);

        let moved = st.start_bounds.translate(dx, dy);
        let candidates = st.index.query(&moved, self.config.guides.search_radius);
        self.guides.clear();
        self.measurements.clear();
        if mods.alt {
            self.measurements = measure_gaps(&moved, &candidates);
        } else {
            let align = compute_alignment(&moved, &candidates, EdgeMask::ALL, self.config.guides.snap_threshold);
            if lock != Some(Axis::Y)
                && let Some(snap) = align.x
            {
                dx += snap.delta;
                self.guides.push(snap.guide);
            }
            if lock != Some(Axis::X)
                && let Some(snap) = align.y
            {
                dy += snap.delta;
                self.guides.push(snap.guide);
            }
        }

        for &(id, ox, oy) in &st.origins {
            self.pending.stage(id, ElementPatch::position(ox + dx, oy + dy));
        }
    }

    fn drag_resize(&mut self, st: &mut ResizeState, wx: f32, wy: f32, mods: Modifiers) {
        let (dx, dy) = (wx - st.start.0, wy - st.start.1);
        if !st.pushed && dx == 0.0 && dy == 0.0 {
            return;
        }
        self.push_once(&mut st.pushed);

        let handle = st.handle;
        let center = st.start_bounds.center();
        let min = self.config.min_size;
        let mut e = Edges::of(&st.start_bounds);
        if handle.moves_left() {
            e.l += dx;
        }
        if handle.moves_right() {
            e.r += dx;
        }
        if handle.moves_top() {
            e.t += dy;
        }
        if handle.moves_bottom() {
            e.b += dy;
        }

        let dominant = if handle.is_corner() {
            if dx.abs() >= dy.abs() { Axis::X } else { Axis::Y }
        } else if handle.moves_left() || handle.moves_right() {
            Axis::X
        } else {
            Axis::Y
        };
        if mods.shift {
            e.fit_aspect(handle, dominant, st.aspect, center);
        } else {
            e.round();
        }
        e.clamp_min(handle, min, center);

        let mask = EdgeMask {
            left: handle.moves_left(),
            right: handle.moves_right(),
            top: handle.moves_top(),
            bottom: handle.moves_bottom(),
            ..EdgeMask::NONE
        };
        let current = e.bounds();
        let candidates = st.index.query(&current, self.config.guides.search_radius);
        let align = compute_alignment(&current, &candidates, mask, self.config.guides.snap_threshold);

        let mut guide_x = None;
        let mut guide_y = None;
        if let Some(snap) = align.x {
            if handle.moves_left() {
                e.l += snap.delta;
            } else {
                e.r += snap.delta;
            }
            guide_x = Some(snap.guide);
        }
        if let Some(snap) = align.y {
            if handle.moves_top() {
                e.t += snap.delta;
            } else {
                e.b += snap.delta;
            }
            guide_y = Some(snap.guide);
        }
        if mods.shift {
            let follow = match (guide_x.is_some(), guide_y.is_some()) {
                (true, false) => Some(Axis::X),
                (false, true) => Some(Axis::Y),
                (true, true) => Some(dominant),
                (false, false) => None,
            };
            if let Some(axis) = follow {
                e.fit_aspect(handle, axis, st.aspect, center);
                match axis {
                    Axis::X => guide_y = None,
                    Axis::Y => guide_x = None,
                }
            }
        }
        e.clamp_min(handle, min, center);

        self.guides = guide_x.into_iter().chain(guide_y).collect();
        self.measurements.clear();

        let world = e.bounds();
        let (px, py) = st.parent_origin;
        self.pending.stage(
            st.id,
            ElementPatch::bounds(Bounds::new(world.x - px, world.y - py, world.width, world.height)),
        );
    }

    fn finish_marquee(&mut self, m: MarqueeState) {
        let rect = Bounds::from_corners(m.start.0, m.start.1, m.current.0, m.current.1);
        let threshold = self.config.click_threshold;
        if rect.width < threshold && rect.height < threshold {
            if !m.additive {
                self.selection.clear();
            }
            return;
        }
        let hits = self.document.scene.collect_in_rect(rect);
        let ids: Vec<NodeId> = if m.additive {
            m.base.into_iter().chain(hits).collect()
        } else {
            hits
        };
        self.set_selection(&ids);
        log::debug!("marquee selected {} element(s)", self.selection.len());
    }
}
