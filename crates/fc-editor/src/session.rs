//! The editor session: one document, its selection, history, viewport,
//! and the transient state of whatever gesture is in progress.
//!
//! Everything runs on the host's UI thread. Mutating operations snapshot
//! history before their first change; failed preconditions leave the
//! document untouched and queue a notice instead.

use crate::config::EditorConfig;
use crate::history::{History, Snapshot};
use crate::images::ImageDrop;
use crate::input::Modifiers;
use crate::interaction::Gesture;
use crate::notice::Notice;
use crate::pending::PendingUpdates;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use fc_core::document::{DUPLICATE_OFFSET, Document};
use fc_core::error::{EditError, EditResult};
use fc_core::geometry::Bounds;
use fc_core::guides::{GuideLine, Measurement};
use fc_core::id::NodeId;
use fc_core::model::ElementNode;
use fc_core::scene::{ElementPatch, ZDirection};
use fc_core::viewport::Viewport;
use fc_render::{ImageAssets, Overlay};
use std::collections::VecDeque;

pub struct EditorSession {
    pub(crate) config: EditorConfig,
    pub(crate) document: Document,
    /// Ordered; the last id is the primary selection.
    pub(crate) selection: Vec<NodeId>,
    pub(crate) history: History,
    pub(crate) viewport: Viewport,
    pub(crate) gesture: Gesture,
    pub(crate) pending: PendingUpdates,
    pub(crate) guides: Vec<GuideLine>,
    pub(crate) measurements: Vec<Measurement>,
    pub(crate) space_held: bool,
    pub(crate) image_queue: VecDeque<ImageDrop>,
    pub(crate) assets: ImageAssets,
    pub(crate) notices: Vec<Notice>,
    /// Copied subtrees in world coordinates.
    clipboard: Vec<ElementNode>,
    /// Times the current clipboard has been pasted.
    pastes: u32,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    pub fn with_document(document: Document, config: EditorConfig) -> Self {
        Self {
            history: History::new(config.history_limit),
            config,
            document,
            selection: Vec::new(),
            viewport: Viewport::default(),
            gesture: Gesture::Idle,
            pending: PendingUpdates::new(),
            guides: Vec::new(),
            measurements: Vec::new(),
            space_held: false,
            image_queue: VecDeque::new(),
            assets: ImageAssets::new(),
            notices: Vec::new(),
            clipboard: Vec::new(),
            pastes: 0,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// The last selected id, shown in property panels.
    pub fn primary(&self) -> Option<NodeId> {
        self.selection.last().copied()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn assets(&self) -> &ImageAssets {
        &self.assets
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drain queued notices for the host's notification sink.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notify_error(&mut self, err: &EditError) {
        log::debug!("edit refused: {err}");
        self.notices.push(Notice::from(err));
    }

    // ─── Transactions ────────────────────────────────────────────────────

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            selection: self.selection.clone(),
        }
    }

    /// Run an edit. `Ok(Some(_))` means the document changed and the
    /// pre-edit state is pushed to history; `Ok(None)` is a no-op;
    /// `Err` becomes a notice.
    fn transact<T>(
        &mut self,
        label: &str,
        edit: impl FnOnce(&mut Self) -> EditResult<Option<T>>,
    ) -> Option<T> {
        self.commit_pending();
        let before = self.snapshot();
        match edit(self) {
            Ok(Some(value)) => {
                self.history.push(before);
                log::debug!("{label}");
                Some(value)
            }
            Ok(None) => None,
            Err(err) => {
                self.notify_error(&err);
                None
            }
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.history.set_restoring(true);
        self.cancel_gesture();
        self.document = snapshot.document;
        self.selection = snapshot.selection;
        self.history.set_restoring(false);
    }

    pub fn undo(&mut self) -> bool {
        self.commit_pending();
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.commit_pending();
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    /// Replace the document (e.g. after an import) and reset history.
    pub fn load(&mut self, document: Document) {
        self.cancel_gesture();
        self.document = document;
        self.selection.clear();
        self.history.clear();
    }

    pub fn load_json(&mut self, json: &str) -> EditResult<()> {
        match Document::from_json(json) {
            Ok(doc) => {
                self.load(doc);
                Ok(())
            }
            Err(err) => {
                self.notify_error(&err);
                Err(err)
            }
        }
    }

    pub fn export_json(&self) -> EditResult<String> {
        self.document.to_json()
    }

    /// SVG of the first root frame. A missing frame queues a notice.
    pub fn export_svg(&mut self) -> Option<String> {
        match fc_core::svg::export_svg(&self.document) {
            Ok(svg) => Some(svg),
            Err(err) => {
                self.notify_error(&err);
                None
            }
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Replace the selection, keeping only top-level ids.
    pub fn set_selection(&mut self, ids: &[NodeId]) {
        self.selection = self.document.scene.top_level_selection(ids);
    }

    pub fn select_all(&mut self) {
        self.selection = self.document.scene.root_ids();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Insert `node` (fresh ids) under `parent` and select it.
    pub fn add(&mut self, parent: Option<NodeId>, node: ElementNode) -> Option<NodeId> {
        self.transact("add element", |s| {
            let id = s.document.insert_fresh(parent, None, node)?;
            s.selection = vec![id];
            Ok(Some(id))
        })
    }

    pub fn delete_selection(&mut self) -> bool {
        self.transact("delete selection", |s| {
            let ids = s.document.scene.top_level_selection(&s.selection);
            let removed = ids
                .iter()
                .filter(|&&id| s.document.scene.delete(id).is_some())
                .count();
            if removed == 0 {
                return Ok(None);
            }
            s.selection.clear();
            Ok(Some(()))
        })
        .is_some()
    }

    /// Duplicate every top-level selected element; the copies become the
    /// selection.
    pub fn duplicate_selection(&mut self) -> Vec<NodeId> {
        self.transact("duplicate selection", |s| {
            let ids = s.document.scene.top_level_selection(&s.selection);
            let copies: Vec<NodeId> = ids
                .into_iter()
                .filter_map(|id| s.document.duplicate(id))
                .collect();
            if copies.is_empty() {
                return Ok(None);
            }
            s.selection = copies.clone();
            Ok(Some(copies))
        })
        .unwrap_or_default()
    }

    pub fn group_selection(&mut self) -> Option<NodeId> {
        self.transact("group selection", |s| {
            let group = s.document.group(&s.selection)?;
            s.selection = vec![group];
            Ok(Some(group))
        })
    }

    pub fn ungroup_selection(&mut self) -> Vec<NodeId> {
        self.transact("ungroup selection", |s| {
            let released = s.document.scene.ungroup(&s.selection);
            if released.is_empty() {
                return Ok(None);
            }
            s.selection = released.clone();
            Ok(Some(released))
        })
        .unwrap_or_default()
    }

    /// One adjacent-swap step in `direction` per call.
    pub fn reorder_selection(&mut self, direction: ZDirection) -> bool {
        self.transact("reorder", |s| {
            Ok(s.document.scene.reorder(&s.selection, direction).then_some(()))
        })
        .is_some()
    }

    pub fn reorder_selection_to_edge(&mut self, direction: ZDirection) -> bool {
        self.transact("reorder to edge", |s| {
            Ok(s
                .document
                .scene
                .reorder_to_edge(&s.selection, direction)
                .then_some(()))
        })
        .is_some()
    }

    pub fn update_element(&mut self, id: NodeId, patch: &ElementPatch) -> bool {
        self.transact("update element", |s| {
            Ok(s.document.scene.update(id, patch).then_some(()))
        })
        .is_some()
    }

    /// Apply `patch` to every selected element as one undo step.
    pub fn update_selection(&mut self, patch: &ElementPatch) -> bool {
        self.transact("update selection", |s| {
            let ids = s.selection.clone();
            let changed = ids
                .into_iter()
                .filter(|&id| s.document.scene.update(id, patch))
                .count();
            Ok((changed > 0).then_some(()))
        })
        .is_some()
    }

    pub fn nudge(&mut self, dx: f32, dy: f32) -> bool {
        self.transact("nudge", |s| {
            let ids = s.document.scene.top_level_selection(&s.selection);
            let moved = ids
                .into_iter()
                .filter(|&id| {
                    s.document.scene.update_with(id, |el| {
                        el.x += dx;
                        el.y += dy;
                    })
                })
                .count();
            Ok((moved > 0).then_some(()))
        })
        .is_some()
    }

    pub fn promote_selection_to_master(&mut self) -> Option<NodeId> {
        self.transact("promote to master", |s| {
            let Some(id) = s.primary() else {
                return Ok(None);
            };
            s.document.promote_to_master(id).map(Some)
        })
    }

    pub fn instantiate(&mut self, master_id: NodeId, parent: Option<NodeId>, x: f32, y: f32) -> Option<NodeId> {
        self.transact("instantiate master", |s| {
            let id = s.document.instantiate(master_id, parent, x, y)?;
            s.selection = vec![id];
            Ok(Some(id))
        })
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    pub fn copy_selection(&mut self) -> usize {
        let scene = &self.document.scene;
        self.clipboard = scene
            .top_level_selection(&self.selection)
            .into_iter()
            .filter_map(|id| {
                let mut node = scene.extract(id)?;
                let world = scene.world_bounds(id)?;
                node.element.x = world.x;
                node.element.y = world.y;
                Some(node)
            })
            .collect();
        self.pastes = 0;
        self.clipboard.len()
    }

    pub fn cut_selection(&mut self) -> bool {
        self.copy_selection() > 0 && self.delete_selection()
    }

    /// Paste the clipboard at the root, offset further on each paste.
    pub fn paste(&mut self) -> Vec<NodeId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let offset = DUPLICATE_OFFSET * (self.pastes + 1) as f32;
        let nodes = self.clipboard.clone();
        let pasted = self
            .transact("paste", |s| {
                let mut ids = Vec::with_capacity(nodes.len());
                for mut node in nodes {
                    node.element.x += offset;
                    node.element.y += offset;
                    ids.push(s.document.insert_fresh(None, None, node)?);
                }
                s.selection = ids.clone();
                Ok(Some(ids))
            })
            .unwrap_or_default();
        if !pasted.is_empty() {
            self.pastes += 1;
        }
        pasted
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Wheel zoom anchored at the cursor. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f32, sx: f32, sy: f32, precise: bool) {
        if delta_y == 0.0 {
            return;
        }
        let step = if precise {
            self.config.precise_wheel_step
        } else {
            self.config.wheel_step
        };
        let factor = if delta_y < 0.0 { 1.0 + step } else { 1.0 / (1.0 + step) };
        self.zoom_by(factor, sx, sy);
    }

    pub fn zoom_by(&mut self, factor: f32, sx: f32, sy: f32) {
        let (min, max) = (self.config.min_zoom, self.config.max_zoom);
        self.viewport.zoom_at(factor, sx, sy, min, max);
    }

    fn zoom_centered(&mut self, factor: f32) {
        let (cx, cy) = (self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.zoom_by(factor, cx, cy);
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key press. Returns `true` when the key was consumed.
    pub fn key_down(&mut self, key: &str, mods: Modifiers) -> bool {
        let Some(action) = ShortcutMap::resolve(key, mods) else {
            return false;
        };
        self.run_action(action);
        true
    }

    pub fn key_up(&mut self, key: &str) {
        if key == " " {
            self.space_held = false;
        }
    }

    pub fn run_action(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Delete => {
                self.delete_selection();
            }
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Duplicate => {
                self.duplicate_selection();
            }
            ShortcutAction::Copy => {
                self.copy_selection();
            }
            ShortcutAction::Cut => {
                self.cut_selection();
            }
            ShortcutAction::Paste => {
                self.paste();
            }
            ShortcutAction::Group => {
                self.group_selection();
            }
            ShortcutAction::Ungroup => {
                self.ungroup_selection();
            }
            ShortcutAction::ZoomIn => self.zoom_centered(self.config.zoom_step),
            ShortcutAction::ZoomOut => self.zoom_centered(1.0 / self.config.zoom_step),
            ShortcutAction::ZoomReset => {
                let (min, max) = (self.config.min_zoom, self.config.max_zoom);
                self.viewport.set_zoom(1.0, min, max);
            }
            ShortcutAction::PanStart => self.space_held = true,
            ShortcutAction::SendBackward => {
                self.reorder_selection(ZDirection::Backward);
            }
            ShortcutAction::BringForward => {
                self.reorder_selection(ZDirection::Forward);
            }
            ShortcutAction::SendToBack => {
                self.reorder_selection_to_edge(ZDirection::Backward);
            }
            ShortcutAction::BringToFront => {
                self.reorder_selection_to_edge(ZDirection::Forward);
            }
            ShortcutAction::Deselect => {
                self.cancel_gesture();
                self.clear_selection();
            }
            ShortcutAction::Nudge { dir, large } => {
                let step = if large {
                    self.config.nudge_large
                } else {
                    self.config.nudge
                };
                let (ux, uy) = dir.unit();
                self.nudge(ux * step, uy * step);
            }
        }
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    /// Write staged gesture updates. Call once per animation frame.
    /// Returns `true` when the scene changed.
    pub fn on_animation_frame(&mut self) -> bool {
        self.pending.flush(&mut self.document.scene) > 0
    }

    /// Whether staged updates are waiting for a frame.
    pub fn needs_frame(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn commit_pending(&mut self) {
        self.pending.flush(&mut self.document.scene);
    }

    /// Everything the renderer draws over the scene, in world space.
    pub fn overlay(&self) -> Overlay {
        let scene = &self.document.scene;
        let handles = match self.selection.as_slice() {
            [only] => scene.world_bounds(*only),
            _ => None,
        };
        Overlay {
            marquee: self.gesture.marquee_rect(),
            selection: self
                .selection
                .iter()
                .filter_map(|&id| scene.world_aabb(id))
                .collect(),
            handles,
            guides: self.guides.clone(),
            measurements: self.measurements.clone(),
        }
    }

    /// World bounds enclosing every selected element.
    pub fn selection_bounds(&self) -> Option<Bounds> {
        let scene = &self.document.scene;
        Bounds::union_all(self.selection.iter().filter_map(|&id| scene.world_aabb(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::model::{Element, ElementKind};
    use pretty_assertions::assert_eq;

    fn rect(id: &str, x: f32, y: f32) -> ElementNode {
        ElementNode::leaf(Element::new(NodeId::intern(id), ElementKind::Rect, x, y, 50.0, 50.0))
    }

    fn session(nodes: Vec<ElementNode>) -> EditorSession {
        let doc = Document::from_parts(nodes, Default::default()).unwrap();
        EditorSession::with_document(doc, EditorConfig::default())
    }

    #[test]
    fn failed_group_queues_a_notice_and_keeps_history_clean() {
        let mut s = session(vec![rect("es_only", 0.0, 0.0)]);
        s.set_selection(&[NodeId::intern("es_only")]);
        assert_eq!(s.group_selection(), None);
        assert!(!s.can_undo());
        let notices = s.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].key, "notice.group.tooFew");
        assert!(s.take_notices().is_empty());
    }

    #[test]
    fn group_then_undo_restores_selection() {
        let (a, b) = (NodeId::intern("es_ga"), NodeId::intern("es_gb"));
        let mut s = session(vec![rect("es_ga", 0.0, 0.0), rect("es_gb", 100.0, 0.0)]);
        s.set_selection(&[a, b]);
        let g = s.group_selection().unwrap();
        assert_eq!(s.selection(), &[g]);
        assert!(s.undo());
        assert_eq!(s.selection(), &[a, b]);
        assert_eq!(s.document().scene.root_ids(), vec![a, b]);
    }

    #[test]
    fn no_op_edits_do_not_push() {
        let mut s = session(vec![rect("es_n1", 0.0, 0.0)]);
        assert!(!s.delete_selection());
        assert!(!s.reorder_selection(ZDirection::Forward));
        assert!(s.duplicate_selection().is_empty());
        assert!(!s.can_undo());
    }

    #[test]
    fn unchanged_patch_is_not_an_undo_step() {
        let id = NodeId::intern("es_same");
        let mut s = session(vec![rect("es_same", 10.0, 20.0)]);
        assert!(!s.update_element(id, &ElementPatch::position(10.0, 20.0)));
        s.set_selection(&[id]);
        assert!(!s.update_selection(&ElementPatch::default()));
        assert!(!s.nudge(0.0, 0.0));
        assert!(!s.can_undo());

        assert!(s.update_element(id, &ElementPatch::position(11.0, 20.0)));
        assert_eq!(s.history().undo_depth(), 1);
    }

    #[test]
    fn effects_patch_is_undoable() {
        let id = NodeId::intern("es_fx");
        let mut s = session(vec![rect("es_fx", 0.0, 0.0)]);
        s.set_selection(&[id]);
        let patch: ElementPatch = serde_json::from_str(
            r##"{ "effects": [ { "id": "blur", "type": "layerBlur", "radius": 4 } ] }"##,
        )
        .unwrap();
        assert!(s.update_selection(&patch));
        assert_eq!(s.document().scene.get(id).unwrap().effects.len(), 1);
        assert!(s.undo());
        assert!(s.document().scene.get(id).unwrap().effects.is_empty());
    }

    #[test]
    fn paste_offsets_each_time() {
        let mut s = session(vec![rect("es_p", 10.0, 10.0)]);
        s.set_selection(&[NodeId::intern("es_p")]);
        assert_eq!(s.copy_selection(), 1);
        let first = s.paste();
        let second = s.paste();
        let pos = |id: NodeId| {
            let el = s.document().scene.get(id).unwrap();
            (el.x, el.y)
        };
        assert_eq!(pos(first[0]), (30.0, 30.0));
        assert_eq!(pos(second[0]), (50.0, 50.0));
        assert_ne!(first[0], second[0]);
        assert_eq!(s.document().scene.len(), 3);
    }

    #[test]
    fn nudge_moves_by_large_step_with_shift() {
        let id = NodeId::intern("es_nudge");
        let mut s = session(vec![rect("es_nudge", 0.0, 0.0)]);
        s.set_selection(&[id]);
        assert!(s.key_down("ArrowRight", Modifiers::SHIFT));
        assert!(s.key_down("ArrowUp", Modifiers::NONE));
        let el = s.document().scene.get(id).unwrap();
        assert_eq!((el.x, el.y), (10.0, -1.0));
        assert_eq!(s.history().undo_depth(), 2);
    }

    #[test]
    fn wheel_zoom_direction_and_clamp() {
        let mut s = EditorSession::default();
        s.wheel(-1.0, 400.0, 300.0, false);
        assert!((s.viewport().zoom - 1.1).abs() < 1e-5);
        s.wheel(1.0, 400.0, 300.0, true);
        assert!((s.viewport().zoom - 1.1 / 1.01).abs() < 1e-5);
        for _ in 0..200 {
            s.wheel(1.0, 0.0, 0.0, false);
        }
        assert_eq!(s.viewport().zoom, 0.1);
    }

    #[test]
    fn svg_export_without_frame_notifies() {
        let mut s = session(vec![rect("es_svg", 0.0, 0.0)]);
        assert!(s.export_svg().is_none());
        assert_eq!(s.take_notices()[0].key, "notice.export.noFrame");
    }
}
