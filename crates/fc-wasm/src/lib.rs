//! WASM bridge for FC: exposes the editor session and CPU renderer to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the
//! `<canvas>`, forwards pointer/keyboard/wheel events, and drives one
//! `on_animation_frame` + `render` per `requestAnimationFrame` while
//! `needs_frame` (or any event handler) says something changed.

use fc_core::id::NodeId;
use fc_core::model::ElementNode;
use fc_core::scene::{ElementPatch, ZDirection};
use fc_editor::{EditorConfig, EditorSession, Modifiers, PointerButton};
use fc_render::{RenderConfig, Renderer, to_straight_rgba};
use tiny_skia::Pixmap;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct FcCanvas {
    session: EditorSession,
    renderer: Renderer,
    /// Reused between frames; reallocated when the canvas is resized.
    pixmap: Option<Pixmap>,
}

#[wasm_bindgen]
impl FcCanvas {
    /// Create a canvas controller with default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();
        Self::build(EditorConfig::default(), RenderConfig::default(), width, height)
    }

    /// Create a controller from JSON configs. Either may be `"{}"`;
    /// unreadable JSON falls back to defaults.
    pub fn with_config(editor_json: &str, render_json: &str, width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();
        let editor = serde_json::from_str(editor_json).unwrap_or_else(|e| {
            log::warn!("editor config ignored: {e}");
            EditorConfig::default()
        });
        let render = serde_json::from_str(render_json).unwrap_or_else(|e| {
            log::warn!("render config ignored: {e}");
            RenderConfig::default()
        });
        Self::build(editor, render, width, height)
    }

    // ─── Document I/O ────────────────────────────────────────────────────

    /// Replace the document from JSON. Returns `false` (and queues a
    /// notice) when the JSON is rejected.
    pub fn load_json(&mut self, json: &str) -> bool {
        self.renderer.effect_cache().clear();
        self.session.load_json(json).is_ok()
    }

    pub fn export_json(&self) -> String {
        self.session.export_json().unwrap_or_default()
    }

    /// SVG of the first frame, or `undefined` with a queued notice.
    pub fn export_svg(&mut self) -> Option<String> {
        self.session.export_svg()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize_viewport(width, height);
        self.pixmap = None;
    }

    /// Render a frame and return straight-alpha RGBA bytes, row-major.
    pub fn render_rgba(&mut self) -> Vec<u8> {
        match self.frame() {
            Some(pixmap) => to_straight_rgba(pixmap),
            None => Vec::new(),
        }
    }

    /// Render a frame straight into a 2D context.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let Some(pixmap) = self.frame() else {
            return Ok(());
        };
        let (w, h) = (pixmap.width(), pixmap.height());
        let data = to_straight_rgba(pixmap);
        let image = web_sys::ImageData::new_with_u8_clamped_array_and_sh(wasm_bindgen::Clamped(&data[..]), w, h)?;
        ctx.put_image_data(&image, 0.0, 0.0)
    }

    /// Flush staged gesture updates. Returns `true` if a redraw is needed.
    pub fn on_animation_frame(&mut self) -> bool {
        self.session.on_animation_frame()
    }

    pub fn needs_frame(&self) -> bool {
        self.session.needs_frame()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Pointer down at canvas-relative pixels. `button` is the DOM
    /// `MouseEvent.button` value.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.session
            .pointer_down(x, y, PointerButton::from_dom(button), mods);
        true
    }

    /// Returns `true` while a gesture is active (a redraw is needed).
    pub fn handle_pointer_move(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.session
            .pointer_move(x, y, modifiers(shift, ctrl, alt, meta));
        !self.session.gesture().is_idle()
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.session
            .pointer_up(x, y, modifiers(shift, ctrl, alt, meta));
        true
    }

    pub fn handle_pointer_cancel(&mut self) {
        self.session.pointer_cancel();
    }

    /// Wheel zoom. ctrl/meta zooms in finer steps.
    pub fn handle_wheel(&mut self, delta_y: f32, x: f32, y: f32, ctrl: bool, meta: bool) {
        self.session.wheel(delta_y, x, y, ctrl || meta);
    }

    /// Returns `true` if the key was consumed (the page should
    /// `preventDefault`).
    pub fn handle_key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.session
            .key_down(key, modifiers(shift, ctrl, alt, meta))
    }

    pub fn handle_key_up(&mut self, key: &str) {
        self.session.key_up(key);
    }

    /// Name of the active gesture (`idle`, `marquee`, `move`, `pan`, `resize`).
    pub fn gesture(&self) -> String {
        self.session.gesture().name().to_string()
    }

    pub fn zoom(&self) -> f32 {
        self.session.viewport().zoom
    }

    // ─── Selection & edits ───────────────────────────────────────────────

    /// Selected ids as a JSON array; the last one is primary.
    pub fn selected_ids(&self) -> String {
        let ids: Vec<&str> = self.session.selection().iter().map(NodeId::as_str).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace the selection from a JSON array of ids.
    pub fn select(&mut self, ids_json: &str) -> bool {
        let Ok(ids) = serde_json::from_str::<Vec<String>>(ids_json) else {
            return false;
        };
        let ids: Vec<NodeId> = ids.iter().map(|s| NodeId::intern(s)).collect();
        self.session.set_selection(&ids);
        true
    }

    /// Apply a JSON property patch (camelCase keys) to the selection.
    pub fn update_selection(&mut self, patch_json: &str) -> bool {
        match serde_json::from_str::<ElementPatch>(patch_json) {
            Ok(patch) => self.session.update_selection(&patch),
            Err(e) => {
                log::warn!("patch ignored: {e}");
                false
            }
        }
    }

    /// Insert an element subtree from JSON (same shape as a document
    /// element; ids are replaced). Returns the new root id.
    pub fn add_element(&mut self, element_json: &str, parent: Option<String>) -> Option<String> {
        let node = match serde_json::from_str::<ElementNode>(element_json) {
            Ok(node) => node,
            Err(e) => {
                log::warn!("element ignored: {e}");
                return None;
            }
        };
        let parent = parent.as_deref().map(NodeId::intern);
        self.session.add(parent, node).map(|id| id.as_str().to_string())
    }

    /// World bounds of the selection as `{"x","y","width","height"}`, or
    /// `null` when nothing is selected.
    pub fn selection_bounds(&self) -> String {
        serde_json::to_string(&self.session.selection_bounds()).unwrap_or_else(|_| "null".to_string())
    }

    pub fn reorder_selection(&mut self, forward: bool) -> bool {
        self.session.reorder_selection(z_direction(forward))
    }

    /// Bring to front (`true`) or send to back (`false`).
    pub fn reorder_selection_to_edge(&mut self, front: bool) -> bool {
        self.session.reorder_selection_to_edge(z_direction(front))
    }

    /// Turn the single selected element into a master. Returns its id.
    pub fn promote_selection_to_master(&mut self) -> Option<String> {
        self.session
            .promote_selection_to_master()
            .map(|id| id.as_str().to_string())
    }

    /// Place an instance of `master_id` at world `x`, `y`.
    pub fn instantiate(&mut self, master_id: &str, x: f32, y: f32) -> Option<String> {
        self.session
            .instantiate(NodeId::intern(master_id), None, x, y)
            .map(|id| id.as_str().to_string())
    }

    pub fn duplicate_selection(&mut self) -> bool {
        !self.session.duplicate_selection().is_empty()
    }

    pub fn delete_selection(&mut self) -> bool {
        self.session.delete_selection()
    }

    pub fn group_selection(&mut self) -> bool {
        self.session.group_selection().is_some()
    }

    pub fn ungroup_selection(&mut self) -> bool {
        !self.session.ungroup_selection().is_empty()
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    // ─── Images & notices ────────────────────────────────────────────────

    /// Queue a dropped file; `x`, `y` are canvas pixels.
    pub fn drop_image(&mut self, bytes: Vec<u8>, name: &str, x: f32, y: f32) {
        let at = self.session.viewport().screen_to_world(x, y);
        self.session.drop_image(bytes, name, at);
    }

    /// Insert queued images. Returns how many were inserted.
    pub fn process_images(&mut self) -> usize {
        self.session.process_images().len()
    }

    /// Drain queued notices as JSON: `[{"kind","key","message"}]`.
    pub fn take_notices(&mut self) -> String {
        serde_json::to_string(&self.session.take_notices()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl FcCanvas {
    fn build(editor: EditorConfig, render: RenderConfig, width: f32, height: f32) -> Self {
        let mut session = EditorSession::new(editor);
        session.resize_viewport(width, height);
        Self {
            session,
            renderer: Renderer::new(render),
            pixmap: None,
        }
    }

    fn frame(&mut self) -> Option<&Pixmap> {
        let vp = *self.session.viewport();
        let (w, h) = (vp.width.ceil().max(1.0) as u32, vp.height.ceil().max(1.0) as u32);
        if self
            .pixmap
            .as_ref()
            .is_none_or(|p| p.width() != w || p.height() != h)
        {
            self.pixmap = Pixmap::new(w, h);
        }
        let pixmap = self.pixmap.as_mut()?;
        let overlay = self.session.overlay();
        self.renderer
            .render(pixmap, self.session.document(), &vp, &overlay, self.session.assets());
        self.pixmap.as_ref()
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        alt,
        ctrl,
        meta,
    }
}

fn z_direction(forward: bool) -> ZDirection {
    if forward { ZDirection::Forward } else { ZDirection::Backward }
}

/// Route panics to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FC WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
