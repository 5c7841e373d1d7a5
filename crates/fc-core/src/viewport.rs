//! The view transform between world space and screen pixels.
//!
//! `screen = world * zoom + offset`.

use crate::geometry::Bounds;
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Canvas size in screen pixels.
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.offset_x) / self.zoom, (sy - self.offset_y) / self.zoom)
    }

    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (wx * self.zoom + self.offset_x, wy * self.zoom + self.offset_y)
    }

    /// The world-space rectangle currently visible.
    pub fn visible_world(&self) -> Bounds {
        let (x, y) = self.screen_to_world(0.0, 0.0);
        Bounds::new(x, y, self.width / self.zoom, self.height / self.zoom)
    }

    /// Translate the view by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiply the zoom by `factor`, clamped to `[min, max]`, keeping the
    /// world point under screen position `(sx, sy)` fixed.
    pub fn zoom_at(&mut self, factor: f32, sx: f32, sy: f32, min: f32, max: f32) {
        let (wx, wy) = self.screen_to_world(sx, sy);
        self.zoom = (self.zoom * factor).clamp(min, max);
        self.offset_x = sx - wx * self.zoom;
        self.offset_y = sy - wy * self.zoom;
    }

    /// Set an absolute zoom about the canvas center.
    pub fn set_zoom(&mut self, zoom: f32, min: f32, max: f32) {
        let factor = zoom / self.zoom;
        self.zoom_at(factor, self.width / 2.0, self.height / 2.0, min, max);
    }
}
