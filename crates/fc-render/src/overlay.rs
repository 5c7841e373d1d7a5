//! Editor chrome drawn on top of the scene: marquee, selection boxes,
//! resize handles, size label, smart guides, and gap measurements.
//!
//! Everything is positioned in world space and mapped through the
//! viewport, but stroke widths and handle sizes stay constant on screen.
//! The overlay is never clipped by frames.

use crate::paint;
use fc_core::geometry::Bounds;
use fc_core::guides::{Axis, GuideLine, Measurement};
use fc_core::viewport::Viewport;
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// The eight resize hotspots of a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    /// Where the handle sits on `b`.
    pub fn anchor(self, b: &Bounds) -> (f32, f32) {
        let (cx, cy) = b.center();
        match self {
            ResizeHandle::N => (cx, b.top()),
            ResizeHandle::S => (cx, b.bottom()),
            ResizeHandle::E => (b.right(), cy),
            ResizeHandle::W => (b.left(), cy),
            ResizeHandle::NE => (b.right(), b.top()),
            ResizeHandle::NW => (b.left(), b.top()),
            ResizeHandle::SE => (b.right(), b.bottom()),
            ResizeHandle::SW => (b.left(), b.bottom()),
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    pub fn is_corner(self) -> bool {
        (self.moves_left() || self.moves_right()) && (self.moves_top() || self.moves_bottom())
    }
}

/// Transient editor state to draw over the scene, in world coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub marquee: Option<Bounds>,
    /// Bounding box of each selected element.
    pub selection: Vec<Bounds>,
    /// Set for a single selection: draws handles and the size label.
    pub handles: Option<Bounds>,
    pub guides: Vec<GuideLine>,
    pub measurements: Vec<Measurement>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.marquee.is_none()
            && self.selection.is_empty()
            && self.handles.is_none()
            && self.guides.is_empty()
            && self.measurements.is_empty()
    }
}

/// Pre-parsed overlay colors.
pub(crate) struct OverlayStyle {
    pub selection: tiny_skia::Color,
    pub guide: tiny_skia::Color,
    pub measure: tiny_skia::Color,
    pub handle_size: f32,
}

pub(crate) fn draw_overlay(target: &mut Pixmap, overlay: &Overlay, vp: &Viewport, style: &OverlayStyle) {
    let to_screen = |b: &Bounds| {
        let (x, y) = vp.world_to_screen(b.x, b.y);
        Bounds::new(x, y, b.width * vp.zoom, b.height * vp.zoom)
    };

    if let Some(m) = &overlay.marquee {
        let r = to_screen(m);
        fill_rect(target, &r, style.selection, 0.08);
        stroke_rect(target, &r, style.selection, 1.0);
    }

    for b in &overlay.selection {
        stroke_rect(target, &to_screen(b), style.selection, 1.0);
    }

    if let Some(b) = &overlay.handles {
        let r = to_screen(b);
        let size = style.handle_size;
        for handle in ResizeHandle::ALL {
            let (x, y) = handle.anchor(&r);
            let square = Bounds::new(x - size / 2.0, y - size / 2.0, size, size);
            fill_rect(target, &square, tiny_skia::Color::WHITE, 1.0);
            stroke_rect(target, &square, style.selection, 1.0);
        }
        let label = size_label(b);
        let (cx, _) = r.center();
        label_pill(target, cx, r.bottom() + size, label.chars().count(), style.selection);
    }

    for g in &overlay.guides {
        let (a, b) = match g.axis {
            Axis::X => (
                vp.world_to_screen(g.position, g.start),
                vp.world_to_screen(g.position, g.end),
            ),
            Axis::Y => (
                vp.world_to_screen(g.start, g.position),
                vp.world_to_screen(g.end, g.position),
            ),
        };
        line(target, a, b, style.guide);
    }

    for m in &overlay.measurements {
        let a = vp.world_to_screen(m.from.0, m.from.1);
        let b = vp.world_to_screen(m.to.0, m.to.1);
        line(target, a, b, style.measure);
        let label = format!("{}", m.distance.round());
        label_pill(
            target,
            (a.0 + b.0) / 2.0,
            (a.1 + b.1) / 2.0 + 4.0,
            label.chars().count(),
            style.measure,
        );
    }
}

/// Text shown under a single selection, e.g. `260 × 40`.
pub fn size_label(b: &Bounds) -> String {
    format!("{} × {}", b.width.round(), b.height.round())
}

fn fill_rect(target: &mut Pixmap, b: &Bounds, color: tiny_skia::Color, alpha: f32) {
    let Some(rect) = Rect::from_xywh(b.x, b.y, b.width, b.height) else {
        return;
    };
    let mut c = color;
    c.apply_opacity(alpha);
    let mut p = Paint::default();
    p.set_color(c);
    target.fill_rect(rect, &p, Transform::identity(), None);
}

fn stroke_rect(target: &mut Pixmap, b: &Bounds, color: tiny_skia::Color, width: f32) {
    let Some(rect) = Rect::from_xywh(b.x, b.y, b.width, b.height) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut p = Paint::default();
    p.set_color(color);
    p.anti_alias = true;
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    target.stroke_path(&path, &p, &stroke, Transform::identity(), None);
}

fn line(target: &mut Pixmap, a: (f32, f32), b: (f32, f32), color: tiny_skia::Color) {
    let mut pb = PathBuilder::new();
    pb.move_to(a.0, a.1);
    pb.line_to(b.0, b.1);
    let Some(path) = pb.finish() else {
        return;
    };
    let mut p = Paint::default();
    p.set_color(color);
    p.anti_alias = true;
    target.stroke_path(&path, &p, &Stroke::default(), Transform::identity(), None);
}

/// A filled pill centered at `cx` with its top at `top`, carrying a
/// greeked bar the width of `chars` glyphs.
fn label_pill(target: &mut Pixmap, cx: f32, top: f32, chars: usize, color: tiny_skia::Color) {
    let text_w = chars as f32 * 6.0;
    let pill = Bounds::new(cx - text_w / 2.0 - 6.0, top, text_w + 12.0, 18.0);
    fill_rect(target, &pill, color, 1.0);
    let bar = Bounds::new(cx - text_w / 2.0, top + 7.0, text_w, 4.0);
    fill_rect(target, &bar, tiny_skia::Color::WHITE, 0.9);
}

pub(crate) fn style_from(config: &crate::config::RenderConfig) -> OverlayStyle {
    let fallback = tiny_skia::Color::from_rgba8(13, 153, 255, 255);
    OverlayStyle {
        selection: paint::color(&config.selection_color, 1.0).unwrap_or(fallback),
        guide: paint::color(&config.guide_color, 1.0).unwrap_or(fallback),
        measure: paint::color(&config.measure_color, 1.0).unwrap_or(fallback),
        handle_size: config.handle_size,
    }
}
