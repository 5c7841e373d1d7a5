//! Document → pixels.
//!
//! Clears to the background, draws the dot grid, walks every root element
//! depth-first (frames clip their children), routes elements with enabled
//! effects through the offscreen pipeline, and finishes with the overlay.

use crate::cache::{CachedLayer, EffectCache, EffectKey};
use crate::config::RenderConfig;
use crate::effects::{Backdrop, max_extent, run_pipeline};
use crate::error::{RenderError, RenderResult};
use crate::images::{ImageAssets, ImageCache};
use crate::overlay::{Overlay, OverlayStyle, draw_overlay, style_from};
use crate::paint::{self, element_transform, fill_paint, shape_path};
use fc_core::NodeIndex;
use fc_core::document::Document;
use fc_core::geometry::{Bounds, rotated_aabb};
use fc_core::model::{EffectKind, Element, ElementKind, ImageFit, TextAlign};
use fc_core::scene::SceneGraph;
use fc_core::viewport::Viewport;
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint, Point, Rect,
    SpreadMode, Stroke, Transform,
};

/// Offscreen layers larger than this many pixels are drawn without effects.
const MAX_LAYER_PIXELS: f64 = 4096.0 * 4096.0;

struct Palette {
    background: tiny_skia::Color,
    grid: tiny_skia::Color,
    placeholder: tiny_skia::Color,
    overlay: OverlayStyle,
}

pub struct Renderer {
    config: RenderConfig,
    palette: Palette,
    cache: EffectCache,
    images: ImageCache,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Per-frame values threaded through the walk.
struct Frame<'a> {
    scene: &'a SceneGraph,
    assets: &'a ImageAssets,
    zoom: f32,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        let palette = Palette {
            background: paint::color(&config.background, 1.0).unwrap_or(tiny_skia::Color::WHITE),
            grid: paint::color(&config.grid_color, 1.0).unwrap_or(tiny_skia::Color::BLACK),
            placeholder: paint::color(&config.placeholder_color, 1.0)
                .unwrap_or(tiny_skia::Color::from_rgba8(226, 226, 232, 255)),
            overlay: style_from(&config),
        };
        Self {
            cache: EffectCache::new(config.cache_capacity),
            images: ImageCache::new(),
            palette,
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn effect_cache(&mut self) -> &mut EffectCache {
        &mut self.cache
    }

    pub fn images(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    /// Allocate a pixmap the size of the viewport and render into it.
    pub fn render_to_pixmap(
        &mut self,
        doc: &Document,
        viewport: &Viewport,
        overlay: &Overlay,
        assets: &ImageAssets,
    ) -> RenderResult<Pixmap> {
        let (w, h) = (viewport.width.ceil() as u32, viewport.height.ceil() as u32);
        let mut pixmap = Pixmap::new(w, h).ok_or(RenderError::PixmapCreation(w, h))?;
        self.render(&mut pixmap, doc, viewport, overlay, assets);
        Ok(pixmap)
    }

    /// Draw one full frame into `target`.
    pub fn render(
        &mut self,
        target: &mut Pixmap,
        doc: &Document,
        viewport: &Viewport,
        overlay: &Overlay,
        assets: &ImageAssets,
    ) {
        target.fill(self.palette.background);
        self.draw_grid(target, viewport);

        let frame = Frame {
            scene: &doc.scene,
            assets,
            zoom: viewport.zoom,
        };
        let base = Transform::from_scale(viewport.zoom, viewport.zoom)
            .post_translate(viewport.offset_x, viewport.offset_y);
        let visible = viewport.visible_world();
        for &root in doc.scene.roots() {
            if offscreen_frame(doc.scene.element(root), &visible) {
                continue;
            }
            self.render_node(target, &frame, root, base, None, 1.0);
        }

        draw_overlay(target, overlay, viewport, &self.palette.overlay);
    }

    fn draw_grid(&self, target: &mut Pixmap, vp: &Viewport) {
        let spacing = self.config.grid_spacing * vp.zoom;
        if spacing < self.config.grid_min_screen_spacing {
            return;
        }
        let dot = (1.5 * vp.zoom.sqrt()).clamp(1.0, 2.0);
        let (w, h) = (target.width() as f32, target.height() as f32);
        let mut pb = PathBuilder::new();
        let mut x = vp.offset_x.rem_euclid(spacing);
        while x < w {
            let mut y = vp.offset_y.rem_euclid(spacing);
            while y < h {
                if let Some(r) = Rect::from_xywh(x - dot / 2.0, y - dot / 2.0, dot, dot) {
                    pb.push_rect(r);
                }
                y += spacing;
            }
            x += spacing;
        }
        if let Some(path) = pb.finish() {
            let mut p = Paint::default();
            p.set_color(self.palette.grid);
            target.fill_path(&path, &p, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn render_node(
        &mut self,
        target: &mut Pixmap,
        frame: &Frame<'_>,
        idx: NodeIndex,
        parent: Transform,
        clip: Option<&Mask>,
        opacity: f32,
    ) {
        let el = frame.scene.element(idx);
        let transform = element_transform(parent, el);
        if el.enabled_effects().next().is_some() {
            self.render_with_effects(target, frame, idx, transform, clip, opacity * el.opacity);
        } else {
            self.draw_subtree(target, frame, idx, transform, clip, opacity * el.opacity);
        }
    }

    fn draw_subtree(
        &mut self,
        target: &mut Pixmap,
        frame: &Frame<'_>,
        idx: NodeIndex,
        transform: Transform,
        clip: Option<&Mask>,
        opacity: f32,
    ) {
        let el = frame.scene.element(idx);
        draw_shape(
            target,
            el,
            transform,
            clip,
            opacity,
            &mut self.images,
            frame.assets,
            self.palette.placeholder,
        );

        let children = frame.scene.children(idx);
        if children.is_empty() {
            return;
        }

        let own_clip = match el.kind {
            ElementKind::Frame => {
                let Some(mask) = frame_mask(target, el, transform, clip) else {
                    // Zero-sized frame: nothing inside is visible.
                    return;
                };
                Some(mask)
            }
            _ => None,
        };
        let child_clip = own_clip.as_ref().or(clip);
        for &child in children {
            self.render_node(target, frame, child, transform, child_clip, opacity);
        }
    }

    fn render_with_effects(
        &mut self,
        target: &mut Pixmap,
        frame: &Frame<'_>,
        idx: NodeIndex,
        transform: Transform,
        clip: Option<&Mask>,
        opacity: f32,
    ) {
        let el = frame.scene.element(idx);
        let stages: Vec<&EffectKind> = el.enabled_effects().map(|e| &e.kind).collect();

        let Some(bbox) = screen_bbox(transform, el.width, el.height) else {
            return;
        };
        let Some(LayerRect {
            left,
            top,
            width: w,
            height: h,
            pad,
        }) = layer_rect(bbox, max_extent(stages.iter().copied()), frame.zoom)
        else {
            log::debug!("{}: effect layer out of range, drawing plain", el.id);
            self.draw_subtree(target, frame, idx, transform, clip, opacity);
            return;
        };
        let on_target = Bounds::new(0.0, 0.0, target.width() as f32, target.height() as f32);
        if !Bounds::new(left as f32, top as f32, w as f32, h as f32).intersects(&on_target) {
            return;
        }

        let live_backdrop = stages
            .iter()
            .any(|k| matches!(k, EffectKind::BackgroundBlur { .. }));
        let key = frame
            .scene
            .extract(el.id)
            .map(|node| EffectKey::new(&node, frame.zoom).at_phase(bbox.left(), bbox.top()));

        let composite = PixmapPaint {
            opacity,
            ..PixmapPaint::default()
        };
        if !live_backdrop
            && let Some(key) = &key
            && let Some(hit) = self.cache.get(key)
        {
            let dx = pad - hit.pad;
            target.draw_pixmap(left + dx, top + dx, hit.pixmap.as_ref(), &composite, Transform::identity(), clip);
            return;
        }

        let Some(mut layer) = Pixmap::new(w, h) else {
            return;
        };
        let local = transform.post_translate(-left as f32, -top as f32);
        self.draw_subtree(&mut layer, frame, idx, local, None, 1.0);

        let coverage = if live_backdrop {
            coverage_layer(el, local, w, h)
        } else {
            None
        };
        let result = {
            let backdrop = Backdrop {
                pixels: target,
                x: left,
                y: top,
            };
            run_pipeline(layer, coverage.as_ref(), &stages, frame.zoom, Some(&backdrop))
        };
        target.draw_pixmap(left, top, result.as_ref(), &composite, Transform::identity(), clip);

        if !live_backdrop && let Some(key) = key {
            self.cache.insert(key, CachedLayer { pixmap: result, pad });
        }
    }
}

// ─── Shape painters ──────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn draw_shape(
    target: &mut Pixmap,
    el: &Element,
    transform: Transform,
    clip: Option<&Mask>,
    opacity: f32,
    images: &mut ImageCache,
    assets: &ImageAssets,
    placeholder: tiny_skia::Color,
) {
    match &el.kind {
        ElementKind::Frame | ElementKind::Rect | ElementKind::Circle | ElementKind::Instance { .. } => {
            let Some(path) = shape_path(el) else {
                return;
            };
            if let Some(p) = fill_paint(el, opacity) {
                target.fill_path(&path, &p, FillRule::Winding, transform, clip);
            }
            stroke(target, el, &path, transform, clip, opacity);
        }
        ElementKind::Group => {}
        ElementKind::Image {
            image_src,
            image_fit,
        } => match images.resolve(image_src, assets) {
            Some(img) => draw_image(target, el, img, *image_fit, transform, clip, opacity),
            None => draw_placeholder(target, el, transform, clip, opacity, placeholder),
        },
        ElementKind::Text {
            text,
            font_size,
            text_align,
            line_height,
            ..
        } => {
            let Some(p) = paint::solid(el.fill.as_deref().unwrap_or("#000000"), opacity * 0.6) else {
                return;
            };
            let lh = font_size * line_height;
            let bar_h = font_size * 0.55;
            for (i, line) in text.split('\n').enumerate() {
                let chars = line.chars().count();
                if chars == 0 {
                    continue;
                }
                let bar_w = (chars as f32 * font_size * 0.5).min(el.width);
                let x = match text_align {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => (el.width - bar_w) / 2.0,
                    TextAlign::Right => el.width - bar_w,
                };
                let y = i as f32 * lh + (lh - bar_h) / 2.0;
                if let Some(r) = Rect::from_xywh(x, y, bar_w, bar_h) {
                    target.fill_rect(r, &p, transform, clip);
                }
            }
        }
    }
}

fn stroke(
    target: &mut Pixmap,
    el: &Element,
    path: &tiny_skia::Path,
    transform: Transform,
    clip: Option<&Mask>,
    opacity: f32,
) {
    if el.stroke_width <= 0.0 {
        return;
    }
    let Some(p) = el.stroke.as_deref().and_then(|s| paint::solid(s, opacity)) else {
        return;
    };
    let stroke = Stroke {
        width: el.stroke_width,
        ..Stroke::default()
    };
    target.stroke_path(path, &p, &stroke, transform, clip);
}

fn draw_image(
    target: &mut Pixmap,
    el: &Element,
    img: &Pixmap,
    fit: ImageFit,
    transform: Transform,
    clip: Option<&Mask>,
    opacity: f32,
) {
    let (iw, ih) = (img.width() as f32, img.height() as f32);
    let (w, h) = (el.width, el.height);
    let (sx, sy) = match fit {
        ImageFit::Fill => (w / iw, h / ih),
        ImageFit::Cover => {
            let s = (w / iw).max(h / ih);
            (s, s)
        }
        ImageFit::Contain => {
            let s = (w / iw).min(h / ih);
            (s, s)
        }
    };
    let (dw, dh) = (iw * sx, ih * sy);
    let (dx, dy) = ((w - dw) / 2.0, (h - dh) / 2.0);
    let area = match fit {
        ImageFit::Contain => Rect::from_xywh(dx, dy, dw, dh),
        ImageFit::Cover | ImageFit::Fill => Rect::from_xywh(0.0, 0.0, w, h),
    };
    let Some(area) = area else {
        return;
    };
    let pattern = Pattern::new(
        img.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Bilinear,
        opacity,
        Transform::from_row(sx, 0.0, 0.0, sy, dx, dy),
    );
    let mut p = Paint::default();
    p.shader = pattern;
    p.anti_alias = true;
    target.fill_rect(area, &p, transform, clip);
}

/// Flat box with a diagonal cross, shown until (or instead of) pixels.
fn draw_placeholder(
    target: &mut Pixmap,
    el: &Element,
    transform: Transform,
    clip: Option<&Mask>,
    opacity: f32,
    color: tiny_skia::Color,
) {
    let Some(rect) = Rect::from_xywh(0.0, 0.0, el.width, el.height) else {
        return;
    };
    let mut c = color;
    c.apply_opacity(opacity);
    let mut p = Paint::default();
    p.set_color(c);
    target.fill_rect(rect, &p, transform, clip);

    let mut pb = PathBuilder::new();
    pb.move_to(0.0, 0.0);
    pb.line_to(el.width, el.height);
    pb.move_to(el.width, 0.0);
    pb.line_to(0.0, el.height);
    if let Some(cross) = pb.finish() {
        let mut line = tiny_skia::Color::from_rgba8(0, 0, 0, 40);
        line.apply_opacity(opacity);
        p.set_color(line);
        p.anti_alias = true;
        let hairline = Stroke {
            width: 0.0,
            ..Stroke::default()
        };
        target.stroke_path(&cross, &p, &hairline, transform, clip);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Clip mask for a frame's children, intersected with the inherited clip.
fn frame_mask(target: &Pixmap, el: &Element, transform: Transform, inherited: Option<&Mask>) -> Option<Mask> {
    let rect = Rect::from_xywh(0.0, 0.0, el.width, el.height)?;
    let path = PathBuilder::from_rect(rect);
    match inherited {
        Some(parent) => {
            let mut mask = parent.clone();
            mask.intersect_path(&path, FillRule::Winding, true, transform);
            Some(mask)
        }
        None => {
            let mut mask = Mask::new(target.width(), target.height())?;
            mask.fill_path(&path, FillRule::Winding, true, transform);
            Some(mask)
        }
    }
}

/// Opaque silhouette of an element, used to clip a blurred backdrop.
fn coverage_layer(el: &Element, transform: Transform, w: u32, h: u32) -> Option<Pixmap> {
    let path = shape_path(el)
        .or_else(|| Rect::from_xywh(0.0, 0.0, el.width, el.height).map(PathBuilder::from_rect))?;
    let mut pixmap = Pixmap::new(w, h)?;
    let mut p = Paint::default();
    p.set_color(tiny_skia::Color::BLACK);
    p.anti_alias = true;
    pixmap.fill_path(&path, &p, FillRule::Winding, transform, None);
    Some(pixmap)
}

/// Screen-space axis-aligned box of a `w × h` local rectangle.
/// A root frame without effects clips everything it holds, so it can be
/// skipped whole when its box misses the visible world.
fn offscreen_frame(el: &Element, visible: &Bounds) -> bool {
    matches!(el.kind, ElementKind::Frame)
        && el.enabled_effects().next().is_none()
        && !rotated_aabb(el.local_bounds(), el.rotation)
            .inflate(el.stroke_width.max(0.0))
            .intersects(visible)
}

/// Placement of an offscreen effect layer, in whole target pixels.
#[derive(Debug, PartialEq)]
struct LayerRect {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    pad: i32,
}

/// Grow `bbox` by the effect extent and snap it to the pixel grid.
/// `None` when any coordinate is non-finite, leaves `i32`, or the layer
/// would exceed `MAX_LAYER_PIXELS`.
fn layer_rect(bbox: Rect, extent: f32, zoom: f32) -> Option<LayerRect> {
    let pad = (f64::from(extent) * f64::from(zoom)).ceil().max(0.0) + 2.0;
    let left = f64::from(bbox.left()).floor() - pad;
    let top = f64::from(bbox.top()).floor() - pad;
    let w = f64::from(bbox.width()).ceil() + 2.0 * pad + 1.0;
    let h = f64::from(bbox.height()).ceil() + 2.0 * pad + 1.0;

    let in_range = |v: f64| v.is_finite() && v.abs() <= f64::from(i32::MAX);
    if ![pad, left, top, w, h].into_iter().all(in_range) || w * h > MAX_LAYER_PIXELS {
        return None;
    }
    Some(LayerRect {
        left: left as i32,
        top: top as i32,
        width: w as u32,
        height: h as u32,
        pad: pad as i32,
    })
}

fn screen_bbox(transform: Transform, w: f32, h: f32) -> Option<Rect> {
    let mut pts = [
        Point::from_xy(0.0, 0.0),
        Point::from_xy(w, 0.0),
        Point::from_xy(w, h),
        Point::from_xy(0.0, h),
    ];
    transform.map_points(&mut pts);
    Rect::from_points(&pts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::document::Masters;
    use fc_core::id::NodeId;
    use fc_core::model::{Effect, ElementNode, Shadow};
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    fn doc(nodes: Vec<ElementNode>) -> Document {
        Document::from_parts(nodes, Masters::new()).unwrap()
    }

    fn rect(id: &str, x: f32, y: f32, w: f32, h: f32, fill: &str) -> Element {
        Element::new(NodeId::intern(id), ElementKind::Rect, x, y, w, h).with_fill(fill)
    }

    fn render(d: &Document, vp: &Viewport) -> (Renderer, Pixmap) {
        let mut r = Renderer::new(RenderConfig {
            background: "#FFFFFF".into(),
            grid_min_screen_spacing: 1000.0,
            ..RenderConfig::default()
        });
        let p = r
            .render_to_pixmap(d, vp, &Overlay::default(), &ImageAssets::new())
            .unwrap();
        (r, p)
    }

    fn rgb(p: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let px = p.pixel(x, y).unwrap();
        (px.red(), px.green(), px.blue())
    }

    #[test]
    fn frames_clip_children_but_groups_do_not() {
        let screen = Element::new(NodeId::intern("rn_frame"), ElementKind::Frame, 0.0, 0.0, 100.0, 100.0)
            .with_fill("#FFFFFF");
        let group = Element::new(NodeId::intern("rn_group"), ElementKind::Group, 0.0, 150.0, 10.0, 10.0);
        let d = doc(vec![
            ElementNode::with_children(
                screen,
                vec![ElementNode::leaf(rect("rn_spill", 50.0, 50.0, 100.0, 20.0, "#FF0000"))],
            ),
            ElementNode::with_children(
                group,
                vec![ElementNode::leaf(rect("rn_loose", 50.0, 0.0, 100.0, 20.0, "#0000FF"))],
            ),
        ]);
        let (_, p) = render(&d, &Viewport::new(200.0, 200.0));

        assert_eq!(rgb(&p, 75, 60), (255, 0, 0));
        assert_eq!(rgb(&p, 130, 60), (255, 255, 255));
        assert_eq!(rgb(&p, 130, 160), (0, 0, 255));
    }

    #[test]
    fn viewport_zoom_and_offset_apply() {
        let d = doc(vec![ElementNode::leaf(rect("rn_z", 10.0, 10.0, 10.0, 10.0, "#00FF00"))]);
        let vp = Viewport {
            zoom: 2.0,
            offset_x: 5.0,
            offset_y: 5.0,
            ..Viewport::new(100.0, 100.0)
        };
        let (_, p) = render(&d, &vp);
        // World (10..20) → screen (25..45)
        assert_eq!(rgb(&p, 30, 30), (0, 255, 0));
        assert_eq!(rgb(&p, 22, 22), (255, 255, 255));
        assert_eq!(rgb(&p, 44, 44), (0, 255, 0));
    }

    #[test]
    fn effect_layers_are_cached_between_frames() {
        let mut card = rect("rn_card", 20.0, 20.0, 40.0, 40.0, "#FFFFFF");
        card.effects = smallvec![Effect {
            id: "s".into(),
            enabled: true,
            kind: EffectKind::DropShadow(Shadow {
                x: 0.0,
                y: 10.0,
                blur: 0.0,
                spread: 0.0,
                color: "#000000".into(),
                opacity: 1.0,
            }),
        }];
        let d = doc(vec![ElementNode::leaf(card)]);
        let vp = Viewport::new(100.0, 100.0);
        let (mut r, p) = render(&d, &vp);
        assert_eq!(rgb(&p, 40, 65), (0, 0, 0));
        assert_eq!(r.effect_cache().len(), 1);

        let again = r
            .render_to_pixmap(&d, &vp, &Overlay::default(), &ImageAssets::new())
            .unwrap();
        assert_eq!(again.data(), p.data());
        assert_eq!(r.effect_cache().stats().0, 1);
    }

    fn shadowed(id: &str, x: f32) -> Element {
        let mut card = rect(id, x, 20.0, 40.0, 40.0, "#FFFFFF");
        card.effects = smallvec![Effect {
            id: "s".into(),
            enabled: true,
            kind: EffectKind::DropShadow(Shadow {
                x: 0.0,
                y: 10.0,
                blur: 4.0,
                spread: 0.0,
                color: "#000000".into(),
                opacity: 1.0,
            }),
        }];
        card
    }

    #[test]
    fn cached_layers_follow_subpixel_phase() {
        let vp = Viewport::new(120.0, 100.0);
        let (mut r, _) = render(&doc(vec![ElementNode::leaf(shadowed("rn_phase", 20.0))]), &vp);

        let whole_px = doc(vec![ElementNode::leaf(shadowed("rn_phase", 23.0))]);
        r.render_to_pixmap(&whole_px, &vp, &Overlay::default(), &ImageAssets::new())
            .unwrap();
        assert_eq!(r.effect_cache().stats(), (1, 1));

        let half_px = doc(vec![ElementNode::leaf(shadowed("rn_phase", 20.5))]);
        let reused = r
            .render_to_pixmap(&half_px, &vp, &Overlay::default(), &ImageAssets::new())
            .unwrap();
        assert_eq!(r.effect_cache().stats(), (1, 2));
        assert_eq!(r.effect_cache().len(), 2);

        let (_, fresh) = render(&half_px, &vp);
        assert_eq!(reused.data(), fresh.data());
    }

    #[test]
    fn oversized_layer_blur_draws_the_element_plainly() {
        let mut card = rect("rn_huge_blur", 10.0, 10.0, 20.0, 20.0, "#0000FF");
        card.effects = smallvec![Effect {
            id: "b".into(),
            enabled: true,
            kind: EffectKind::LayerBlur { radius: 1.2e9 },
        }];
        let d = doc(vec![ElementNode::leaf(card)]);
        let (mut r, p) = render(&d, &Viewport::new(50.0, 50.0));
        assert_eq!(rgb(&p, 20, 20), (0, 0, 255));
        assert!(r.effect_cache().is_empty());
    }

    #[test]
    fn layer_rect_rejects_overflow() {
        let bbox = Rect::from_xywh(10.5, 20.0, 30.0, 40.0).unwrap();
        assert_eq!(
            layer_rect(bbox, 3.0, 2.0),
            Some(LayerRect {
                left: 2,
                top: 12,
                width: 47,
                height: 57,
                pad: 8,
            })
        );
        assert_eq!(layer_rect(bbox, 1.2e9, 1.0), None);
        assert_eq!(layer_rect(bbox, f32::INFINITY, 1.0), None);
        let far = Rect::from_xywh(3.0e9, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(layer_rect(far, 0.0, 1.0), None);
    }

    #[test]
    fn frames_outside_the_view_are_skipped() {
        let vp = Viewport {
            offset_x: -100.0,
            ..Viewport::new(100.0, 100.0)
        };
        let visible = vp.visible_world();
        let frame = |x: f32, rotation: f32| {
            let mut f = Element::new(NodeId::intern("rn_cull"), ElementKind::Frame, x, 0.0, 50.0, 50.0);
            f.rotation = rotation;
            f
        };
        assert!(offscreen_frame(&frame(0.0, 0.0), &visible));
        assert!(!offscreen_frame(&frame(120.0, 0.0), &visible));
        // Rotating by 45° pushes a corner past x = 100.
        assert!(!offscreen_frame(&frame(60.0, 45.0), &visible));
        let mut stroked = frame(45.0, 0.0);
        stroked.stroke_width = 20.0;
        assert!(!offscreen_frame(&stroked, &visible));
        // Groups do not clip, so only frames are culled.
        let group = Element::new(NodeId::intern("rn_cull_g"), ElementKind::Group, 0.0, 0.0, 10.0, 10.0);
        assert!(!offscreen_frame(&group, &visible));

        let d = doc(vec![
            ElementNode::with_children(
                frame(0.0, 0.0).with_fill("#FF0000"),
                vec![ElementNode::leaf(rect("rn_cull_kid", 0.0, 0.0, 10.0, 10.0, "#FF0000"))],
            ),
            ElementNode::leaf(rect("rn_cull_seen", 110.0, 10.0, 20.0, 20.0, "#00FF00")),
        ]);
        let (_, p) = render(&d, &vp);
        assert_eq!(rgb(&p, 15, 15), (0, 255, 0));
        assert_eq!(rgb(&p, 60, 60), (255, 255, 255));
    }

    #[test]
    fn missing_image_draws_placeholder() {
        let img = Element::new(
            NodeId::intern("rn_img"),
            ElementKind::Image {
                image_src: "nowhere.png".into(),
                image_fit: ImageFit::Cover,
            },
            0.0,
            0.0,
            50.0,
            50.0,
        );
        let d = doc(vec![ElementNode::leaf(img)]);
        let (_, p) = render(&d, &Viewport::new(60.0, 60.0));
        assert_ne!(rgb(&p, 40, 10), (255, 255, 255));
        assert_eq!(rgb(&p, 55, 55), (255, 255, 255));
    }
}
