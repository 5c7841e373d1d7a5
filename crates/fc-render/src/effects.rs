//! Multi-stage effect compositing on offscreen layers.
//!
//! The element (with its subtree) is first rendered into a padded layer.
//! Each enabled effect then consumes the previous stage's pixmap and
//! returns a new one. All pixmaps are premultiplied RGBA8 of equal size.

use crate::blur::blur_pixmap;
use crate::paint;
use fc_core::model::{EffectKind, Shadow};
use tiny_skia::{BlendMode, Pixmap, PixmapPaint, Transform};

/// Screen pixels beneath the layer, for background blur.
pub struct Backdrop<'a> {
    pub pixels: &'a Pixmap,
    /// Screen position of the layer's top-left pixel.
    pub x: i32,
    pub y: i32,
}

/// Largest distance (world units) any of `effects` paints outside the
/// element's box.
pub fn max_extent<'a>(effects: impl IntoIterator<Item = &'a EffectKind>) -> f32 {
    effects
        .into_iter()
        .map(EffectKind::extent)
        .fold(0.0, f32::max)
}

/// Run every stage in order. `coverage` is the element's opaque shape,
/// needed only by background blur; stages that cannot run are skipped.
pub fn run_pipeline(
    layer: Pixmap,
    coverage: Option<&Pixmap>,
    effects: &[&EffectKind],
    zoom: f32,
    backdrop: Option<&Backdrop<'_>>,
) -> Pixmap {
    effects.iter().fold(layer, |current, effect| match effect {
        EffectKind::DropShadow(s) => drop_shadow(&current, s, zoom),
        EffectKind::InnerShadow(s) => inner_shadow(&current, s, zoom),
        EffectKind::LayerBlur { radius } => {
            let mut out = current;
            blur_pixmap(&mut out, radius * zoom);
            out
        }
        EffectKind::BackgroundBlur { radius } => match (backdrop, coverage) {
            (Some(b), Some(c)) => background_blur(&current, c, b, radius * zoom),
            _ => current,
        },
    })
}

fn drop_shadow(current: &Pixmap, s: &Shadow, zoom: f32) -> Pixmap {
    let Some(color) = paint::color(&s.color, s.opacity) else {
        return current.clone();
    };
    let mut shadow = tint_alpha(current, color, false);
    dilate(&mut shadow, (s.spread * zoom).round().max(0.0) as usize);
    blur_pixmap(&mut shadow, s.blur * zoom);

    let mut out = blank_like(current);
    out.draw_pixmap(
        (s.x * zoom).round() as i32,
        (s.y * zoom).round() as i32,
        shadow.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    out.draw_pixmap(0, 0, current.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    out
}

fn inner_shadow(current: &Pixmap, s: &Shadow, zoom: f32) -> Pixmap {
    let Some(color) = paint::color(&s.color, s.opacity) else {
        return current.clone();
    };
    // Everything outside the offset shape casts the shadow inward.
    let mut shifted = blank_like(current);
    shifted.draw_pixmap(
        (s.x * zoom).round() as i32,
        (s.y * zoom).round() as i32,
        current.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    let mut shadow = tint_alpha(&shifted, color, true);
    dilate(&mut shadow, (s.spread * zoom).round().max(0.0) as usize);
    blur_pixmap(&mut shadow, s.blur * zoom);
    mask_by_alpha(&mut shadow, current);

    let mut out = current.clone();
    out.draw_pixmap(0, 0, shadow.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    out
}

fn background_blur(current: &Pixmap, coverage: &Pixmap, backdrop: &Backdrop<'_>, radius: f32) -> Pixmap {
    let mut behind = blank_like(current);
    let copy = PixmapPaint {
        blend_mode: BlendMode::Source,
        ..PixmapPaint::default()
    };
    behind.draw_pixmap(
        -backdrop.x,
        -backdrop.y,
        backdrop.pixels.as_ref(),
        &copy,
        Transform::identity(),
        None,
    );
    blur_pixmap(&mut behind, radius);
    mask_by_alpha(&mut behind, coverage);
    behind.draw_pixmap(0, 0, current.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    behind
}

// ─── Pixel helpers ───────────────────────────────────────────────────────

fn blank_like(p: &Pixmap) -> Pixmap {
    let mut out = p.clone();
    out.fill(tiny_skia::Color::TRANSPARENT);
    out
}

/// Solid `color` weighted by the source alpha (or its inverse).
fn tint_alpha(src: &Pixmap, color: tiny_skia::Color, invert: bool) -> Pixmap {
    let c = color.premultiply().to_color_u8();
    let rgba = [c.red(), c.green(), c.blue(), c.alpha()];
    let mut out = blank_like(src);
    for (o, s) in out.data_mut().chunks_exact_mut(4).zip(src.data().chunks_exact(4)) {
        let a = if invert { 255 - s[3] } else { s[3] };
        for i in 0..4 {
            o[i] = mul255(rgba[i], a);
        }
    }
    out
}

/// Keep `dst` only where `mask` is opaque (destination-in).
fn mask_by_alpha(dst: &mut Pixmap, mask: &Pixmap) {
    for (d, m) in dst.data_mut().chunks_exact_mut(4).zip(mask.data().chunks_exact(4)) {
        for c in d.iter_mut() {
            *c = mul255(*c, m[3]);
        }
    }
}

/// Grow opaque regions by `radius` pixels (separable max filter).
fn dilate(p: &mut Pixmap, radius: usize) {
    if radius == 0 {
        return;
    }
    let (w, h) = (p.width() as usize, p.height() as usize);
    let src = p.data().to_vec();
    let mut tmp = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let (lo, hi) = (x.saturating_sub(radius), (x + radius).min(w - 1));
            for c in 0..4 {
                tmp[(y * w + x) * 4 + c] = (lo..=hi).map(|sx| src[(y * w + sx) * 4 + c]).max().unwrap_or(0);
            }
        }
    }
    let out = p.data_mut();
    for y in 0..h {
        for x in 0..w {
            let (lo, hi) = (y.saturating_sub(radius), (y + radius).min(h - 1));
            for c in 0..4 {
                out[(y * w + x) * 4 + c] = (lo..=hi).map(|sy| tmp[(sy * w + x) * 4 + c]).max().unwrap_or(0);
            }
        }
    }
}

fn mul255(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}
