//! Element → tiny-skia paints and paths.

use fc_core::color::{Color, parse_color};
use fc_core::model::{Element, ElementKind, Gradient, GradientKind};
use tiny_skia::{
    GradientStop, LinearGradient, Paint, Path, PathBuilder, Point, RadialGradient, Rect, Shader,
    SpreadMode, Transform,
};

pub fn to_skia(c: Color) -> tiny_skia::Color {
    let [r, g, b, a] = c.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

/// Parse a color string and fold in `opacity`. `None` when invisible.
pub fn color(value: &str, opacity: f32) -> Option<tiny_skia::Color> {
    let c = parse_color(value)?.with_opacity(opacity);
    c.is_visible().then(|| to_skia(c))
}

pub fn solid(value: &str, opacity: f32) -> Option<Paint<'static>> {
    let mut paint = Paint::default();
    paint.set_color(color(value, opacity)?);
    paint.anti_alias = true;
    Some(paint)
}

/// Fill paint for an element's local `w × h` box. Gradients win over a
/// solid fill when both are present.
pub fn fill_paint(el: &Element, opacity: f32) -> Option<Paint<'static>> {
    if let Some(gradient) = &el.fill_gradient {
        let mut paint = Paint::default();
        paint.shader = gradient_shader(gradient, el.width, el.height, opacity)?;
        paint.anti_alias = true;
        return Some(paint);
    }
    solid(el.fill.as_deref()?, opacity)
}

fn gradient_shader(g: &Gradient, w: f32, h: f32, opacity: f32) -> Option<Shader<'static>> {
    let colors: Vec<(f32, tiny_skia::Color)> = g
        .stops
        .iter()
        .filter_map(|s| {
            let c = parse_color(&s.color)?.with_opacity(s.opacity * opacity);
            Some((s.offset.clamp(0.0, 1.0), to_skia(c)))
        })
        .collect();
    match colors.as_slice() {
        [] => return None,
        [(_, only)] => return Some(Shader::SolidColor(*only)),
        _ => {}
    }
    let stops: Vec<GradientStop> = colors
        .into_iter()
        .map(|(offset, c)| GradientStop::new(offset, c))
        .collect();
    let (cx, cy) = (w / 2.0, h / 2.0);
    match g.kind {
        GradientKind::Linear => {
            let rad = g.angle.unwrap_or(0.0).to_radians();
            let (dx, dy) = (rad.cos() * w / 2.0, rad.sin() * h / 2.0);
            LinearGradient::new(
                Point::from_xy(cx - dx, cy - dy),
                Point::from_xy(cx + dx, cy + dy),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
        }
        GradientKind::Radial => RadialGradient::new(
            Point::from_xy(cx, cy),
            Point::from_xy(cx, cy),
            w.max(h) / 2.0,
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ),
    }
}

/// Outline of an element in its local space, or `None` for kinds without
/// a shape of their own (groups, text, images, degenerate sizes).
pub fn shape_path(el: &Element) -> Option<Path> {
    let rect = Rect::from_xywh(0.0, 0.0, el.width, el.height)?;
    match el.kind {
        ElementKind::Frame | ElementKind::Rect | ElementKind::Instance { .. } => {
            Some(PathBuilder::from_rect(rect))
        }
        ElementKind::Circle => PathBuilder::from_oval(rect),
        ElementKind::Group | ElementKind::Image { .. } | ElementKind::Text { .. } => None,
    }
}

/// Local → screen transform for an element whose parent maps through
/// `parent`: translate to `(x, y)`, then rotate about the element center.
pub fn element_transform(parent: Transform, el: &Element) -> Transform {
    let t = parent.pre_translate(el.x, el.y);
    if el.rotation == 0.0 {
        t
    } else {
        t.pre_concat(Transform::from_rotate_at(
            el.rotation,
            el.width / 2.0,
            el.height / 2.0,
        ))
    }
}
