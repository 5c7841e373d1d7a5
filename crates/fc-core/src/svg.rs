//! SVG export of a single frame.
//!
//! The first frame in the root list becomes the SVG canvas; its subtree is
//! emitted as nested `<g transform>` groups in parent-local coordinates.
//! Gradients and effect stacks are written to `<defs>` keyed per element.

use crate::color::parse_color;
use crate::document::Document;
use crate::error::{EditError, EditResult};
use crate::model::*;
use crate::scene::SceneGraph;
use petgraph::graph::NodeIndex;

/// Render the first root frame to an SVG document string.
pub fn export_svg(doc: &Document) -> EditResult<String> {
    let scene = &doc.scene;
    let frame = scene
        .roots()
        .iter()
        .copied()
        .find(|&idx| matches!(scene.element(idx).kind, ElementKind::Frame))
        .ok_or(EditError::NoFrame)?;
    let el = scene.element(frame);

    let mut out = SvgWriter::default();
    out.element(scene, frame, true);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = el.width,
        h = el.height,
    ));
    if !out.defs.is_empty() {
        svg.push_str("<defs>\n");
        svg.push_str(&out.defs);
        svg.push_str("</defs>\n");
    }
    svg.push_str(&out.body);
    svg.push_str("</svg>\n");
    Ok(svg)
}

#[derive(Default)]
struct SvgWriter {
    defs: String,
    body: String,
}

impl SvgWriter {
    fn element(&mut self, scene: &SceneGraph, idx: NodeIndex, is_root: bool) {
        let el = scene.element(idx);
        let key = escape(el.id.as_str());
        let (x, y) = if is_root { (0.0, 0.0) } else { (el.x, el.y) };

        let mut attrs = format!(" transform=\"translate({x} {y})");
        if el.rotation != 0.0 {
            attrs.push_str(&format!(
                " rotate({} {} {})",
                el.rotation,
                el.width / 2.0,
                el.height / 2.0
            ));
        }
        attrs.push('"');
        if el.opacity < 1.0 {
            attrs.push_str(&format!(" opacity=\"{}\"", el.opacity));
        }
        if self.filter(el, &key) {
            attrs.push_str(&format!(" filter=\"url(#fx-{key})\""));
        }
        self.body
            .push_str(&format!("<g id=\"{key}\"{attrs}>\n"));

        self.shape(el, &key);

        let children = scene.children(idx);
        if !children.is_empty() {
            let clip = matches!(el.kind, ElementKind::Frame);
            if clip {
                self.defs.push_str(&format!(
                    "<clipPath id=\"clip-{key}\"><rect width=\"{}\" height=\"{}\"/></clipPath>\n",
                    el.width, el.height
                ));
                self.body
                    .push_str(&format!("<g clip-path=\"url(#clip-{key})\">\n"));
            }
            for &child in children {
                self.element(scene, child, false);
            }
            if clip {
                self.body.push_str("</g>\n");
            }
        }
        self.body.push_str("</g>\n");
    }

    fn shape(&mut self, el: &Element, key: &str) {
        let (w, h) = (el.width, el.height);
        match &el.kind {
            ElementKind::Frame | ElementKind::Rect | ElementKind::Instance { .. } => {
                let paint = self.paint(el, key);
                self.body
                    .push_str(&format!("<rect width=\"{w}\" height=\"{h}\"{paint}/>\n"));
            }
            ElementKind::Circle => {
                let paint = self.paint(el, key);
                self.body.push_str(&format!(
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"{paint}/>\n",
                    w / 2.0,
                    h / 2.0,
                    w / 2.0,
                    h / 2.0
                ));
            }
            ElementKind::Group => {}
            ElementKind::Image {
                image_src,
                image_fit,
            } => {
                let aspect = match image_fit {
                    ImageFit::Cover => "xMidYMid slice",
                    ImageFit::Contain => "xMidYMid meet",
                    ImageFit::Fill => "none",
                };
                self.body.push_str(&format!(
                    "<image href=\"{}\" width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"{aspect}\"/>\n",
                    escape(image_src)
                ));
            }
            ElementKind::Text {
                text,
                font_size,
                font_family,
                font_weight,
                text_align,
                line_height,
            } => {
                let (anchor, tx) = match text_align {
                    TextAlign::Left => ("start", 0.0),
                    TextAlign::Center => ("middle", w / 2.0),
                    TextAlign::Right => ("end", w),
                };
                let fill = match el.fill_gradient {
                    Some(_) => self.paint(el, key),
                    None => color_attrs("fill", el.fill.as_deref().unwrap_or("#000000")),
                };
                self.body.push_str(&format!(
                    "<text font-family=\"{}\" font-size=\"{font_size}\" font-weight=\"{font_weight}\" text-anchor=\"{anchor}\"{fill}>",
                    escape(font_family)
                ));
                for (i, line) in text.split('\n').enumerate() {
                    let dy = if i == 0 {
                        *font_size
                    } else {
                        font_size * line_height
                    };
                    self.body.push_str(&format!(
                        "<tspan x=\"{tx}\" dy=\"{dy}\">{}</tspan>",
                        escape(line)
                    ));
                }
                self.body.push_str("</text>\n");
            }
        }
    }

    /// Fill and stroke attributes, registering a gradient def if needed.
    fn paint(&mut self, el: &Element, key: &str) -> String {
        let mut attrs = match (&el.fill_gradient, &el.fill) {
            (Some(gradient), _) => {
                self.gradient(gradient, key);
                format!(" fill=\"url(#grad-{key})\"")
            }
            (None, Some(fill)) => color_attrs("fill", fill),
            (None, None) => " fill=\"none\"".to_string(),
        };
        if let Some(stroke) = &el.stroke
            && el.stroke_width > 0.0
        {
            attrs.push_str(&color_attrs("stroke", stroke));
            attrs.push_str(&format!(" stroke-width=\"{}\"", el.stroke_width));
        }
        attrs
    }

    fn gradient(&mut self, gradient: &Gradient, key: &str) {
        let tag = match gradient.kind {
            GradientKind::Linear => {
                let rad = gradient.angle.unwrap_or(0.0).to_radians();
                let (dx, dy) = (rad.cos() / 2.0, rad.sin() / 2.0);
                self.defs.push_str(&format!(
                    "<linearGradient id=\"grad-{key}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">\n",
                    0.5 - dx,
                    0.5 - dy,
                    0.5 + dx,
                    0.5 + dy
                ));
                "linearGradient"
            }
            GradientKind::Radial => {
                self.defs.push_str(&format!(
                    "<radialGradient id=\"grad-{key}\" cx=\"0.5\" cy=\"0.5\" r=\"0.5\">\n"
                ));
                "radialGradient"
            }
        };
        for stop in &gradient.stops {
            let color = parse_color(&stop.color).unwrap_or(crate::color::Color::BLACK);
            self.defs.push_str(&format!(
                "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>\n",
                stop.offset,
                color.to_hex(),
                color.a * stop.opacity
            ));
        }
        self.defs.push_str(&format!("</{tag}>\n"));
    }

    /// Write a `<filter>` chaining every enabled effect. Returns false when
    /// nothing exportable was written.
    fn filter(&mut self, el: &Element, key: &str) -> bool {
        let mut chain = String::new();
        let mut prev = "SourceGraphic".to_string();

        for (n, effect) in el.enabled_effects().enumerate() {
            let out = format!("e{n}");
            match &effect.kind {
                EffectKind::DropShadow(s) => {
                    chain.push_str(&format!(
                        "<feDropShadow in=\"{prev}\" dx=\"{}\" dy=\"{}\" stdDeviation=\"{}\"{} result=\"{out}\"/>\n",
                        s.x,
                        s.y,
                        s.blur / 2.0,
                        flood_attrs(s)
                    ));
                }
                EffectKind::InnerShadow(s) => {
                    chain.push_str(&format!(
                        "<feOffset in=\"SourceAlpha\" dx=\"{}\" dy=\"{}\" result=\"{out}o\"/>\n",
                        s.x, s.y
                    ));
                    chain.push_str(&format!(
                        "<feGaussianBlur in=\"{out}o\" stdDeviation=\"{}\" result=\"{out}b\"/>\n",
                        s.blur / 2.0
                    ));
                    chain.push_str(&format!(
                        "<feComposite in=\"{out}b\" in2=\"SourceAlpha\" operator=\"arithmetic\" k2=\"-1\" k3=\"1\" result=\"{out}m\"/>\n"
                    ));
                    chain.push_str(&format!("<feFlood{} result=\"{out}f\"/>\n", flood_attrs(s)));
                    chain.push_str(&format!(
                        "<feComposite in=\"{out}f\" in2=\"{out}m\" operator=\"in\" result=\"{out}s\"/>\n"
                    ));
                    chain.push_str(&format!(
                        "<feComposite in=\"{out}s\" in2=\"{prev}\" operator=\"over\" result=\"{out}\"/>\n"
                    ));
                }
                EffectKind::LayerBlur { radius } => {
                    chain.push_str(&format!(
                        "<feGaussianBlur in=\"{prev}\" stdDeviation=\"{}\" result=\"{out}\"/>\n",
                        radius / 2.0
                    ));
                }
                // Needs the backdrop; SVG has no portable primitive for it.
                EffectKind::BackgroundBlur { .. } => continue,
            }
            prev = out;
        }

        if chain.is_empty() {
            return false;
        }
        self.defs.push_str(&format!(
            "<filter id=\"fx-{key}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\n"
        ));
        self.defs.push_str(&chain);
        self.defs.push_str("</filter>\n");
        true
    }
}

fn flood_attrs(s: &Shadow) -> String {
    let color = parse_color(&s.color).unwrap_or(crate::color::Color::BLACK);
    format!(
        " flood-color=\"{}\" flood-opacity=\"{}\"",
        color.to_hex(),
        color.a * s.opacity
    )
}

/// `fill="#RRGGBB"` plus `fill-opacity` when translucent.
fn color_attrs(attr: &str, value: &str) -> String {
    match parse_color(value) {
        Some(c) if c.is_visible() => {
            let mut s = format!(" {attr}=\"{}\"", c.to_hex());
            if c.a < 1.0 {
                s.push_str(&format!(" {attr}-opacity=\"{}\"", c.a));
            }
            s
        }
        _ => format!(" {attr}=\"none\""),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Masters;
    use crate::id::NodeId;
    use smallvec::smallvec;

    fn doc(nodes: Vec<ElementNode>) -> Document {
        Document::from_parts(nodes, Masters::new()).unwrap()
    }

    #[test]
    fn no_frame_is_an_error() {
        let d = doc(vec![ElementNode::leaf(Element::new(
            NodeId::intern("sv_lonely"),
            ElementKind::Rect,
            0.0,
            0.0,
            10.0,
            10.0,
        ))]);
        assert!(matches!(export_svg(&d), Err(EditError::NoFrame)));
    }

    #[test]
    fn exports_only_first_frame() {
        let d = doc(vec![
            ElementNode::leaf(Element::new(NodeId::intern("sv_r0"), ElementKind::Rect, 0.0, 0.0, 5.0, 5.0)),
            ElementNode::leaf(
                Element::new(NodeId::intern("sv_f1"), ElementKind::Frame, 50.0, 50.0, 320.0, 568.0)
                    .with_fill("#FFFFFF"),
            ),
            ElementNode::leaf(Element::new(NodeId::intern("sv_f2"), ElementKind::Frame, 0.0, 0.0, 10.0, 10.0)),
        ]);
        let svg = export_svg(&d).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"320\" height=\"568\""));
        assert!(svg.contains("id=\"sv_f1\""));
        assert!(!svg.contains("sv_f2"));
        assert!(!svg.contains("sv_r0"));
    }

    #[test]
    fn text_lines_become_tspans_and_are_escaped() {
        let text = Element::new(
            NodeId::intern("sv_text"),
            ElementKind::text("Tom & Jerry\n<b>"),
            10.0,
            10.0,
            200.0,
            40.0,
        );
        let d = doc(vec![ElementNode::with_children(
            Element::new(NodeId::intern("sv_tf"), ElementKind::Frame, 0.0, 0.0, 320.0, 100.0),
            vec![ElementNode::leaf(text)],
        )]);
        let svg = export_svg(&d).unwrap();
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains("Tom &amp; Jerry"));
        assert!(svg.contains("&lt;b&gt;"));
        assert!(svg.contains("clip-path=\"url(#clip-sv_tf)\""));
    }

    #[test]
    fn gradients_and_effects_become_defs() {
        let mut card = Element::new(NodeId::intern("sv_card"), ElementKind::Rect, 0.0, 0.0, 100.0, 100.0);
        card.set_gradient(Gradient {
            kind: GradientKind::Linear,
            angle: Some(90.0),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: "#FF0000".into(),
                    opacity: 1.0,
                },
                GradientStop {
                    offset: 1.0,
                    color: "#0000FF".into(),
                    opacity: 1.0,
                },
            ],
        });
        let shadow = Shadow {
            x: 0.0,
            y: 4.0,
            blur: 8.0,
            spread: 0.0,
            color: "#000000".into(),
            opacity: 0.25,
        };
        card.effects = smallvec![
            Effect {
                id: "a".into(),
                enabled: true,
                kind: EffectKind::DropShadow(shadow.clone()),
            },
            Effect {
                id: "b".into(),
                enabled: true,
                kind: EffectKind::InnerShadow(shadow),
            },
            Effect {
                id: "c".into(),
                enabled: false,
                kind: EffectKind::LayerBlur { radius: 4.0 },
            },
        ];
        let d = doc(vec![ElementNode::with_children(
            Element::new(NodeId::intern("sv_gf"), ElementKind::Frame, 0.0, 0.0, 200.0, 200.0),
            vec![ElementNode::leaf(card)],
        )]);
        let svg = export_svg(&d).unwrap();
        assert!(svg.contains("<linearGradient id=\"grad-sv_card\""));
        assert!(svg.contains("fill=\"url(#grad-sv_card)\""));
        assert!(svg.contains("<filter id=\"fx-sv_card\""));
        assert!(svg.contains("<feDropShadow in=\"SourceGraphic\""));
        assert!(svg.contains("operator=\"arithmetic\" k2=\"-1\" k3=\"1\""));
        assert!(svg.contains("in2=\"e0\" operator=\"over\""));
        assert!(!svg.contains("<feGaussianBlur in=\"e1\""));
        assert!(svg.contains("filter=\"url(#fx-sv_card)\""));
    }
}
