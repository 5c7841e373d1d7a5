//! Core data model for FC documents.
//!
//! An `Element` is one visual node (frame, shape, text, image, group or
//! master instance). Positions are always relative to the immediate parent.
//! The owned tree form (`ElementNode`) is what travels through JSON, the
//! master registry and the clipboard; the live document lives in the
//! `SceneGraph` arena.

use crate::geometry::Bounds;
use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Paint ───────────────────────────────────────────────────────────────

/// A gradient stop. `color` is a color string, `opacity` multiplies its alpha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32, // 0.0 .. 1.0
    pub color: String,
    #[serde(default = "one")]
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Degrees; 0 runs left → right, 90 runs top → bottom. Linear only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    pub stops: Vec<GradientStop>,
}

// ─── Layout constraints ──────────────────────────────────────────────────

/// How a child reacts horizontally when its parent frame is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalConstraint {
    #[default]
    Left,
    Right,
    Both,
    Center,
    Scale,
}

/// How a child reacts vertically when its parent frame is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalConstraint {
    #[default]
    Top,
    Bottom,
    Both,
    Center,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constraints {
    pub horizontal: HorizontalConstraint,
    pub vertical: VerticalConstraint,
}

// ─── Effects ─────────────────────────────────────────────────────────────

/// Parameters shared by drop and inner shadows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub x: f32,
    pub y: f32,
    pub blur: f32,
    #[serde(default)]
    pub spread: f32,
    pub color: String,
    #[serde(default = "one")]
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectKind {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur { radius: f32 },
    BackgroundBlur { radius: f32 },
}

impl EffectKind {
    /// How far this effect can paint outside the element's bounds.
    pub fn extent(&self) -> f32 {
        match self {
            EffectKind::DropShadow(s) => s.blur + s.spread.max(0.0) + s.x.abs().max(s.y.abs()),
            EffectKind::InnerShadow(_) => 0.0,
            EffectKind::LayerBlur { radius } => *radius,
            EffectKind::BackgroundBlur { .. } => 0.0,
        }
    }
}

/// One stage of an element's effect stack. Stages run in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(flatten)]
    pub kind: EffectKind,
}

// ─── Type-specific payloads ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    Contain,
    #[default]
    Cover,
    Fill,
}

/// The seven element kinds, with their kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    /// Clipping container (artboard / screen).
    Frame,
    Rect,
    Circle,
    /// Non-clipping container.
    Group,
    #[serde(rename_all = "camelCase")]
    Image {
        image_src: String,
        #[serde(default)]
        image_fit: ImageFit,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        #[serde(default = "default_font_size")]
        font_size: f32,
        #[serde(default = "default_font_family")]
        font_family: String,
        #[serde(default = "default_font_weight")]
        font_weight: u16,
        #[serde(default)]
        text_align: TextAlign,
        /// Multiple of `font_size`.
        #[serde(default = "default_line_height")]
        line_height: f32,
    },
    /// Placed copy of a master. Weak reference by id.
    #[serde(rename_all = "camelCase")]
    Instance { master_id: NodeId },
}

impl ElementKind {
    /// Short lowercase name, also used as the id prefix for fresh ids.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Frame => "frame",
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Group => "group",
            ElementKind::Image { .. } => "image",
            ElementKind::Text { .. } => "text",
            ElementKind::Instance { .. } => "instance",
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        ElementKind::Text {
            text: content.into(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            text_align: TextAlign::default(),
            line_height: default_line_height(),
        }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// A single node of the scene tree, without its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: ElementKind,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f32,

    /// Solid fill color. Mutually exclusive with `fill_gradient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_gradient: Option<Gradient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub stroke_width: f32,
    #[serde(default = "one")]
    pub opacity: f32,

    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub effects: SmallVec<[Effect; 2]>,
}

impl Element {
    pub fn new(id: NodeId, kind: ElementKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        let name = match &kind {
            ElementKind::Text { .. } => "Text".to_string(),
            other => {
                let t = other.type_name();
                let mut name = t[..1].to_ascii_uppercase();
                name.push_str(&t[1..]);
                name
            }
        };
        Self {
            id,
            name,
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            fill: None,
            fill_gradient: None,
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
            constraints: Constraints::default(),
            effects: SmallVec::new(),
        }
    }

    /// Parent-local bounds, ignoring rotation.
    pub fn local_bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Set a solid fill, dropping any gradient.
    pub fn set_fill(&mut self, color: impl Into<String>) {
        self.fill = Some(color.into());
        self.fill_gradient = None;
    }

    /// Set a gradient fill, dropping any solid color.
    pub fn set_gradient(&mut self, gradient: Gradient) {
        self.fill_gradient = Some(gradient);
        self.fill = None;
    }

    pub fn with_fill(mut self, color: &str) -> Self {
        self.set_fill(color);
        self
    }

    pub fn enabled_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(|e| e.enabled)
    }
}

/// An element together with the children it owns. The nested form used
/// for JSON, masters, and the clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    #[serde(flatten)]
    pub element: Element,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn leaf(element: Element) -> Self {
        Self {
            element,
            children: Vec::new(),
        }
    }

    pub fn with_children(element: Element, children: Vec<ElementNode>) -> Self {
        Self { element, children }
    }

    /// Visit every element in this subtree, pre-order.
    pub fn walk(&self, f: &mut impl FnMut(&Element)) {
        f(&self.element);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Replace every id in this subtree using `fresh`, pre-order.
    pub fn reassign_ids(&mut self, fresh: &mut impl FnMut(&Element) -> NodeId) {
        self.element.id = fresh(&self.element);
        for child in &mut self.children {
            child.reassign_ids(fresh);
        }
    }
}

// ─── Serde defaults ──────────────────────────────────────────────────────

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

fn is_zero(v: &f32) -> bool {
    *v == 0.0
}

fn default_font_size() -> f32 {
    16.0
}

fn default_font_family() -> String {
    "Inter".into()
}

fn default_font_weight() -> u16 {
    400
}

fn default_line_height() -> f32 {
    1.2
}
