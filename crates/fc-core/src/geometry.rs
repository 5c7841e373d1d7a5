//! Rectangle math: bounds, unions, and rotation-aware bounding boxes.

use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. Used for both parent-local and world space;
/// the caller decides which.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two arbitrary corners (drag rectangles).
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Full (inclusive) containment of `other` within `self`.
    pub fn contains(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// AABB overlap test (touching edges do not count).
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Union of any number of rectangles. `None` for an empty iterator.
    pub fn union_all<I: IntoIterator<Item = Bounds>>(iter: I) -> Option<Bounds> {
        iter.into_iter().reduce(|acc, b| acc.union(&b))
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Bounds {
        Bounds {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn inflate(&self, pad: f32) -> Bounds {
        Bounds {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.right() as f64,
            self.bottom() as f64,
        )
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x0 as f32,
            y: rect.y0 as f32,
            width: rect.width() as f32,
            height: rect.height() as f32,
        }
    }
}

/// Axis-aligned box of `bounds` rotated by `degrees` about its own center.
pub fn rotated_aabb(bounds: Bounds, degrees: f32) -> Bounds {
    if degrees.rem_euclid(360.0) == 0.0 {
        return bounds;
    }
    let (cx, cy) = bounds.center();
    let affine = Affine::rotate_about(
        (degrees as f64).to_radians(),
        Point::new(cx as f64, cy as f64),
    );
    Bounds::from_rect(affine.transform_rect_bbox(bounds.to_rect()))
}

/// Inverse-rotate a point into an element's unrotated frame.
pub fn unrotate_point(bounds: Bounds, degrees: f32, px: f32, py: f32) -> (f32, f32) {
    if degrees == 0.0 {
        return (px, py);
    }
    let (cx, cy) = bounds.center();
    let affine = Affine::rotate_about(
        -(degrees as f64).to_radians(),
        Point::new(cx as f64, cy as f64),
    );
    let p = affine * Point::new(px as f64, py as f64);
    (p.x as f32, p.y as f32)
}
