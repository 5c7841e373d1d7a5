//! Hit testing: world point → element lookup.
//!
//! Reverse-walks the scene (front-to-back) so the topmost, deepest
//! element under the point wins.

use fc_core::NodeIndex;
use fc_core::geometry::{Bounds, unrotate_point};
use fc_core::id::NodeId;
use fc_core::model::{Element, ElementKind};
use fc_core::scene::SceneGraph;

/// Find the topmost element at world position `(px, py)`.
/// Returns `None` if nothing is hit (background).
pub fn hit_test(scene: &SceneGraph, px: f32, py: f32) -> Option<NodeId> {
    scene
        .roots()
        .iter()
        .rev()
        .find_map(|&root| hit_test_node(scene, root, 0.0, 0.0, px, py))
}

fn hit_test_node(
    scene: &SceneGraph,
    idx: NodeIndex,
    ox: f32,
    oy: f32,
    px: f32,
    py: f32,
) -> Option<NodeId> {
    let el = scene.element(idx);
    let world = el.local_bounds().translate(ox, oy);

    // Children first, topmost first
    for &child in scene.children(idx).iter().rev() {
        if let Some(hit) = hit_test_node(scene, child, world.x, world.y, px, py) {
            return Some(hit);
        }
    }

    element_contains(el, &world, px, py).then_some(el.id)
}

/// Whether a world point falls inside an element placed at `world`.
/// Rotation is undone first; circles use the true ellipse.
pub fn element_contains(el: &Element, world: &Bounds, px: f32, py: f32) -> bool {
    let (x, y) = unrotate_point(*world, el.rotation, px, py);
    match el.kind {
        ElementKind::Circle => {
            let (cx, cy) = world.center();
            let (rx, ry) = (world.width / 2.0, world.height / 2.0);
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let (dx, dy) = ((x - cx) / rx, (y - cy) / ry);
            dx * dx + dy * dy <= 1.0
        }
        ElementKind::Frame
        | ElementKind::Rect
        | ElementKind::Group
        | ElementKind::Image { .. }
        | ElementKind::Text { .. }
        | ElementKind::Instance { .. } => world.contains_point(x, y),
    }
}
