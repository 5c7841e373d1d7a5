//! Constraint propagation for frame resizes.
//!
//! When a frame changes size, each direct child is repositioned (and
//! possibly resized) according to its per-axis `Constraints`. This runs
//! synchronously inside `SceneGraph::update`.

use crate::model::*;

/// Re-layout `child` after its parent went from `old_w × old_h` to
/// `new_w × new_h`. Each axis is handled independently.
pub fn apply_constraints(child: &mut Element, old_w: f32, old_h: f32, new_w: f32, new_h: f32) {
    let (x, w) = resolve_axis(
        child.x,
        child.width,
        old_w,
        new_w,
        match child.constraints.horizontal {
            HorizontalConstraint::Left => AxisRule::Start,
            HorizontalConstraint::Right => AxisRule::End,
            HorizontalConstraint::Both => AxisRule::Stretch,
            HorizontalConstraint::Center => AxisRule::Center,
            HorizontalConstraint::Scale => AxisRule::Scale,
        },
    );
    let (y, h) = resolve_axis(
        child.y,
        child.height,
        old_h,
        new_h,
        match child.constraints.vertical {
            VerticalConstraint::Top => AxisRule::Start,
            VerticalConstraint::Bottom => AxisRule::End,
            VerticalConstraint::Both => AxisRule::Stretch,
            VerticalConstraint::Center => AxisRule::Center,
            VerticalConstraint::Scale => AxisRule::Scale,
        },
    );
    child.x = x;
    child.width = w;
    child.y = y;
    child.height = h;
}

#[derive(Debug, Clone, Copy)]
enum AxisRule {
    Start,
    End,
    Stretch,
    Center,
    Scale,
}

/// Returns the new `(position, size)` along one axis.
fn resolve_axis(pos: f32, size: f32, old: f32, new: f32, rule: AxisRule) -> (f32, f32) {
    let delta = new - old;
    match rule {
        AxisRule::Start => (pos, size),
        AxisRule::End => (pos + delta, size),
        AxisRule::Stretch => (pos, size + delta),
        AxisRule::Center => {
            if old == 0.0 {
                return (pos + delta / 2.0, size);
            }
            let ratio = (pos + size / 2.0) / old;
            (ratio * new - size / 2.0, size)
        }
        AxisRule::Scale => {
            if old == 0.0 {
                return (pos, size);
            }
            let k = new / old;
            (pos * k, size * k)
        }
    }
}
