//! Integration tests: pointer gestures end to end.
//!
//! The viewport stays at zoom 1 with no offset unless a test says
//! otherwise, so screen and world coordinates coincide.

use fc_core::*;
use fc_editor::{EditorConfig, EditorSession, Modifiers, PointerButton};
use pretty_assertions::assert_eq;

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

fn rect(name: &str, x: f32, y: f32, w: f32, h: f32) -> ElementNode {
    ElementNode::leaf(Element::new(id(name), ElementKind::Rect, x, y, w, h).with_fill("#888888"))
}

fn session(nodes: Vec<ElementNode>) -> EditorSession {
    let doc = Document::from_parts(nodes, Masters::new()).unwrap();
    EditorSession::with_document(doc, EditorConfig::default())
}

fn drag(s: &mut EditorSession, from: (f32, f32), to: (f32, f32), mods: Modifiers) {
    s.pointer_down(from.0, from.1, PointerButton::Primary, mods);
    s.pointer_move(to.0, to.1, mods);
    s.on_animation_frame();
    s.pointer_up(to.0, to.1, mods);
}

fn bounds(s: &EditorSession, name: &str) -> (f32, f32, f32, f32) {
    let el = s.document().scene.get(id(name)).unwrap();
    (el.x, el.y, el.width, el.height)
}

/// A(0,0,100,100) beside B(200,0,100,100).
fn pair() -> EditorSession {
    session(vec![rect("ix_A", 0.0, 0.0, 100.0, 100.0), rect("ix_B", 200.0, 0.0, 100.0, 100.0)])
}

// ─── Move + snapping ────────────────────────────────────────────────────

#[test]
fn dragging_a_toward_b_snaps_right_edge_to_b_left() {
    // Right edge lands at 196, 197, 203, 204: all within 4 of B.x = 200.
    for target in [96.0, 97.0, 103.0, 104.0] {
        let mut s = pair();
        drag(&mut s, (50.0, 50.0), (50.0 + target, 50.0), Modifiers::NONE);
        assert_eq!(bounds(&s, "ix_A").0, 100.0, "dragged to x={target}");
        assert_eq!(s.selection(), &[id("ix_A")]);
    }
}

#[test]
fn just_outside_the_threshold_does_not_snap() {
    let mut s = pair();
    drag(&mut s, (50.0, 50.0), (145.0, 50.0), Modifiers::NONE);
    assert_eq!(bounds(&s, "ix_A").0, 95.0);
}

#[test]
fn guides_show_during_drag_and_clear_on_release() {
    let mut s = pair();
    s.pointer_down(50.0, 50.0, PointerButton::Primary, Modifiers::NONE);
    s.pointer_move(148.0, 50.0, Modifiers::NONE);
    assert!(!s.overlay().guides.is_empty());
    assert!(s.needs_frame());
    assert!(s.on_animation_frame());
    assert!(!s.needs_frame());
    s.pointer_up(148.0, 50.0, Modifiers::NONE);
    assert!(s.overlay().guides.is_empty());
    assert!(s.gesture().is_idle());
}

#[test]
fn alt_drag_measures_instead_of_snapping() {
    let mut s = pair();
    s.pointer_down(50.0, 50.0, PointerButton::Primary, Modifiers::ALT);
    s.pointer_move(80.0, 50.0, Modifiers::ALT);
    let overlay = s.overlay();
    assert!(overlay.guides.is_empty());
    assert_eq!(overlay.measurements.len(), 1);
    assert_eq!(overlay.measurements[0].distance, 70.0);
    s.pointer_move(147.0, 50.0, Modifiers::ALT);
    s.pointer_up(147.0, 50.0, Modifiers::ALT);
    assert_eq!(bounds(&s, "ix_A").0, 97.0);
}

#[test]
fn shift_drag_locks_to_dominant_axis() {
    let mut s = session(vec![rect("ix_solo", 0.0, 0.0, 50.0, 50.0)]);
    drag(&mut s, (25.0, 25.0), (325.0, 40.0), Modifiers::SHIFT);
    assert_eq!(bounds(&s, "ix_solo"), (300.0, 0.0, 50.0, 50.0));
}

#[test]
fn click_without_movement_leaves_no_history() {
    let mut s = pair();
    drag(&mut s, (50.0, 50.0), (50.0, 50.0), Modifiers::NONE);
    assert!(!s.can_undo());
    assert_eq!(s.selection(), &[id("ix_A")]);
}

#[test]
fn a_whole_drag_is_one_undo_step() {
    let mut s = pair();
    s.pointer_down(50.0, 50.0, PointerButton::Primary, Modifiers::NONE);
    for x in [60.0, 70.0, 80.0, 90.0] {
        s.pointer_move(x, 50.0, Modifiers::NONE);
        s.on_animation_frame();
    }
    s.pointer_up(90.0, 50.0, Modifiers::NONE);
    assert_eq!(bounds(&s, "ix_A").0, 40.0);
    assert_eq!(s.history().undo_depth(), 1);
    s.undo();
    assert_eq!(bounds(&s, "ix_A").0, 0.0);
}

#[test]
fn moving_a_multi_selection_moves_every_member() {
    let mut s = pair();
    s.set_selection(&[id("ix_A"), id("ix_B")]);
    drag(&mut s, (50.0, 50.0), (50.0, 350.0), Modifiers::NONE);
    assert_eq!(bounds(&s, "ix_A").1, 300.0);
    assert_eq!(bounds(&s, "ix_B").1, 300.0);
    assert_eq!(s.selection(), &[id("ix_A"), id("ix_B")]);
}

// ─── Marquee ────────────────────────────────────────────────────────────

#[test]
fn marquee_selects_fully_contained_only() {
    let mut s = session(vec![
        rect("ix_m1", 10.0, 10.0, 20.0, 20.0),
        rect("ix_m2", 50.0, 10.0, 20.0, 20.0),
        rect("ix_m3", 60.0, 25.0, 40.0, 40.0),
    ]);
    drag(&mut s, (5.0, 5.0), (75.0, 35.0), Modifiers::NONE);
    assert_eq!(s.selection(), &[id("ix_m1"), id("ix_m2")]);
    assert!(s.overlay().marquee.is_none());
    assert!(!s.can_undo());
}

#[test]
fn shift_marquee_adds_and_tiny_marquee_is_a_click() {
    let mut s = session(vec![rect("ix_s1", 0.0, 0.0, 10.0, 10.0), rect("ix_s2", 100.0, 100.0, 10.0, 10.0)]);
    s.set_selection(&[id("ix_s1")]);
    drag(&mut s, (90.0, 90.0), (120.0, 120.0), Modifiers::SHIFT);
    assert_eq!(s.selection(), &[id("ix_s1"), id("ix_s2")]);

    drag(&mut s, (300.0, 300.0), (301.0, 301.5), Modifiers::NONE);
    assert!(s.selection().is_empty());
}

// ─── Pan & zoom ─────────────────────────────────────────────────────────

#[test]
fn space_or_middle_button_pans_empty_canvas() {
    let mut s = pair();
    s.key_down(" ", Modifiers::NONE);
    drag(&mut s, (500.0, 500.0), (520.0, 490.0), Modifiers::NONE);
    assert_eq!((s.viewport().offset_x, s.viewport().offset_y), (20.0, -10.0));
    s.key_up(" ");

    s.pointer_down(50.0, 50.0, PointerButton::Middle, Modifiers::NONE);
    assert_eq!(s.gesture().name(), "pan");
    s.pointer_up(60.0, 50.0, Modifiers::NONE);
    assert_eq!(s.viewport().offset_x, 30.0);
    assert_eq!(bounds(&s, "ix_A").0, 0.0);
    assert!(!s.can_undo());
}

#[test]
fn wheel_zoom_keeps_the_cursor_point_fixed() {
    let mut s = pair();
    let before = s.viewport().screen_to_world(250.0, 120.0);
    s.wheel(-3.0, 250.0, 120.0, false);
    let after = s.viewport().screen_to_world(250.0, 120.0);
    assert!((before.0 - after.0).abs() < 1e-3 && (before.1 - after.1).abs() < 1e-3);
    assert!(s.viewport().zoom > 1.0);
}

// ─── Resize ─────────────────────────────────────────────────────────────

#[test]
fn se_handle_resizes_with_whole_pixels() {
    let mut s = session(vec![rect("ix_r", 100.0, 100.0, 100.0, 50.0)]);
    s.set_selection(&[id("ix_r")]);
    drag(&mut s, (200.0, 150.0), (230.4, 170.6), Modifiers::NONE);
    assert_eq!(bounds(&s, "ix_r"), (100.0, 100.0, 130.0, 71.0));
    assert_eq!(s.history().undo_depth(), 1);
}

#[test]
fn nw_handle_moves_origin_and_respects_min_size() {
    let mut s = session(vec![rect("ix_min", 100.0, 100.0, 100.0, 100.0)]);
    s.set_selection(&[id("ix_min")]);
    drag(&mut s, (100.0, 100.0), (400.0, 150.0), Modifiers::NONE);
    assert_eq!(bounds(&s, "ix_min"), (184.0, 150.0, 16.0, 50.0));
}

#[test]
fn shift_corner_resize_keeps_aspect_ratio() {
    let mut s = session(vec![rect("ix_ar", 0.0, 0.0, 200.0, 100.0)]);
    s.set_selection(&[id("ix_ar")]);
    // Dominant axis is x: width 300 → height 150.
    drag(&mut s, (200.0, 100.0), (300.0, 110.0), Modifiers::SHIFT);
    assert_eq!(bounds(&s, "ix_ar"), (0.0, 0.0, 300.0, 150.0));
}

#[test]
fn shift_edge_resize_rederives_other_axis_about_center() {
    let mut s = session(vec![rect("ix_edge", 0.0, 0.0, 200.0, 100.0)]);
    s.set_selection(&[id("ix_edge")]);
    // East handle at (200, 50): width 240 → height 120 centered on y = 50.
    drag(&mut s, (200.0, 50.0), (240.0, 50.0), Modifiers::SHIFT);
    assert_eq!(bounds(&s, "ix_edge"), (0.0, -10.0, 240.0, 120.0));
}

#[test]
fn resize_edge_snaps_to_neighbor() {
    let mut s = session(vec![
        rect("ix_grow", 0.0, 0.0, 100.0, 100.0),
        rect("ix_wall", 200.0, 150.0, 50.0, 50.0),
    ]);
    s.set_selection(&[id("ix_grow")]);
    // East handle dragged to x = 197: snaps to the wall's left edge.
    drag(&mut s, (100.0, 50.0), (197.0, 50.0), Modifiers::NONE);
    assert_eq!(bounds(&s, "ix_grow").2, 200.0);
}

#[test]
fn resizing_a_frame_relays_out_constrained_children() {
    let frame = Element::new(id("ix_frame"), ElementKind::Frame, 0.0, 0.0, 200.0, 200.0);
    let mut bar = Element::new(id("ix_bar"), ElementKind::Rect, 10.0, 10.0, 180.0, 20.0);
    bar.constraints = Constraints {
        horizontal: HorizontalConstraint::Both,
        vertical: VerticalConstraint::Top,
    };
    let mut s = session(vec![ElementNode::with_children(frame, vec![ElementNode::leaf(bar)])]);
    s.set_selection(&[id("ix_frame")]);
    drag(&mut s, (200.0, 100.0), (300.0, 100.0), Modifiers::NONE);
    assert_eq!(bounds(&s, "ix_frame").2, 300.0);
    assert_eq!(bounds(&s, "ix_bar"), (10.0, 10.0, 280.0, 20.0));
}

#[test]
fn undo_mid_gesture_cancels_it() {
    let mut s = pair();
    s.pointer_down(50.0, 50.0, PointerButton::Primary, Modifiers::NONE);
    s.pointer_move(70.0, 50.0, Modifiers::NONE);
    assert!(s.undo());
    assert!(s.gesture().is_idle());
    assert!(!s.needs_frame());
    assert_eq!(bounds(&s, "ix_A").0, 0.0);
}
