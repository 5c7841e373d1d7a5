//! Integration tests: history through the editor session.
//!
//! Every mutating operation snapshots before it changes anything, so
//! undoing N operations must land exactly on the starting state.

use fc_core::*;
use fc_editor::{EditorConfig, EditorSession, Modifiers, Snapshot};
use pretty_assertions::assert_eq;

const CMD: Modifiers = Modifiers {
    meta: true,
    ..Modifiers::NONE
};

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

/// Frame F (0,0,320,568) holding rect R (30,150,260,40).
fn screen_session() -> EditorSession {
    let frame = Element::new(id("ur_F"), ElementKind::Frame, 0.0, 0.0, 320.0, 568.0).with_fill("#FFFFFF");
    let rect = Element::new(id("ur_R"), ElementKind::Rect, 30.0, 150.0, 260.0, 40.0).with_fill("#00896E");
    let doc = Document::from_parts(
        vec![ElementNode::with_children(frame, vec![ElementNode::leaf(rect)])],
        Masters::new(),
    )
    .unwrap();
    EditorSession::with_document(doc, EditorConfig::default())
}

fn state(s: &EditorSession) -> Snapshot {
    Snapshot {
        document: s.document().clone(),
        selection: s.selection().to_vec(),
    }
}

// ─── Scenario: duplicate then undo ──────────────────────────────────────

#[test]
fn cmd_d_duplicates_offset_and_undo_removes_copy() {
    let mut s = screen_session();
    s.set_selection(&[id("ur_R")]);

    assert!(s.key_down("d", CMD));
    let copy = s.selection()[0];
    assert_ne!(copy, id("ur_R"));
    assert_eq!(s.selection().len(), 1);

    let el = s.document().scene.get(copy).unwrap();
    assert_eq!((el.x, el.y, el.width, el.height), (50.0, 170.0, 260.0, 40.0));
    assert_eq!(s.document().scene.child_ids(id("ur_F")), vec![id("ur_R"), copy]);

    assert!(s.undo());
    assert_eq!(s.document().scene.child_ids(id("ur_F")), vec![id("ur_R")]);
    assert_eq!(s.selection(), &[id("ur_R")]);
    assert!(!s.document().scene.contains(copy));
}

// ─── Inverse law ────────────────────────────────────────────────────────

#[test]
fn undo_n_times_returns_to_start_and_redo_n_times_returns_to_end() {
    let mut s = screen_session();
    s.set_selection(&[id("ur_R")]);
    let start = state(&s);

    // Five mutating operations of different kinds.
    let copy = s.duplicate_selection()[0];
    s.set_selection(&[id("ur_R"), copy]);
    let group = s.group_selection().unwrap();
    assert!(s.update_element(
        id("ur_F"),
        &ElementPatch {
            width: Some(400.0),
            ..Default::default()
        }
    ));
    s.set_selection(&[group]);
    assert!(s.nudge(5.0, -5.0));
    let master = s.promote_selection_to_master().unwrap();
    let end = state(&s);
    assert!(end.document.masters.contains_key(&master));
    assert_eq!(s.history().undo_depth(), 5);

    for _ in 0..5 {
        assert!(s.undo());
    }
    assert!(!s.can_undo());
    assert_eq!(state(&s), start);

    for _ in 0..5 {
        assert!(s.redo());
    }
    assert!(!s.can_redo());
    assert_eq!(state(&s), end);
}

#[test]
fn new_edit_after_undo_discards_redo() {
    let mut s = screen_session();
    s.set_selection(&[id("ur_R")]);
    s.nudge(1.0, 0.0);
    s.undo();
    assert!(s.can_redo());
    s.nudge(0.0, 1.0);
    assert!(!s.can_redo());
}

#[test]
fn history_is_capped() {
    let mut s = EditorSession::with_document(
        screen_session().document().clone(),
        EditorConfig {
            history_limit: 3,
            ..EditorConfig::default()
        },
    );
    s.set_selection(&[id("ur_R")]);
    for _ in 0..10 {
        s.nudge(1.0, 0.0);
    }
    assert_eq!(s.history().undo_depth(), 3);
    while s.undo() {}
    assert_eq!(s.document().scene.get(id("ur_R")).unwrap().x, 37.0);
}

#[test]
fn loading_a_document_resets_history() {
    let mut s = screen_session();
    s.set_selection(&[id("ur_R")]);
    s.nudge(1.0, 1.0);
    let json = s.export_json().unwrap();
    s.load_json(&json).unwrap();
    assert!(!s.can_undo());
    assert!(s.selection().is_empty());
    assert_eq!(s.document().scene.get(id("ur_R")).unwrap().x, 31.0);

    assert!(s.load_json("{ not json").is_err());
    assert_eq!(s.take_notices()[0].key, "notice.import.invalid");
}
