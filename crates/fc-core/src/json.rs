//! JSON document format.
//!
//! `{ "elements": [...], "masters": { "<id>": {...} } }`, camelCase keys,
//! a `type` tag on every element and nested `children` arrays.

use crate::document::{Document, Masters};
use crate::error::EditResult;
use crate::model::ElementNode;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct DocumentRef<'a> {
    elements: Vec<ElementNode>,
    masters: &'a Masters,
}

#[derive(Deserialize)]
struct DocumentOwned {
    #[serde(default)]
    elements: Vec<ElementNode>,
    #[serde(default)]
    masters: Masters,
}

impl Document {
    /// Pretty-printed JSON with full fidelity.
    pub fn to_json(&self) -> EditResult<String> {
        let doc = DocumentRef {
            elements: self.scene.to_nodes(),
            masters: &self.masters,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Parse a document, rebuilding the arena. Duplicate ids are rejected.
    pub fn from_json(input: &str) -> EditResult<Self> {
        let DocumentOwned { elements, masters } = serde_json::from_str(input)?;
        let doc = Document::from_parts(elements, masters);
        if let Err(err) = &doc {
            log::warn!("rejected document: {err}");
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_tagged_elements() {
        let input = r##"{
            "elements": [
                {
                    "id": "js_frame", "type": "frame", "name": "Phone",
                    "x": 0, "y": 0, "width": 320, "height": 568, "fill": "#FFFFFF",
                    "children": [
                        { "id": "js_text", "type": "text", "text": "Hello\nWorld",
                          "x": 16, "y": 16, "width": 200, "height": 40, "fontSize": 18 },
                        { "id": "js_img", "type": "image", "imageSrc": "data:,",
                          "x": 16, "y": 80, "width": 100, "height": 100,
                          "constraints": { "horizontal": "both", "vertical": "top" },
                          "effects": [
                              { "id": "e1", "type": "dropShadow", "x": 0, "y": 4,
                                "blur": 8, "color": "#000000", "opacity": 0.25 }
                          ] }
                    ]
                }
            ],
            "masters": {}
        }"##;
        let doc = Document::from_json(input).unwrap();
        let text = doc.scene.get(NodeId::intern("js_text")).unwrap();
        match &text.kind {
            ElementKind::Text {
                text, font_size, ..
            } => {
                assert_eq!(text, "Hello\nWorld");
                assert_eq!(*font_size, 18.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
        let img = doc.scene.get(NodeId::intern("js_img")).unwrap();
        assert_eq!(img.constraints.horizontal, HorizontalConstraint::Both);
        assert_eq!(img.effects.len(), 1);
        assert!(img.effects[0].enabled);
        assert_eq!(img.opacity, 1.0);
    }

    #[test]
    fn json_roundtrip_is_lossless() {
        let mut frame = Element::new(
            NodeId::intern("jr_frame"),
            ElementKind::Frame,
            0.0,
            0.0,
            320.0,
            568.0,
        );
        frame.set_gradient(Gradient {
            kind: GradientKind::Radial,
            angle: None,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: "#FF0000".into(),
                    opacity: 1.0,
                },
                GradientStop {
                    offset: 1.0,
                    color: "#0000FF".into(),
                    opacity: 0.5,
                },
            ],
        });
        let mut doc = Document::from_parts(
            vec![ElementNode::with_children(
                frame,
                vec![ElementNode::leaf(Element::new(
                    NodeId::intern("jr_circle"),
                    ElementKind::Circle,
                    10.0,
                    10.0,
                    40.0,
                    40.0,
                ))],
            )],
            Masters::new(),
        )
        .unwrap();
        doc.promote_to_master(NodeId::intern("jr_circle")).unwrap();

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"fillGradient\""));
        assert!(json.contains("\"masters\""));
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let input = r#"{ "elements": [
            { "id": "jd_a", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 },
            { "id": "jd_a", "type": "circle", "x": 0, "y": 0, "width": 1, "height": 1 }
        ] }"#;
        assert!(matches!(
            Document::from_json(input),
            Err(crate::error::EditError::DuplicateId(_))
        ));
    }

    #[test]
    fn empty_ids_are_rejected() {
        let input = r#"{ "elements": [
            { "id": "", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 }
        ] }"#;
        let err = Document::from_json(input).unwrap_err();
        assert_eq!(err.notice_key(), "notice.import.invalid");
    }

    #[test]
    fn master_ids_must_be_unique_across_the_document() {
        use crate::error::EditError;

        let child_reuses_scene_id = r#"{
            "elements": [ { "id": "jm_a", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 } ],
            "masters": { "jm_m": { "id": "jm_m", "type": "frame", "x": 0, "y": 0, "width": 10, "height": 10,
                "children": [ { "id": "jm_a", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 } ] } }
        }"#;
        assert!(matches!(
            Document::from_json(child_reuses_scene_id),
            Err(EditError::DuplicateId(id)) if id.as_str() == "jm_a"
        ));

        let two_masters_share_a_child = r#"{
            "elements": [],
            "masters": {
                "jm_m1": { "id": "jm_m1", "type": "group", "x": 0, "y": 0, "width": 10, "height": 10,
                    "children": [ { "id": "jm_c", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 } ] },
                "jm_m2": { "id": "jm_m2", "type": "group", "x": 0, "y": 0, "width": 10, "height": 10,
                    "children": [ { "id": "jm_c", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 } ] }
            }
        }"#;
        assert!(matches!(
            Document::from_json(two_masters_share_a_child),
            Err(EditError::DuplicateId(_))
        ));

        let wrong_key = r#"{
            "elements": [],
            "masters": { "jm_key": { "id": "jm_other", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 } }
        }"#;
        let err = Document::from_json(wrong_key).unwrap_err();
        assert_eq!(err.notice_key(), "notice.import.masterKey");
    }
}
