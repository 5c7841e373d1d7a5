//! Integration tests: JSON round-trip and SVG export of a fixture document.

use fc_core::*;
use pretty_assertions::assert_eq;

const PHONE: &str = include_str!("fixtures/phone.json");

#[test]
fn json_round_trip_preserves_document() {
    let doc = Document::from_json(PHONE).unwrap();
    let json = doc.to_json().unwrap();
    let again = Document::from_json(&json).unwrap();
    assert_eq!(again, doc);
    // Stable output: encoding twice gives the same text.
    assert_eq!(again.to_json().unwrap(), json);
}

#[test]
fn json_keeps_camel_case_and_type_tags() {
    let doc = Document::from_json(PHONE).unwrap();
    let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    let screen = &value["elements"][0];
    assert_eq!(screen["type"], "frame");
    assert_eq!(screen["children"][1]["fontSize"], 20.0);
    assert_eq!(screen["children"][3]["fillGradient"]["type"], "radial");
    assert_eq!(screen["children"][2]["effects"][0]["type"], "dropShadow");
    assert!(value["masters"].as_object().unwrap().is_empty());
}

#[test]
fn svg_export_covers_the_first_frame() {
    let doc = Document::from_json(PHONE).unwrap();
    let svg = export_svg(&doc).unwrap();

    assert!(svg.contains("viewBox=\"0 0 320 568\""));
    assert!(svg.contains("<radialGradient id=\"grad-avatar\""));
    assert!(svg.contains("<filter id=\"fx-button\""));
    assert!(svg.contains("<tspan x=\"0\" dy=\"20\">Inbox</tspan>"));
    assert!(svg.contains(">Today</tspan></text>"));
    assert!(svg.contains("stroke=\"#00896E\" stroke-width=\"1\""));
    // `note` is a root rect outside the frame.
    assert!(!svg.contains("id=\"note\""));
}

#[test]
fn svg_export_without_frame_reports_notice_key() {
    let doc = Document::from_json(
        r#"{ "elements": [ { "id": "ex_r", "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1 } ] }"#,
    )
    .unwrap();
    let err = export_svg(&doc).unwrap_err();
    assert_eq!(err.notice_key(), "notice.export.noFrame");
}
