use std::path::PathBuf;
use std::process::Command;

const DOC: &str = r##"{
  "elements": [
    { "id": "smoke_frame", "type": "frame", "x": 0, "y": 0, "width": 64, "height": 48,
      "fill": "#FF3366",
      "children": [
        { "id": "smoke_dot", "type": "circle", "x": 8, "y": 8, "width": 16, "height": 16,
          "fill": "#FFFFFF" }
      ] }
  ],
  "masters": {}
}"##;

fn workdir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    let doc = dir.join("doc.json");
    std::fs::write(&doc, DOC).unwrap();
    dir
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fc-export"))
}

#[test]
fn png_matches_frame_size() {
    let dir = workdir("png");
    let out = dir.join("out.png");
    let _ = std::fs::remove_file(&out);

    let status = bin()
        .args(["png", "--zoom", "2", "--in"])
        .arg(dir.join("doc.json"))
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (128, 96));
    assert_eq!(img.get_pixel(100, 80).0, [0xFF, 0x33, 0x66, 0xFF]);
}

#[test]
fn svg_goes_to_stdout() {
    let dir = workdir("svg");
    let output = bin().args(["svg", "--in"]).arg(dir.join("doc.json")).output().unwrap();
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("viewBox=\"0 0 64 48\""));
}

#[test]
fn invalid_document_fails() {
    let dir = workdir("invalid");
    let bad = dir.join("bad.json");
    std::fs::write(&bad, "{ nope").unwrap();
    let output = bin().args(["json", "--in"]).arg(&bad).output().unwrap();
    assert!(!output.status.success());
}
