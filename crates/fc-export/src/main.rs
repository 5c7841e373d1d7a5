use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fc_core::geometry::Bounds;
use fc_core::model::ElementKind;
use fc_core::viewport::Viewport;
use fc_core::{Document, export_svg};
use fc_render::{ImageAssets, Overlay, RenderConfig, Renderer, to_straight_rgba};
use tiny_skia::Pixmap;

#[derive(Parser, Debug)]
#[command(name = "fc-export", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the first frame as SVG.
    Svg(TextArgs),
    /// Rasterize the first frame (or all content) as PNG.
    Png(PngArgs),
    /// Validate a document and re-emit it in canonical form.
    Json(TextArgs),
}

#[derive(Parser, Debug)]
struct TextArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PngArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Pixels per world unit.
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// Backdrop color behind the content.
    #[arg(long, default_value = "#FFFFFF")]
    background: String,

    /// Render the bounds of every root element instead of the first frame.
    #[arg(long, default_value_t = false)]
    whole: bool,

    /// Directory image sources are resolved against; defaults to the
    /// input's directory.
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Svg(args) => cmd_svg(args),
        Command::Png(args) => cmd_png(args),
        Command::Json(args) => cmd_json(args),
    }
}

fn cmd_svg(args: TextArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path)?;
    let svg = export_svg(&doc).context("export svg")?;
    write_text(args.out.as_deref(), &svg)
}

fn cmd_json(args: TextArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path)?;
    let json = doc.to_json()?;
    write_text(args.out.as_deref(), &json)
}

fn cmd_png(args: PngArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.zoom.is_finite() && args.zoom > 0.0,
        "zoom must be positive, got {}",
        args.zoom
    );
    let doc = load_document(&args.in_path)?;
    let assets_root = args
        .assets
        .clone()
        .unwrap_or_else(|| args.in_path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf());
    let assets = load_assets(&doc, &assets_root);

    let pixmap = rasterize(&doc, &assets, args.zoom, &args.background, args.whole)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &to_straight_rgba(&pixmap),
        pixmap.width(),
        pixmap.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_document(path: &Path) -> anyhow::Result<Document> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    Document::from_json(&text).with_context(|| format!("parse '{}'", path.display()))
}

fn write_text(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Read every image source the document references from `root`.
/// Missing files are skipped; the renderer draws placeholders for them.
fn load_assets(doc: &Document, root: &Path) -> ImageAssets {
    let mut assets = ImageAssets::new();
    for idx in doc.scene.preorder() {
        let ElementKind::Image { image_src, .. } = &doc.scene.element(idx).kind else {
            continue;
        };
        if assets.contains_key(image_src) {
            continue;
        }
        let path = root.join(image_src);
        match std::fs::read(&path) {
            Ok(bytes) => {
                assets.insert(image_src.clone(), bytes);
            }
            Err(err) => log::warn!("image '{}' not loaded: {err}", path.display()),
        }
    }
    assets
}

/// World rectangle to rasterize.
fn export_area(doc: &Document, whole: bool) -> Option<Bounds> {
    let scene = &doc.scene;
    if whole {
        return Bounds::union_all(scene.root_ids().into_iter().filter_map(|id| scene.world_aabb(id)));
    }
    scene
        .roots()
        .iter()
        .find(|&&idx| matches!(scene.element(idx).kind, ElementKind::Frame))
        .map(|&idx| scene.world_bounds_at(idx))
}

fn rasterize(
    doc: &Document,
    assets: &ImageAssets,
    zoom: f32,
    background: &str,
    whole: bool,
) -> anyhow::Result<Pixmap> {
    let area = export_area(doc, whole).with_context(|| {
        if whole {
            "document is empty".to_string()
        } else {
            "document has no root frame; try --whole".to_string()
        }
    })?;
    log::debug!(
        "rasterizing {}x{} at ({}, {}) zoom {zoom}",
        area.width,
        area.height,
        area.x,
        area.y
    );

    let viewport = Viewport {
        width: (area.width * zoom).ceil().max(1.0),
        height: (area.height * zoom).ceil().max(1.0),
        offset_x: -area.x * zoom,
        offset_y: -area.y * zoom,
        zoom,
    };
    let config = RenderConfig {
        background: background.to_string(),
        grid_min_screen_spacing: f32::INFINITY,
        ..RenderConfig::default()
    };
    let mut renderer = Renderer::new(config);
    Ok(renderer.render_to_pixmap(doc, &viewport, &Overlay::default(), assets)?)
}
