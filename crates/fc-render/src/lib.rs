//! CPU raster backend for the FC canvas.
//!
//! Draws a [`fc_core::Document`] through a [`fc_core::Viewport`] into a
//! tiny-skia pixmap, runs element effects on offscreen layers, and paints
//! the editor overlay on top.

pub mod blur;
pub mod cache;
pub mod config;
pub mod effects;
pub mod error;
pub mod hit;
pub mod images;
pub mod overlay;
pub mod paint;
pub mod renderer;

pub use cache::{EffectCache, EffectKey};
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use hit::{element_contains, hit_test};
pub use images::{ImageAssets, ImageCache, image_dimensions};
pub use overlay::{Overlay, ResizeHandle, size_label};
pub use renderer::Renderer;

/// Convert a premultiplied pixmap to straight-alpha RGBA bytes, the layout
/// canvas `ImageData` and PNG encoders expect.
pub fn to_straight_rgba(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
