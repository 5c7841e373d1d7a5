//! Decoded image cache.
//!
//! Raw bytes arrive from the host (file drop / picker) keyed by the
//! element's `image_src`. Decoding happens once per source; a failed
//! decode is remembered and the element keeps its placeholder for good.

use crate::error::{RenderError, RenderResult};
use std::collections::HashMap;
use tiny_skia::{IntSize, Pixmap};

/// Undecoded image bytes by source key.
pub type ImageAssets = HashMap<String, Vec<u8>>;

#[derive(Default)]
pub struct ImageCache {
    decoded: HashMap<String, Option<Pixmap>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded pixmap for `src`, decoding from `assets` on first use.
    /// `None` means "draw the placeholder".
    pub fn resolve(&mut self, src: &str, assets: &ImageAssets) -> Option<&Pixmap> {
        if !self.decoded.contains_key(src) {
            // Not delivered yet: try again next frame.
            let bytes = assets.get(src)?;
            let pixmap = match decode_premultiplied(bytes) {
                Ok(p) => Some(p),
                Err(err) => {
                    log::warn!("image {src}: {err}; keeping placeholder");
                    None
                }
            };
            self.decoded.insert(src.to_string(), pixmap);
        }
        self.decoded.get(src).and_then(Option::as_ref)
    }

    pub fn is_failed(&self, src: &str) -> bool {
        matches!(self.decoded.get(src), Some(None))
    }

    pub fn forget(&mut self, src: &str) {
        self.decoded.remove(src);
    }
}

/// Natural pixel size of encoded image bytes.
pub fn image_dimensions(bytes: &[u8]) -> RenderResult<(u32, u32)> {
    let img = image::load_from_memory(bytes).map_err(|e| RenderError::ImageDecode(e.to_string()))?;
    Ok((img.width(), img.height()))
}

fn decode_premultiplied(bytes: &[u8]) -> RenderResult<Pixmap> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| RenderError::ImageDecode(e.to_string()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
    let size = IntSize::from_wh(w, h).ok_or(RenderError::PixmapCreation(w, h))?;
    Pixmap::from_vec(data, size).ok_or(RenderError::PixmapCreation(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_once_and_premultiplies() {
        let mut assets = ImageAssets::new();
        assets.insert("img_a".into(), png(3, 2));
        let mut cache = ImageCache::new();
        let p = cache.resolve("img_a", &assets).unwrap();
        assert_eq!((p.width(), p.height()), (3, 2));
        assert_eq!(&p.data()[..4], &[128, 0, 0, 128]);
        assert_eq!(image_dimensions(&png(7, 5)).unwrap(), (7, 5));
    }

    #[test]
    fn failures_stick_and_missing_assets_do_not() {
        let mut assets = ImageAssets::new();
        let mut cache = ImageCache::new();
        assert!(cache.resolve("late", &assets).is_none());
        assert!(!cache.is_failed("late"));

        assets.insert("broken".into(), b"not an image".to_vec());
        assert!(cache.resolve("broken", &assets).is_none());
        assert!(cache.is_failed("broken"));

        assets.insert("late".into(), png(1, 1));
        assert!(cache.resolve("late", &assets).is_some());
    }
}
