//! Dropped or picked image files.
//!
//! The host hands over raw bytes; the element is only inserted once the
//! natural size is known, which happens in `process_images` (the async
//! boundary on the web, a plain call elsewhere). Undecodable files still
//! produce an element at a placeholder size and an info notice; the
//! renderer keeps drawing the placeholder for it.
//!
//! `image_src` is an asset key, normally the dropped file name, and the
//! bytes live in the session's `ImageAssets`, not in the document. Saved
//! JSON therefore references images by name only: whoever stores the
//! document ships the files alongside it (`fc-export png --assets <dir>`
//! resolves them from that directory).

use crate::notice::Notice;
use crate::session::EditorSession;
use fc_core::id::NodeId;
use fc_core::model::{Element, ElementKind, ElementNode, ImageFit};
use fc_render::image_dimensions;

/// One queued image: bytes, file name, and the world point it was
/// dropped at (the element is centered there).
#[derive(Debug, Clone)]
pub struct ImageDrop {
    pub bytes: Vec<u8>,
    pub name: String,
    pub at: (f32, f32),
}

impl EditorSession {
    pub fn drop_image(&mut self, bytes: Vec<u8>, name: impl Into<String>, at: (f32, f32)) {
        let name = name.into();
        log::debug!("queued image {name} ({} bytes)", bytes.len());
        self.image_queue.push_back(ImageDrop { bytes, name, at });
    }

    pub fn has_pending_images(&self) -> bool {
        !self.image_queue.is_empty()
    }

    /// Insert an element for every queued image. Returns the new ids.
    pub fn process_images(&mut self) -> Vec<NodeId> {
        let mut inserted = Vec::new();
        while let Some(drop) = self.image_queue.pop_front() {
            let (w, h) = match image_dimensions(&drop.bytes) {
                Ok((w, h)) => (w as f32, h as f32),
                Err(err) => {
                    log::warn!("{}: {err}; inserting placeholder", drop.name);
                    self.notices.push(Notice::info(
                        "notice.image.placeholder",
                        format!("{} could not be decoded; showing a placeholder", drop.name),
                    ));
                    let side = self.config.placeholder_size;
                    (side, side)
                }
            };
            let src = self.unique_asset_key(&drop.name);
            let placeholder = NodeId::intern("image");
            let mut el = Element::new(
                placeholder,
                ElementKind::Image {
                    image_src: src.clone(),
                    image_fit: ImageFit::default(),
                },
                drop.at.0 - w / 2.0,
                drop.at.1 - h / 2.0,
                w,
                h,
            );
            el.name = drop.name.clone();
            self.assets.insert(src, drop.bytes);
            if let Some(id) = self.add(None, ElementNode::leaf(el)) {
                inserted.push(id);
            }
        }
        inserted
    }

    /// `name`, or `name-2`, `name-3`, … if already taken.
    fn unique_asset_key(&self, name: &str) -> String {
        if !self.assets.contains_key(name) {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name}-{n}"))
            .find(|key| !self.assets.contains_key(key))
            .unwrap_or_else(|| name.to_string())
    }
}
