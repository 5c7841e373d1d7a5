//! Bounded cache of composited effect layers.
//!
//! An element with effects is rendered offscreen and pushed through its
//! effect stages; the result is reused while the element's subtree looks
//! the same at the same zoom. Moving an element by whole pixels does not
//! invalidate its entry: the root position is left out of the hash and
//! only its sub-pixel phase is kept.

use fc_core::id::NodeId;
use fc_core::model::ElementNode;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use tiny_skia::Pixmap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectKey {
    pub id: NodeId,
    /// `round(zoom * 100)`.
    pub zoom_bucket: i32,
    pub visual_hash: u64,
    /// Fractional screen offset of the layer origin, in 1/16 px steps.
    pub phase: [u8; 2],
}

impl EffectKey {
    pub fn new(node: &ElementNode, zoom: f32) -> Self {
        Self {
            id: node.element.id,
            zoom_bucket: zoom_bucket(zoom),
            visual_hash: visual_hash(node),
            phase: [0, 0],
        }
    }

    /// Key the layer by where its screen-space origin falls within a pixel.
    pub fn at_phase(self, x: f32, y: f32) -> Self {
        Self {
            phase: [subpixel(x), subpixel(y)],
            ..self
        }
    }
}

fn subpixel(v: f32) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    ((v - v.floor()) * 16.0).round() as u8 % 16
}

pub fn zoom_bucket(zoom: f32) -> i32 {
    (zoom * 100.0).round() as i32
}

/// Hash of everything that affects how a subtree looks, ignoring where
/// the subtree root sits in its parent.
pub fn visual_hash(node: &ElementNode) -> u64 {
    let mut placed = node.clone();
    placed.element.x = 0.0;
    placed.element.y = 0.0;
    let mut hasher = DefaultHasher::new();
    // Serialization of the model cannot fail; an empty string still hashes.
    serde_json::to_string(&placed)
        .unwrap_or_default()
        .hash(&mut hasher);
    hasher.finish()
}

/// A composited layer and where its top-left sits relative to the
/// element's own screen-space bounding box.
pub struct CachedLayer {
    pub pixmap: Pixmap,
    pub pad: i32,
}

pub struct EffectCache {
    capacity: usize,
    entries: HashMap<EffectKey, CachedLayer>,
    order: VecDeque<EffectKey>,
    hits: u64,
    misses: u64,
}

impl EffectCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &EffectKey) -> Option<&CachedLayer> {
        match self.entries.get(key) {
            Some(layer) => {
                self.hits += 1;
                log::trace!("effect cache hit for {}", key.id);
                Some(layer)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert, evicting the oldest entries beyond capacity.
    pub fn insert(&mut self, key: EffectKey, layer: CachedLayer) {
        if self.entries.insert(key, layer).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            let Some(old) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&old);
        }
    }

    /// Drop every entry for `id` (all zoom buckets and styles).
    pub fn invalidate(&mut self, id: NodeId) {
        self.entries.retain(|k, _| k.id != id);
        self.order.retain(|k| k.id != id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
