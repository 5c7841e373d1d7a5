//! Per-frame coalescing of element patches.
//!
//! Pointer moves arrive faster than frames. Each move stages a patch per
//! element; staging the same element again folds into the existing patch.
//! The session writes everything staged in one pass per animation frame.

use fc_core::id::NodeId;
use fc_core::scene::{ElementPatch, SceneGraph};

#[derive(Debug, Default)]
pub struct PendingUpdates {
    patches: Vec<(NodeId, ElementPatch)>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, id: NodeId, patch: ElementPatch) {
        match self.patches.iter_mut().find(|(pid, _)| *pid == id) {
            Some((_, existing)) => existing.merge(patch),
            None => self.patches.push((id, patch)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn clear(&mut self) {
        self.patches.clear();
    }

    /// Apply and drain everything staged. Returns how many elements were
    /// written; stale ids are skipped.
    pub fn flush(&mut self, scene: &mut SceneGraph) -> usize {
        let written = self
            .patches
            .drain(..)
            .filter(|(id, patch)| scene.update(*id, patch))
            .count();
        if written > 0 {
            log::trace!("flushed {written} pending update(s)");
        }
        written
    }
}
