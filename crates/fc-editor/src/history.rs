//! Undo/redo over whole-document snapshots.
//!
//! Each entry captures the document (scene + masters) and the selection.
//! Drag and resize gestures push once, lazily, on their first real delta,
//! so a gesture is one undo step no matter how many frames it spans.

use fc_core::document::Document;
use fc_core::id::NodeId;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub document: Document,
    pub selection: Vec<NodeId>,
}

pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
    /// Set while a snapshot is being restored; pushes are ignored.
    restoring: bool,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(limit.min(128)),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            restoring: false,
        }
    }

    /// Record `before` as the state to return to. Clears redo. Returns
    /// `false` when ignored because a restore is in progress.
    pub fn push(&mut self, before: Snapshot) -> bool {
        if self.restoring {
            log::trace!("history push ignored during restore");
            return false;
        }
        self.undo_stack.push_back(before);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        log::debug!("history push (depth {})", self.undo_stack.len());
        true
    }

    /// Pop the last snapshot, stashing `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        log::debug!("undo (depth {})", self.undo_stack.len());
        Some(prev)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        log::debug!("redo (depth {})", self.undo_stack.len());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub(crate) fn set_restoring(&mut self, restoring: bool) {
        self.restoring = restoring;
    }
}
