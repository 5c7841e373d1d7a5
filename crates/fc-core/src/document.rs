//! A whole document: the scene tree plus the master registry.
//!
//! Structural edits that mint ids go through `Document` so fresh ids are
//! unique across both the tree and the masters.

use crate::error::{EditError, EditResult};
use crate::id::NodeId;
use crate::model::*;
use crate::scene::SceneGraph;
use std::collections::{BTreeMap, HashSet};

/// Template subtrees referenced by `Instance` elements, keyed by master id.
pub type Masters = BTreeMap<NodeId, ElementNode>;

/// Offset applied by duplicate and paste.
pub const DUPLICATE_OFFSET: f32 = 20.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub scene: SceneGraph,
    pub masters: Masters,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a document, checking that ids are unique across the tree
    /// and every master subtree, and that each master is keyed by its own
    /// root id.
    pub fn from_parts(elements: Vec<ElementNode>, masters: Masters) -> EditResult<Self> {
        let scene = SceneGraph::from_nodes(elements)?;
        let mut seen = HashSet::new();
        for (&key, master) in &masters {
            if key != master.element.id {
                return Err(EditError::MasterKeyMismatch {
                    key,
                    id: master.element.id,
                });
            }
            let mut clash = None;
            master.walk(&mut |el| {
                if clash.is_none() && (scene.contains(el.id) || !seen.insert(el.id)) {
                    clash = Some(el.id);
                }
            });
            if let Some(id) = clash {
                return Err(EditError::DuplicateId(id));
            }
        }
        Ok(Self { scene, masters })
    }

    /// A fresh id not used by any element or master.
    pub fn fresh_id(&self, prefix: &str) -> NodeId {
        let masters = &self.masters;
        self.scene
            .fresh_id(prefix, &|id| master_uses(masters, id))
    }

    /// Insert `node` with every id replaced by a fresh one.
    pub fn insert_fresh(
        &mut self,
        parent: Option<NodeId>,
        index: Option<usize>,
        mut node: ElementNode,
    ) -> EditResult<NodeId> {
        let masters = &self.masters;
        self.scene
            .reassign_fresh_ids(&mut node, &|id| master_uses(masters, id));
        self.scene.insert(parent, index, node)
    }

    pub fn duplicate(&mut self, id: NodeId) -> Option<NodeId> {
        self.duplicate_by(id, DUPLICATE_OFFSET, DUPLICATE_OFFSET)
    }

    pub fn duplicate_by(&mut self, id: NodeId, dx: f32, dy: f32) -> Option<NodeId> {
        let masters = &self.masters;
        self.scene
            .duplicate(id, dx, dy, &|id| master_uses(masters, id))
    }

    pub fn group(&mut self, ids: &[NodeId]) -> EditResult<NodeId> {
        let masters = &self.masters;
        self.scene.group(ids, &|id| master_uses(masters, id))
    }

    /// Copy the subtree at `id` into the master registry. The master's
    /// root sits at the origin; the original element is left in place.
    pub fn promote_to_master(&mut self, id: NodeId) -> EditResult<NodeId> {
        let mut node = self.scene.extract(id).ok_or(EditError::NotFound(id))?;
        let masters = &self.masters;
        self.scene
            .reassign_fresh_ids(&mut node, &|id| master_uses(masters, id));
        let master_id = self.fresh_id("master");
        node.element.id = master_id;
        node.element.x = 0.0;
        node.element.y = 0.0;
        self.masters.insert(master_id, node);
        log::debug!("promoted {id} to master {master_id}");
        Ok(master_id)
    }

    /// Place an instance of a master at `(x, y)` inside `parent`.
    ///
    /// The instance copies the master's appearance and a deep clone of its
    /// children at creation time. Later edits to the master are not
    /// propagated.
    pub fn instantiate(
        &mut self,
        master_id: NodeId,
        parent: Option<NodeId>,
        x: f32,
        y: f32,
    ) -> EditResult<NodeId> {
        let master = self
            .masters
            .get(&master_id)
            .ok_or(EditError::MasterNotFound(master_id))?;
        let mut node = master.clone();
        node.element.kind = ElementKind::Instance { master_id };
        node.element.x = x;
        node.element.y = y;

        let masters = &self.masters;
        self.scene
            .reassign_fresh_ids(&mut node, &|id| master_uses(masters, id));
        self.scene.insert(parent, None, node)
    }
}

fn master_uses(masters: &Masters, id: NodeId) -> bool {
    masters.values().any(|m| {
        let mut hit = false;
        m.walk(&mut |el| hit |= el.id == id);
        hit
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card() -> ElementNode {
        ElementNode::with_children(
            Element::new(NodeId::intern("doc_card"), ElementKind::Frame, 40.0, 40.0, 200.0, 120.0)
                .with_fill("#FFFFFF"),
            vec![ElementNode::leaf(Element::new(
                NodeId::intern("doc_title"),
                ElementKind::text("Title"),
                16.0,
                16.0,
                120.0,
                20.0,
            ))],
        )
    }

    #[test]
    fn instances_are_cloned_on_create() {
        let mut doc = Document::from_parts(vec![card()], Masters::new()).unwrap();
        let master = doc.promote_to_master(NodeId::intern("doc_card")).unwrap();
        assert!(doc.scene.contains(NodeId::intern("doc_card")));

        let inst = doc.instantiate(master, None, 300.0, 0.0).unwrap();
        let placed = doc.scene.extract(inst).unwrap();
        assert_eq!(placed.element.kind, ElementKind::Instance { master_id: master });
        assert_eq!(placed.element.fill.as_deref(), Some("#FFFFFF"));
        assert_eq!((placed.element.x, placed.element.y), (300.0, 0.0));
        assert_eq!(placed.children.len(), 1);

        // Editing the master afterwards leaves the instance alone.
        doc.masters.get_mut(&master).unwrap().children.clear();
        assert_eq!(doc.scene.extract(inst).unwrap().children.len(), 1);
    }

    #[test]
    fn unknown_master_is_an_error() {
        let mut doc = Document::new();
        let missing = NodeId::intern("doc_missing_master");
        assert!(matches!(
            doc.instantiate(missing, None, 0.0, 0.0),
            Err(EditError::MasterNotFound(_))
        ));
        assert!(doc.scene.is_empty());
    }

    #[test]
    fn fresh_ids_avoid_master_ids() {
        let mut doc = Document::from_parts(vec![card()], Masters::new()).unwrap();
        let master = doc.promote_to_master(NodeId::intern("doc_card")).unwrap();
        let fresh = doc.fresh_id("master");
        assert_ne!(fresh, master);
        assert!(!doc.scene.contains(fresh));
    }
}
