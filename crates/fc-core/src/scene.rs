//! The scene tree: an arena of `Element`s with ordered child lists.
//!
//! Nodes live in a `petgraph` `StableDiGraph` (edges go parent → child) so
//! indices stay valid across removals. Sibling order (z-order)
//! is kept explicitly per parent, plus an ordered list of root elements.
//! Every method leaves the arena consistent before returning; callers
//! that need an earlier state clone the whole graph (history snapshots).

use crate::error::{EditError, EditResult};
use crate::geometry::{Bounds, rotated_aabb};
use crate::id::NodeId;
use crate::layout::apply_constraints;
use crate::model::*;
use crate::spatial::WorldBounds;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::Deserialize;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Direction for one-step z-order changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    /// Toward the viewer (later in the sibling list).
    Forward,
    /// Away from the viewer (earlier in the sibling list).
    Backward,
}

/// A partial update of an element.
///
/// `None` leaves the field unchanged. Kind-specific fields (`text`,
/// `fontSize`, `imageFit`, ...) only apply to elements of that kind.
/// Unknown keys are rejected when deserializing. Successive patches for
/// the same element can be folded with `merge` (frame coalescing).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub fill: Option<String>,
    /// Wins over `fill` when both are given.
    pub fill_gradient: Option<Gradient>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f32>,
    pub opacity: Option<f32>,
    pub constraints: Option<Constraints>,
    /// Replaces the whole effect stack.
    pub effects: Option<SmallVec<[Effect; 2]>>,

    // Text
    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub font_weight: Option<u16>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f32>,

    // Image
    pub image_src: Option<String>,
    pub image_fit: Option<ImageFit>,
}

impl ElementPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn bounds(b: Bounds) -> Self {
        Self {
            x: Some(b.x),
            y: Some(b.y),
            width: Some(b.width),
            height: Some(b.height),
            ..Default::default()
        }
    }

    /// Fold `later` on top of `self`; later values win.
    pub fn merge(&mut self, later: ElementPatch) {
        macro_rules! take {
            ($($f:ident),*) => { $( if later.$f.is_some() { self.$f = later.$f; } )* };
        }
        // A later solid fill must not be shadowed by an earlier gradient.
        if later.fill.is_some() && later.fill_gradient.is_none() {
            self.fill_gradient = None;
        }
        take!(
            name,
            x,
            y,
            width,
            height,
            rotation,
            fill,
            fill_gradient,
            stroke,
            stroke_width,
            opacity,
            constraints,
            effects,
            text,
            font_size,
            font_family,
            font_weight,
            text_align,
            line_height,
            image_src,
            image_fit
        );
    }

    pub fn apply(&self, el: &mut Element) {
        if let Some(name) = &self.name {
            el.name = name.clone();
        }
        if let Some(v) = self.x {
            el.x = v;
        }
        if let Some(v) = self.y {
            el.y = v;
        }
        if let Some(v) = self.width {
            el.width = v;
        }
        if let Some(v) = self.height {
            el.height = v;
        }
        if let Some(v) = self.rotation {
            el.rotation = v;
        }
        if let Some(fill) = &self.fill {
            el.set_fill(fill.clone());
        }
        if let Some(gradient) = &self.fill_gradient {
            el.set_gradient(gradient.clone());
        }
        if let Some(stroke) = &self.stroke {
            el.stroke = Some(stroke.clone());
        }
        if let Some(v) = self.stroke_width {
            el.stroke_width = v;
        }
        if let Some(v) = self.opacity {
            el.opacity = v.clamp(0.0, 1.0);
        }
        if let Some(c) = self.constraints {
            el.constraints = c;
        }
        if let Some(effects) = &self.effects {
            el.effects = effects.clone();
        }

        match &mut el.kind {
            ElementKind::Text {
                text,
                font_size,
                font_family,
                font_weight,
                text_align,
                line_height,
            } => {
                if let Some(v) = &self.text {
                    *text = v.clone();
                }
                if let Some(v) = self.font_size {
                    *font_size = v;
                }
                if let Some(v) = &self.font_family {
                    *font_family = v.clone();
                }
                if let Some(v) = self.font_weight {
                    *font_weight = v;
                }
                if let Some(v) = self.text_align {
                    *text_align = v;
                }
                if let Some(v) = self.line_height {
                    *line_height = v;
                }
            }
            ElementKind::Image { image_src, image_fit } => {
                if let Some(v) = &self.image_src {
                    *image_src = v.clone();
                }
                if let Some(v) = self.image_fit {
                    *image_fit = v;
                }
            }
            ElementKind::Frame
            | ElementKind::Rect
            | ElementKind::Circle
            | ElementKind::Group
            | ElementKind::Instance { .. } => {}
        }
    }
}

/// The live scene tree.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    /// Element arena. Edges go parent → child.
    pub graph: StableDiGraph<Element, ()>,

    /// Top-level elements in z-order (first = bottom).
    roots: Vec<NodeIndex>,

    /// Children of each container in z-order.
    child_order: HashMap<NodeIndex, Vec<NodeIndex>>,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,
}

impl PartialEq for SceneGraph {
    /// Structural equality: same elements, same nesting, same order.
    fn eq(&self, other: &Self) -> bool {
        self.to_nodes() == other.to_nodes()
    }
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena from owned root nodes. Fails on duplicate ids.
    pub fn from_nodes(nodes: Vec<ElementNode>) -> EditResult<Self> {
        let mut scene = Self::new();
        for node in nodes {
            scene.insert(None, None, node)?;
        }
        Ok(scene)
    }

    /// Owned nested copy of the whole tree.
    pub fn to_nodes(&self) -> Vec<ElementNode> {
        self.roots.iter().map(|&idx| self.extract_at(idx)).collect()
    }

    pub fn len(&self) -> usize {
        self.id_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_index.is_empty()
    }

    // ─── Lookups ─────────────────────────────────────────────────────────

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Find an element by id, anywhere in the tree.
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Mutable access that bypasses constraint propagation and must not
    /// change the id. Prefer `update` / `update_with`.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.index_of(id).map(|idx| &mut self.graph[idx])
    }

    pub fn element(&self, idx: NodeIndex) -> &Element {
        &self.graph[idx]
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn root_ids(&self) -> Vec<NodeId> {
        self.roots.iter().map(|&i| self.graph[i].id).collect()
    }

    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order.get(&idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.index_of(id)
            .map(|idx| self.children(idx).iter().map(|&c| self.graph[c].id).collect())
            .unwrap_or_default()
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(idx, Direction::Incoming).next()
    }

    /// Parent id, or `None` when the element is top-level (or unknown).
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.index_of(id)?;
        self.parent(idx).map(|p| self.graph[p].id)
    }

    pub fn parent_element(&self, id: NodeId) -> Option<&Element> {
        let idx = self.index_of(id)?;
        self.parent(idx).map(|p| &self.graph[p])
    }

    /// Check if `ancestor_id` is a parent/grandparent/etc. of `descendant_id`.
    pub fn is_ancestor_of(&self, ancestor_id: NodeId, descendant_id: NodeId) -> bool {
        let (Some(anc), Some(mut cur)) = (self.index_of(ancestor_id), self.index_of(descendant_id))
        else {
            return false;
        };
        while let Some(p) = self.parent(cur) {
            if p == anc {
                return true;
            }
            cur = p;
        }
        false
    }

    /// Pre-order list of every element index in paint order.
    pub fn preorder(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.len());
        for &root in &self.roots {
            self.collect_preorder(root, &mut out);
        }
        out
    }

    fn collect_preorder(&self, idx: NodeIndex, out: &mut Vec<NodeIndex>) {
        out.push(idx);
        for &child in self.children(idx) {
            self.collect_preorder(child, out);
        }
    }

    fn siblings(&self, parent: Option<NodeIndex>) -> &[NodeIndex] {
        match parent {
            Some(p) => self.children(p),
            None => &self.roots,
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeIndex>) -> &mut Vec<NodeIndex> {
        match parent {
            Some(p) => self.child_order.entry(p).or_default(),
            None => &mut self.roots,
        }
    }

    // ─── World-space geometry ────────────────────────────────────────────

    /// Sum of ancestor offsets: the world position of `idx`'s local origin.
    pub fn world_origin(&self, idx: NodeIndex) -> (f32, f32) {
        let (mut x, mut y) = (0.0, 0.0);
        let mut cur = idx;
        while let Some(p) = self.parent(cur) {
            x += self.graph[p].x;
            y += self.graph[p].y;
            cur = p;
        }
        (x, y)
    }

    /// World-space `{x, y, width, height}` of an element (rotation ignored).
    pub fn world_bounds(&self, id: NodeId) -> Option<Bounds> {
        let idx = self.index_of(id)?;
        Some(self.world_bounds_at(idx))
    }

    pub fn world_bounds_at(&self, idx: NodeIndex) -> Bounds {
        let (ox, oy) = self.world_origin(idx);
        self.graph[idx].local_bounds().translate(ox, oy)
    }

    /// Rotation-aware world bounding box, used for selection and snapping.
    pub fn world_aabb(&self, id: NodeId) -> Option<Bounds> {
        let idx = self.index_of(id)?;
        Some(rotated_aabb(self.world_bounds_at(idx), self.graph[idx].rotation))
    }

    /// World bounds of every element except `exclude` and their descendants.
    pub fn world_bounds_excluding(&self, exclude: &HashSet<NodeId>) -> Vec<WorldBounds> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.collect_world_bounds(root, 0.0, 0.0, exclude, &mut out);
        }
        out
    }

    fn collect_world_bounds(
        &self,
        idx: NodeIndex,
        ox: f32,
        oy: f32,
        exclude: &HashSet<NodeId>,
        out: &mut Vec<WorldBounds>,
    ) {
        let el = &self.graph[idx];
        if exclude.contains(&el.id) {
            return;
        }
        let (x, y) = (ox + el.x, oy + el.y);
        out.push(WorldBounds {
            id: el.id,
            x,
            y,
            width: el.width,
            height: el.height,
            rotation: el.rotation,
        });
        for &child in self.children(idx) {
            self.collect_world_bounds(child, x, y, exclude, out);
        }
    }

    // ─── Insertion & extraction ──────────────────────────────────────────

    /// Generate an id with `prefix` that is free in this tree and not
    /// `reserved` elsewhere (e.g. by the master registry).
    pub fn fresh_id(&self, prefix: &str, reserved: &dyn Fn(NodeId) -> bool) -> NodeId {
        loop {
            let id = NodeId::with_prefix(prefix);
            if !self.contains(id) && !reserved(id) {
                return id;
            }
        }
    }

    /// Give every element in `node` a fresh id.
    pub fn reassign_fresh_ids(&self, node: &mut ElementNode, reserved: &dyn Fn(NodeId) -> bool) {
        node.reassign_ids(&mut |el| self.fresh_id(el.kind.type_name(), reserved));
    }

    /// Insert a subtree under `parent` (or at root level) at `index`
    /// (or on top). Nothing is inserted if any id is already taken.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        index: Option<usize>,
        node: ElementNode,
    ) -> EditResult<NodeId> {
        let parent_idx = match parent {
            Some(pid) => Some(self.index_of(pid).ok_or(EditError::NotFound(pid))?),
            None => None,
        };

        let mut seen = HashSet::new();
        let mut clash = None;
        node.walk(&mut |el| {
            if clash.is_none() && (self.contains(el.id) || !seen.insert(el.id)) {
                clash = Some(el.id);
            }
        });
        if let Some(id) = clash {
            return Err(EditError::DuplicateId(id));
        }

        let id = node.element.id;
        let idx = self.add_subtree(parent_idx, node);
        let siblings = self.siblings_mut(parent_idx);
        let at = index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, idx);
        Ok(id)
    }

    /// Adds nodes and edges; the caller places the root in a sibling list.
    fn add_subtree(&mut self, parent: Option<NodeIndex>, node: ElementNode) -> NodeIndex {
        let ElementNode { element, children } = node;
        let id = element.id;
        let idx = self.graph.add_node(element);
        self.id_index.insert(id, idx);
        if let Some(p) = parent {
            self.graph.add_edge(p, idx, ());
        }
        let mut order = Vec::with_capacity(children.len());
        for child in children {
            order.push(self.add_subtree(Some(idx), child));
        }
        if !order.is_empty() {
            self.child_order.insert(idx, order);
        }
        idx
    }

    /// Owned copy of the subtree rooted at `id`.
    pub fn extract(&self, id: NodeId) -> Option<ElementNode> {
        self.index_of(id).map(|idx| self.extract_at(idx))
    }

    fn extract_at(&self, idx: NodeIndex) -> ElementNode {
        ElementNode {
            element: self.graph[idx].clone(),
            children: self
                .children(idx)
                .iter()
                .map(|&c| self.extract_at(c))
                .collect(),
        }
    }

    // ─── Mutators ────────────────────────────────────────────────────────

    /// Apply a partial update. Returns false if `id` is unknown or the
    /// patch left the element as it was.
    pub fn update(&mut self, id: NodeId, patch: &ElementPatch) -> bool {
        self.update_with(id, |el| patch.apply(el))
    }

    /// Mutate an element in place. When a frame changes size, every
    /// direct child is re-laid-out through its constraints before this
    /// returns. Returns whether the element actually changed.
    pub fn update_with(&mut self, id: NodeId, f: impl FnOnce(&mut Element)) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let el = &mut self.graph[idx];
        let before = el.clone();
        let (old_w, old_h) = (el.width, el.height);
        f(el);
        el.id = id;
        if *el == before {
            return false;
        }
        let (new_w, new_h) = (el.width, el.height);

        let resized = old_w != new_w || old_h != new_h;
        if resized && matches!(el.kind, ElementKind::Frame) {
            let children = self.children(idx).to_vec();
            for child in children {
                apply_constraints(&mut self.graph[child], old_w, old_h, new_w, new_h);
            }
        }
        true
    }

    /// Remove an element and its whole subtree. Returns what was removed.
    pub fn delete(&mut self, id: NodeId) -> Option<ElementNode> {
        let idx = self.index_of(id)?;
        let removed = self.extract_at(idx);
        let parent = self.parent(idx);
        self.siblings_mut(parent).retain(|&i| i != idx);
        self.remove_subtree(idx);
        Some(removed)
    }

    fn remove_subtree(&mut self, idx: NodeIndex) {
        if let Some(children) = self.child_order.remove(&idx) {
            for child in children {
                self.remove_subtree(child);
            }
        }
        if let Some(el) = self.graph.remove_node(idx) {
            self.id_index.remove(&el.id);
        }
    }

    /// Deep-clone `id` with fresh ids, offset by `(dx, dy)`, and insert the
    /// copy right after the original. Returns the copy's id.
    pub fn duplicate(
        &mut self,
        id: NodeId,
        dx: f32,
        dy: f32,
        reserved: &dyn Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        let idx = self.index_of(id)?;
        let mut copy = self.extract_at(idx);
        self.reassign_fresh_ids(&mut copy, reserved);
        copy.element.x += dx;
        copy.element.y += dy;

        let parent = self.parent(idx);
        let pos = self.siblings(parent).iter().position(|&i| i == idx)?;
        let new_id = copy.element.id;
        let new_idx = self.add_subtree(parent, copy);
        self.siblings_mut(parent).insert(pos + 1, new_idx);
        Some(new_id)
    }

    /// Keep only ids with no ancestor in the set (unknown ids dropped,
    /// order preserved, duplicates removed).
    pub fn top_level_selection(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let set: HashSet<NodeIndex> = ids.iter().filter_map(|&id| self.index_of(id)).collect();
        let mut seen = HashSet::new();
        ids.iter()
            .copied()
            .filter(|&id| {
                let Some(idx) = self.index_of(id) else {
                    return false;
                };
                if !seen.insert(id) {
                    return false;
                }
                let mut cur = idx;
                while let Some(p) = self.parent(cur) {
                    if set.contains(&p) {
                        return false;
                    }
                    cur = p;
                }
                true
            })
            .collect()
    }

    /// Ids of all elements whose world bounds lie fully inside `rect`.
    pub fn collect_in_rect(&self, rect: Bounds) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&idx| {
                let el = &self.graph[idx];
                rect.contains(&rotated_aabb(self.world_bounds_at(idx), el.rotation))
            })
            .map(|idx| self.graph[idx].id)
            .collect()
    }

    /// Wrap sibling elements in a new group placed at their union box.
    ///
    /// Needs at least two top-level ids that share a parent; otherwise
    /// nothing changes and an error is returned.
    pub fn group(&mut self, ids: &[NodeId], reserved: &dyn Fn(NodeId) -> bool) -> EditResult<NodeId> {
        let top = self.top_level_selection(ids);
        if top.len() < 2 {
            return Err(EditError::TooFewToGroup);
        }
        let indices: Vec<NodeIndex> = top.iter().filter_map(|&id| self.index_of(id)).collect();
        let parent = self.parent(indices[0]);
        if indices.iter().any(|&i| self.parent(i) != parent) {
            return Err(EditError::MixedParents);
        }

        let siblings = self.siblings(parent).to_vec();
        let members: Vec<NodeIndex> = siblings
            .iter()
            .copied()
            .filter(|i| indices.contains(i))
            .collect();
        let Some(first_pos) = siblings.iter().position(|i| indices.contains(i)) else {
            return Err(EditError::TooFewToGroup);
        };
        let Some(union) = Bounds::union_all(members.iter().map(|&i| {
            let el = &self.graph[i];
            rotated_aabb(el.local_bounds(), el.rotation)
        })) else {
            return Err(EditError::TooFewToGroup);
        };

        let group_id = self.fresh_id("group", reserved);
        let group = Element::new(
            group_id,
            ElementKind::Group,
            union.x,
            union.y,
            union.width,
            union.height,
        );
        let group_idx = self.graph.add_node(group);
        self.id_index.insert(group_id, group_idx);
        if let Some(p) = parent {
            self.graph.add_edge(p, group_idx, ());
        }

        for &member in &members {
            if let Some(edge) = parent.and_then(|p| self.graph.find_edge(p, member)) {
                self.graph.remove_edge(edge);
            }
            self.graph.add_edge(group_idx, member, ());
            let el = &mut self.graph[member];
            el.x -= union.x;
            el.y -= union.y;
        }
        self.child_order.insert(group_idx, members.clone());

        let list = self.siblings_mut(parent);
        list.retain(|i| !members.contains(i));
        list.insert(first_pos.min(list.len()), group_idx);

        log::debug!("grouped {} elements into {group_id}", members.len());
        Ok(group_id)
    }

    /// Replace each selected group with its children, preserving their
    /// world positions. Returns the released children's ids.
    pub fn ungroup(&mut self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut released = Vec::new();
        for &id in ids {
            let Some(gidx) = self.index_of(id) else {
                continue;
            };
            if !matches!(self.graph[gidx].kind, ElementKind::Group) {
                continue;
            }
            let (gx, gy) = (self.graph[gidx].x, self.graph[gidx].y);
            let parent = self.parent(gidx);
            let children = self.child_order.remove(&gidx).unwrap_or_default();

            for &child in &children {
                if let Some(edge) = self.graph.find_edge(gidx, child) {
                    self.graph.remove_edge(edge);
                }
                if let Some(p) = parent {
                    self.graph.add_edge(p, child, ());
                }
                let el = &mut self.graph[child];
                el.x += gx;
                el.y += gy;
                released.push(el.id);
            }

            let list = self.siblings_mut(parent);
            if let Some(pos) = list.iter().position(|&i| i == gidx) {
                list.splice(pos..=pos, children);
            }
            self.graph.remove_node(gidx);
            self.id_index.remove(&id);
            log::debug!("ungrouped {id}");
        }
        released
    }

    /// Shift every selected top-level element one slot in `direction`,
    /// independently at each level. Adjacent selected elements move
    /// together; an element never hops over another selected one.
    pub fn reorder(&mut self, ids: &[NodeId], direction: ZDirection) -> bool {
        let selected = self.selected_indices(ids);
        if selected.is_empty() {
            return false;
        }
        let mut changed = reorder_list(&mut self.roots, &selected, direction);
        for list in self.child_order.values_mut() {
            changed |= reorder_list(list, &selected, direction);
        }
        changed
    }

    /// Bring selected elements to the front (or send them to the back)
    /// of their sibling lists, keeping their relative order.
    pub fn reorder_to_edge(&mut self, ids: &[NodeId], direction: ZDirection) -> bool {
        let selected = self.selected_indices(ids);
        if selected.is_empty() {
            return false;
        }
        let mut changed = partition_list(&mut self.roots, &selected, direction);
        for list in self.child_order.values_mut() {
            changed |= partition_list(list, &selected, direction);
        }
        changed
    }

    fn selected_indices(&self, ids: &[NodeId]) -> HashSet<NodeIndex> {
        self.top_level_selection(ids)
            .into_iter()
            .filter_map(|id| self.index_of(id))
            .collect()
    }
}

fn reorder_list(list: &mut [NodeIndex], selected: &HashSet<NodeIndex>, direction: ZDirection) -> bool {
    let n = list.len();
    if n < 2 {
        return false;
    }
    let mut changed = false;
    match direction {
        ZDirection::Forward => {
            for i in (0..n - 1).rev() {
                if selected.contains(&list[i]) && !selected.contains(&list[i + 1]) {
                    list.swap(i, i + 1);
                    changed = true;
                }
            }
        }
        ZDirection::Backward => {
            for i in 1..n {
                if selected.contains(&list[i]) && !selected.contains(&list[i - 1]) {
                    list.swap(i, i - 1);
                    changed = true;
                }
            }
        }
    }
    changed
}

fn partition_list(list: &mut Vec<NodeIndex>, selected: &HashSet<NodeIndex>, direction: ZDirection) -> bool {
    let (picked, rest): (Vec<NodeIndex>, Vec<NodeIndex>) =
        list.iter().partition(|i| selected.contains(i));
    if picked.is_empty() {
        return false;
    }
    let reordered: Vec<NodeIndex> = match direction {
        ZDirection::Forward => rest.into_iter().chain(picked).collect(),
        ZDirection::Backward => picked.into_iter().chain(rest).collect(),
    };
    let changed = *list != reordered;
    *list = reordered;
    changed
}
