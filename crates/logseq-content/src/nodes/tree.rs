use std::sync::atomic::{AtomicU32, Ordering};

use super::kind::{Kind, NodeKind};

static NEXT_TREE: AtomicU32 = AtomicU32::new(0);

/// Handle to a node inside the [`Tree`] that allocated it.
///
/// Ids carry the identity of their tree: another tree treats them as
/// unknown, so edits with them are rejected. Detached nodes keep their id
/// and can be re-attached later. A cloned tree shares its source's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: u32,
    index: u32,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

impl Slot {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
        }
    }
}

/// Arena holding a document tree.
///
/// The parent owns its children through the first/last child links; parent
/// and sibling links are plain indices. Every structural edit is O(1) apart
/// from the ancestor check that keeps the tree acyclic.
///
/// Edits that would break a child-type gate, or that name a node of another
/// tree, are ignored and report `false`.
///
/// Slots are never reused: detached nodes stay allocated until the tree is
/// dropped, so long-lived trees that are edited heavily grow with every
/// allocation.
#[derive(Debug, Clone)]
pub struct Tree {
    id: u32,
    slots: Vec<Slot>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree whose root is an empty outline [`NodeKind::Block`].
    pub fn new() -> Self {
        Self::with_root(NodeKind::Block)
    }

    pub fn with_root(kind: NodeKind) -> Self {
        let id = NEXT_TREE.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            slots: vec![Slot::new(kind)],
            root: NodeId { tree: id, index: 0 },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Makes an already allocated node the root. The node is detached first.
    /// Nodes of other trees are ignored.
    pub fn set_root(&mut self, id: NodeId) {
        if self.contains(id) {
            self.remove_self(id);
            self.root = id;
        }
    }

    /// Allocates a detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId {
            tree: self.id,
            index: self.slots.len() as u32,
        };
        self.slots.push(Slot::new(kind));
        id
    }

    /// Whether `id` was allocated by this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        if id.tree != self.id {
            return None;
        }
        self.slots.get(id.index())
    }

    /// Slot of a node already checked to belong to this tree.
    fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        &mut self.slots[id.index()]
    }

    /// Kind of `id`, or `None` for a node of another tree.
    pub fn get(&self, id: NodeId) -> Option<&NodeKind> {
        self.slot(id).map(|slot| &slot.kind)
    }

    /// # Panics
    ///
    /// Panics if `id` belongs to another tree.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        match self.slot(id) {
            Some(slot) => &slot.kind,
            None => panic!("{id:?} is not a node of this tree"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` belongs to another tree.
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        assert!(self.contains(id), "{id:?} is not a node of this tree");
        &mut self.slot_mut(id).kind
    }

    pub fn tag(&self, id: NodeId) -> Kind {
        self.kind(id).kind()
    }

    pub fn is(&self, id: NodeId, kind: Kind) -> bool {
        self.tag(id) == kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.next)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.prev)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.last_child)
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.first_child(id).is_some()
    }

    /// Whether `ancestor` is `id` or one of its parents.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    fn can_hold(&self, parent: NodeId, child: NodeId) -> bool {
        let (Some(p), Some(c)) = (self.get(parent), self.get(child)) else {
            return false;
        };
        p.kind().accepts(c.kind()) && !self.is_ancestor_or_self(child, parent)
    }

    /// Detaches a node from its parent. Its own children stay attached to it.
    pub fn remove_self(&mut self, id: NodeId) {
        if self.parent(id).is_some() {
            self.unlink(id);
        }
    }

    /// Puts `replacement` where `id` is and detaches `id`.
    pub fn replace_with(&mut self, id: NodeId, replacement: NodeId) -> bool {
        match self.parent(id) {
            Some(parent) => self.replace_child(parent, id, replacement),
            None => false,
        }
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_hold(parent, child) {
            return false;
        }
        self.remove_self(child);
        let last = self.last_child(parent);
        self.link(parent, last, child);
        true
    }

    pub fn add_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            self.add_child(parent, child);
        }
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_hold(parent, child) {
            return false;
        }
        self.remove_self(child);
        self.link(parent, None, child);
        true
    }

    /// Prepends `children` keeping their relative order.
    pub fn prepend_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        let children: Vec<NodeId> = children.into_iter().collect();
        for child in children.into_iter().rev() {
            self.prepend_child(parent, child);
        }
    }

    /// Replaces all children. The old children are detached.
    pub fn set_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        let children: Vec<NodeId> = children.into_iter().collect();
        self.remove_children(parent);
        self.add_children(parent, children);
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.unlink(child);
        true
    }

    pub fn remove_children(&mut self, parent: NodeId) {
        while let Some(child) = self.first_child(parent) {
            self.unlink(child);
        }
    }

    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        if self.parent(old) != Some(parent) {
            return false;
        }
        if old == new {
            return true;
        }
        if !self.can_hold(parent, new) {
            return false;
        }
        self.remove_self(new);
        let prev = self.previous_sibling(old);
        self.unlink(old);
        self.link(parent, prev, new);
        true
    }

    pub fn insert_child_before(&mut self, parent: NodeId, child: NodeId, anchor: NodeId) -> bool {
        if self.parent(anchor) != Some(parent) || child == anchor || !self.can_hold(parent, child) {
            return false;
        }
        self.remove_self(child);
        let prev = self.previous_sibling(anchor);
        self.link(parent, prev, child);
        true
    }

    pub fn insert_child_after(&mut self, parent: NodeId, child: NodeId, anchor: NodeId) -> bool {
        if self.parent(anchor) != Some(parent) || child == anchor || !self.can_hold(parent, child) {
            return false;
        }
        self.remove_self(child);
        self.link(parent, Some(anchor), child);
        true
    }

    /// Links a detached `child` into `parent` right after `prev` (or first).
    fn link(&mut self, parent: NodeId, prev: Option<NodeId>, child: NodeId) {
        let next = match prev {
            Some(p) => self.slot_mut(p).next,
            None => self.slot_mut(parent).first_child,
        };

        {
            let slot = self.slot_mut(child);
            slot.parent = Some(parent);
            slot.prev = prev;
            slot.next = next;
        }

        match prev {
            Some(p) => self.slot_mut(p).next = Some(child),
            None => self.slot_mut(parent).first_child = Some(child),
        }
        match next {
            Some(n) => self.slot_mut(n).prev = Some(child),
            None => self.slot_mut(parent).last_child = Some(child),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(slot) = self.slot(id) else {
            return;
        };
        let (parent, prev, next) = (slot.parent, slot.prev, slot.next);
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(p) => self.slot_mut(p).next = next,
            None => self.slot_mut(parent).first_child = next,
        }
        match next {
            Some(n) => self.slot_mut(n).prev = prev,
            None => self.slot_mut(parent).last_child = prev,
        }

        let slot = self.slot_mut(id);
        slot.parent = None;
        slot.prev = None;
        slot.next = None;
    }

    /// Lazily iterates the direct children of `id`.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Lazily iterates every node below `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }
}

pub struct Children<'t> {
    tree: &'t Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Pre-order walk below a root, not including the root itself.
pub struct Descendants<'t> {
    tree: &'t Tree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;

        self.next = if let Some(child) = self.tree.first_child(current) {
            Some(child)
        } else {
            let mut up = Some(current);
            let mut found = None;
            while let Some(node) = up {
                if node == self.root {
                    break;
                }
                if let Some(sibling) = self.tree.next_sibling(node) {
                    found = Some(sibling);
                    break;
                }
                up = self.tree.parent(node);
            }
            found
        };

        Some(current)
    }
}
