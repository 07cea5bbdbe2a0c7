// src/config/tree.rs

//! Arena-backed configuration tree.
//!
//! Every node lives in a [`NodeTree`] and is addressed by a [`NodeId`]. A node
//! carries an optional name, an optional raw string value, an optional
//! comment, a link to its first child and to its next sibling, and the id of
//! the head of the sibling list it belongs to. Sibling lists are singly
//! linked; children of a node form one such list.
//!
//! Ids are only minted by the tree that owns them. Passing a released id back
//! into the tree is a caller bug and panics, like indexing a `Vec` out of
//! bounds.

/// Handle to a node inside a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    name: Option<String>,
    value: Option<String>,
    comment: Option<String>,
    first_child: Option<NodeId>,
    next: Option<NodeId>,
    head: NodeId,
}

impl Node {
    fn new(name: Option<String>, value: Option<String>, id: NodeId) -> Self {
        Self {
            name,
            value,
            comment: None,
            first_child: None,
            next: None,
            // A fresh node is a one-element sibling list.
            head: id,
        }
    }
}

#[derive(Debug)]
enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<usize> },
}

/// Owner of all nodes of one configuration tree.
#[derive(Debug, Default)]
pub struct NodeTree {
    slots: Vec<Slot>,
    free_head: Option<usize>,
    live: usize,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a named node without a value, e.g. a section header.
    pub fn alloc_section(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc_node(Some(name.into()), None)
    }

    /// Allocate a named node with a value, e.g. a `key = value` pair.
    pub fn alloc_pair(&mut self, name: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.alloc_node(Some(name.into()), Some(value.into()))
    }

    /// Allocate an unnamed node with a value, e.g. a list element.
    pub fn alloc_item(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc_node(None, Some(value.into()))
    }

    /// Allocate a node with neither name nor value.
    pub fn alloc_empty(&mut self) -> NodeId {
        self.alloc_node(None, None)
    }

    fn alloc_node(&mut self, name: Option<String>, value: Option<String>) -> NodeId {
        self.live += 1;
        match self.free_head {
            Some(index) => {
                let next_free = match self.slots[index] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                self.free_head = next_free;
                let id = NodeId(index);
                self.slots[index] = Slot::Occupied(Node::new(name, value, id));
                id
            }
            None => {
                let id = NodeId(self.slots.len());
                self.slots.push(Slot::Occupied(Node::new(name, value, id)));
                id
            }
        }
    }

    /// Append `node` to the sibling list `list` and return the list head.
    ///
    /// With `list == None` the node becomes a fresh one-element list. The
    /// node's previous `next` link is discarded, and its head is restamped to
    /// the canonical head of the target list, so appending to any member of a
    /// list is equivalent to appending to its head.
    pub fn append(&mut self, list: Option<NodeId>, node: NodeId) -> NodeId {
        self.node_mut(node).next = None;
        let Some(at) = list else {
            self.node_mut(node).head = node;
            return node;
        };
        let head = self.node(at).head;
        self.node_mut(node).head = head;
        let mut tail = at;
        while let Some(after) = self.node(tail).next {
            tail = after;
        }
        self.node_mut(tail).next = Some(node);
        head
    }

    /// Attach `child` at the end of `parent`'s child list.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        let list = self.node(parent).first_child;
        let head = self.append(list, child);
        self.node_mut(parent).first_child = Some(head);
    }

    /// Release `id`, its children, and every sibling after it.
    ///
    /// Released slots are recycled by later allocations; their ids must not
    /// be used again.
    pub fn release(&mut self, id: NodeId) {
        let node = self.node(id);
        let (child, next) = (node.first_child, node.next);
        if let Some(child) = child {
            self.release(child);
        }
        if let Some(next) = next {
            self.release(next);
        }
        debug_assert!(
            matches!(self.slots[id.0], Slot::Occupied(_)),
            "double release of {id:?}"
        );
        self.slots[id.0] = Slot::Vacant {
            next_free: self.free_head,
        };
        self.free_head = Some(id.0);
        self.live -= 1;
    }

    /// Find the first child of `parent` named `name`. Unnamed children never
    /// match.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let first = self.first_child(parent)?;
        self.find_from(first, name)
    }

    /// Find the first node named `name` in the sibling list starting at
    /// `start` (inclusive).
    pub fn find_from(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.siblings_from(start)
            .find(|&id| self.node(id).name.as_deref() == Some(name))
    }

    /// Children of `id` in list order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.first_child(id), |&child| self.next(child))
    }

    /// `start` and every sibling after it.
    pub fn siblings_from(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(start), |&node| self.next(node))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).name.as_deref()
    }

    pub fn value_str(&self, id: NodeId) -> Option<&str> {
        self.node(id).value.as_deref()
    }

    pub fn comment(&self, id: NodeId) -> Option<&str> {
        self.node(id).comment.as_deref()
    }

    pub fn set_comment(&mut self, id: NodeId, comment: impl Into<String>) {
        self.node_mut(id).comment = Some(comment.into());
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    /// Canonical head of the sibling list `id` belongs to.
    pub fn head_of(&self, id: NodeId) -> NodeId {
        self.node(id).head
    }

    /// Number of live nodes.
    pub fn live_count(&self) -> usize {
        self.live
    }

    fn node(&self, id: NodeId) -> &Node {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("stale {id:?} used after release"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("stale {id:?} used after release"),
        }
    }
}
