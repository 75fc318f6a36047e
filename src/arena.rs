//! Free-list node arena.
//!
//! Trees are built from two-field [`Node`]s stored in 1-based, integer-indexed
//! slots. Each field holds a [`NodeRef`]: nothing, an ownership edge to
//! another slot, or an atom identified purely by its interned symbol id —
//! atoms need no node storage. Lists are right-threaded: `left` is the
//! element, `right` the next cell or [`NodeRef::Empty`].
//!
//! Free slots are singly linked through their `right` field. Growth doubles
//! the capacity and relinks the free list; because slots are indices rather
//! than addresses, growth never invalidates an issued index.

use crate::symbols::SymbolId;

/// 1-based index of a slot in the arena
pub type NodeIndex = u32;

/// One field of a node: nil, an owned child cell, or an atom leaf.
///
/// The tagged equivalent of packing all three meanings into one integer
/// (`0` for nil, a positive index for an ownership edge, a negated symbol
/// id for an atom), without the sign tricks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    #[default]
    Empty,
    Node(NodeIndex),
    Atom(SymbolId),
}

/// A cons-cell-like record: `left` is the element, `right` threads the list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub left: NodeRef,
    pub right: NodeRef,
}

/// Growable pool of nodes managed through an explicit free list.
#[derive(Debug)]
pub struct NodeArena {
    nodes: Vec<Node>,
    free_head: NodeRef,
    live: usize,
    /// When false, allocation appends and deallocation is a no-op — the
    /// degenerate append-only configuration
    reclaim: bool,
}

impl NodeArena {
    /// Create a pool of `capacity` slots, all pre-linked into the free list:
    /// slot i's link points to slot i+1, the last slot ends the list.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; one slot is always held in reserve.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "arena capacity must be non-zero");
        let mut nodes = Vec::with_capacity(capacity);
        for i in 1..capacity {
            nodes.push(Node {
                left: NodeRef::Empty,
                right: NodeRef::Node((i + 1) as NodeIndex),
            });
        }
        nodes.push(Node::default());
        NodeArena {
            nodes,
            free_head: NodeRef::Node(1),
            live: 0,
            reclaim: true,
        }
    }

    /// The append-only variant: unbounded, monotonic, no reuse. Freeing a
    /// node is a no-op.
    pub fn append_only() -> Self {
        NodeArena {
            nodes: Vec::new(),
            free_head: NodeRef::Empty,
            live: 0,
            reclaim: false,
        }
    }

    /// Shared borrow of the node in slot `index`.
    ///
    /// # Panics
    /// Panics if `index` is zero or past the arena: holding such an index is
    /// a caller bug, not a recoverable state.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index as usize - 1]
    }

    /// Mutable borrow of the node in slot `index`; panics like [`Self::node`]
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index as usize - 1]
    }

    /// Pop a cleared node off the free list and return its index.
    ///
    /// Grows first — doubling capacity and extending the free list — when
    /// occupancy would otherwise eat the reserved slot.
    pub fn allocate(&mut self) -> NodeIndex {
        if !self.reclaim {
            self.nodes.push(Node::default());
            self.live += 1;
            return self.nodes.len() as NodeIndex;
        }

        if self.live == self.nodes.len() - 1 {
            self.grow(self.nodes.len() * 2);
        }

        let index = match self.free_head {
            NodeRef::Node(index) => index,
            // The reserve check above keeps at least one slot free
            _ => unreachable!("free list exhausted despite reserve slot"),
        };
        self.free_head = self.node(index).right;
        *self.node_mut(index) = Node::default();
        self.live += 1;
        index
    }

    /// Return the whole subtree rooted at `index` to the free list.
    ///
    /// Frees post-order: the `right` subtree, then the `left` subtree, then
    /// the node itself. Only `NodeRef::Node` edges are followed; atoms own no
    /// storage. In the append-only configuration this is a no-op.
    pub fn deallocate(&mut self, index: NodeIndex) {
        if !self.reclaim {
            return;
        }

        let Node { left, right } = *self.node(index);
        if let NodeRef::Node(right_index) = right {
            self.deallocate(right_index);
        }
        if let NodeRef::Node(left_index) = left {
            self.deallocate(left_index);
        }

        let next = self.free_head;
        let node = self.node_mut(index);
        node.left = NodeRef::Empty;
        node.right = next;
        self.free_head = NodeRef::Node(index);
        self.live -= 1;
    }

    /// Deallocate only when the ref actually owns a cell
    pub fn free(&mut self, root: NodeRef) {
        if let NodeRef::Node(index) = root {
            self.deallocate(index);
        }
    }

    /// Total slot count
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live (allocated, not yet freed) nodes
    pub fn live(&self) -> usize {
        self.live
    }

    /// Double-style growth: append slots old+1..=new_capacity chained into a
    /// fresh free run, then hook the old free-list tail onto it.
    fn grow(&mut self, new_capacity: usize) {
        let old_capacity = self.nodes.len();
        for i in (old_capacity + 1)..new_capacity {
            self.nodes.push(Node {
                left: NodeRef::Empty,
                right: NodeRef::Node((i + 1) as NodeIndex),
            });
        }
        self.nodes.push(Node::default());

        let first_new = NodeRef::Node((old_capacity + 1) as NodeIndex);
        match self.free_head {
            NodeRef::Empty => self.free_head = first_new,
            NodeRef::Node(head) => {
                let mut tail = head;
                while let NodeRef::Node(next) = self.node(tail).right {
                    tail = next;
                }
                self.node_mut(tail).right = first_new;
            }
            // Atom never appears in the free chain
            NodeRef::Atom(_) => unreachable!("atom ref in free list"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arena_links_all_slots() {
        let arena = NodeArena::new(4);
        assert_eq!(arena.capacity(), 4);
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.node(1).right, NodeRef::Node(2));
        assert_eq!(arena.node(2).right, NodeRef::Node(3));
        assert_eq!(arena.node(3).right, NodeRef::Node(4));
        assert_eq!(arena.node(4).right, NodeRef::Empty);
    }

    #[test]
    fn test_allocate_pops_in_slot_order() {
        let mut arena = NodeArena::new(8);
        let indices: Vec<NodeIndex> = (0..3).map(|_| arena.allocate()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(arena.live(), 3);
        // Allocation clears the popped node
        assert_eq!(*arena.node(1), Node::default());
    }

    #[test]
    fn test_growth_preserves_issued_indices() {
        let mut arena = NodeArena::new(8);
        // Fill to the reserve threshold: capacity - 1 live nodes
        for i in 1..8u32 {
            let index = arena.allocate();
            arena.node_mut(index).left = NodeRef::Atom(i);
        }
        assert_eq!(arena.capacity(), 8);

        // One more allocation triggers exactly one doubling
        let eighth = arena.allocate();
        assert_eq!(eighth, 8);
        assert_eq!(arena.capacity(), 16);

        // Previously issued indices still hold their contents
        for i in 1..8u32 {
            assert_eq!(arena.node(i).left, NodeRef::Atom(i));
        }
        // The new free run continues in slot order
        assert_eq!(arena.allocate(), 9);
    }

    #[test]
    fn test_deallocate_returns_subtree_in_free_list_order() {
        // Build the tree read from "(a (b c))" by hand:
        //   1: left=Atom(a) right=2
        //   2: left=Node(3) right=Empty
        //   3: left=Atom(b) right=4
        //   4: left=Atom(c) right=Empty
        let mut arena = NodeArena::new(8);
        for _ in 0..4 {
            arena.allocate();
        }
        *arena.node_mut(1) = Node {
            left: NodeRef::Atom(100),
            right: NodeRef::Node(2),
        };
        *arena.node_mut(2) = Node {
            left: NodeRef::Node(3),
            right: NodeRef::Empty,
        };
        *arena.node_mut(3) = Node {
            left: NodeRef::Atom(101),
            right: NodeRef::Node(4),
        };
        *arena.node_mut(4) = Node {
            left: NodeRef::Atom(102),
            right: NodeRef::Empty,
        };

        arena.deallocate(1);
        assert_eq!(arena.live(), 0);

        // Post-order free (right subtree, then left, then self) pushes
        // 4, 3, 2, 1 — so reuse pops 1, 2, 3, 4 before older free slots.
        let reused: Vec<NodeIndex> = (0..5).map(|_| arena.allocate()).collect();
        assert_eq!(reused, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_free_ignores_non_node_refs() {
        let mut arena = NodeArena::new(4);
        let index = arena.allocate();
        arena.free(NodeRef::Empty);
        arena.free(NodeRef::Atom(7));
        assert_eq!(arena.live(), 1);
        arena.free(NodeRef::Node(index));
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn test_append_only_never_reuses() {
        let mut arena = NodeArena::append_only();
        let a = arena.allocate();
        let b = arena.allocate();
        assert_eq!((a, b), (1, 2));
        arena.deallocate(a);
        // Freeing was a no-op; the next slot is still fresh
        assert_eq!(arena.allocate(), 3);
        assert_eq!(arena.capacity(), 3);
    }

    #[test]
    fn test_minimal_capacity_grows_on_first_reuse_pressure() {
        let mut arena = NodeArena::new(2);
        let first = arena.allocate();
        assert_eq!(first, 1);
        // live == capacity - 1, so this allocation grows first
        let second = arena.allocate();
        assert_eq!(second, 2);
        assert_eq!(arena.capacity(), 4);
    }
}
