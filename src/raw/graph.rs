use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// The pointer graph of the tree: both arenas plus the root handle.
///
/// This is the surface the shaping policies work against. It owns every node
/// and value and provides the link-maintenance primitives (attach, splice,
/// substitute) that keep the parent/child relations consistent; the policies
/// decide *where* those primitives apply.
pub(crate) struct NodeGraph<K, V> {
    nodes: Arena<Node<K>>,
    values: Arena<V>,
    root: Option<Handle>,
}

impl<K, V> NodeGraph<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
        }
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) const fn set_root(&mut self, root: Option<Handle>) {
        self.root = root;
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.values.get_mut(handle)
    }

    /// Number of live nodes; the engine's length invariant is checked against
    /// this in tests.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live values. Matches `node_count` whenever no operation is
    /// mid-flight.
    pub(crate) const fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Allocates a detached node for `key`/`value`.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> Handle {
        let value = self.values.alloc(value);
        self.nodes.alloc(Node::new(key, value))
    }

    /// Removes a node and its value from the arenas. The node must already be
    /// unreachable from the root; its links are severed here so the returned
    /// cell cannot leak handles to live slots.
    pub(crate) fn release(&mut self, handle: Handle) -> (K, V) {
        let mut node = self.nodes.take(handle);
        node.clear_links();
        let (key, value) = node.into_payload();
        (key, self.values.take(value))
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
    }

    /// Which child slot of its parent `handle` occupies, or `None` for the root.
    pub(crate) fn side_of(&self, handle: Handle) -> Option<Side> {
        let parent = self.node(handle).parent()?;
        if self.node(parent).left() == Some(handle) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Attaches a detached node as the `side` child of `parent`.
    pub(crate) fn attach(&mut self, parent: Handle, side: Side, child: Handle) {
        self.node_mut(parent).set_child(side, Some(child));
        self.node_mut(child).set_parent(Some(parent));
    }

    /// Replaces `node` in its parent's slot (or at the root) with `replacement`,
    /// rewiring the replacement's parent back-reference. The spliced-out node's
    /// own links are left for `release` to sever.
    pub(crate) fn replace_in_parent(&mut self, node: Handle, replacement: Option<Handle>) {
        let parent = self.node(node).parent();
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let side = self.side_of(node).expect("`NodeGraph::replace_in_parent()` - parent link is inconsistent!");
                self.node_mut(parent).set_child(side, replacement);
            }
        }
        if let Some(replacement) = replacement {
            self.node_mut(replacement).set_parent(parent);
        }
    }

    /// Substitutes a freshly allocated node for `old` at the exact same graph
    /// position: same parent (or root) slot, same children, with the children's
    /// parent back-references repointed. Used for duplicate-key insertion, which
    /// replaces the node identity rather than overwriting the value in place.
    pub(crate) fn substitute(&mut self, old: Handle, new: Handle) {
        let left = self.node(old).left();
        let right = self.node(old).right();

        self.replace_in_parent(old, Some(new));
        self.node_mut(new).set_left(left);
        self.node_mut(new).set_right(right);
        if let Some(left) = left {
            self.node_mut(left).set_parent(Some(new));
        }
        if let Some(right) = right {
            self.node_mut(right).set_parent(Some(new));
        }
    }

    /// Exchanges the payloads of two nodes, leaving every link in place.
    pub(crate) fn swap_payload(&mut self, a: Handle, b: Handle) {
        let (a, b) = self.nodes.get2_mut(a, b);
        a.swap_payload(b);
    }

    /// Descends left as far as possible from `handle`.
    pub(crate) fn leftmost(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(left) = self.node(current).left() {
            current = left;
        }
        current
    }

    /// The first node in key order, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    /// The in-order successor of `handle`, via parent-pointer threading.
    ///
    /// With a right child, the successor is the leftmost node of that subtree.
    /// Otherwise the walk climbs past every ancestor reached from a right
    /// child; the first ancestor reached from a left child is the successor,
    /// and reaching the root from the right means the traversal is exhausted.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.node(handle).right() {
            return Some(self.leftmost(right));
        }
        let mut current = handle;
        loop {
            let parent = self.node(current).parent()?;
            if self.node(parent).right() == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
    }

    /// Returns a node reference by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `NodeGraph<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: We only project the `nodes` field, avoiding aliasing with the
        // `values` arena that mutable value iteration writes through.
        unsafe { Arena::get_ptr(&raw const (*ptr).nodes, handle) }
    }

    /// Returns a mutable value reference by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `NodeGraph<K, V>`.
    /// - The caller must have logical exclusive access to the value at `handle`
    ///   and must not hold another reference into the values arena.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: We only project the `values` field; node traversal reads the
        // `nodes` arena and never touches this one.
        unsafe { Arena::get_mut_ptr(&raw mut (*ptr).values, handle) }
    }

    /// In-order successor walk performed entirely through raw node projections.
    /// Mirrors [`NodeGraph::successor`] for use by the mutable iterators, which
    /// must not materialize a reference to the whole graph.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `NodeGraph<K, V>`.
    pub(crate) unsafe fn successor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: All reads go through `node_ptr`, which projects the nodes
        // arena only.
        unsafe {
            if let Some(right) = Self::node_ptr(ptr, handle).right() {
                let mut current = right;
                while let Some(left) = Self::node_ptr(ptr, current).left() {
                    current = left;
                }
                return Some(current);
            }
            let mut current = handle;
            loop {
                let parent = Self::node_ptr(ptr, current).parent()?;
                if Self::node_ptr(ptr, parent).right() == Some(current) {
                    current = parent;
                } else {
                    return Some(parent);
                }
            }
        }
    }
}
