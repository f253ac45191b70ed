use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::marker::PhantomData;

use super::graph::NodeGraph;
use super::handle::Handle;
use super::node::Node;
use super::shaping::{ShapingPolicy, Standard};

/// An injected key ordering. Overrides `K`'s natural order when present.
pub(crate) type Comparator<K> = Box<dyn Fn(&K, &K) -> Ordering + Send + Sync>;

/// The core binary-search-tree engine backing `BstMap`.
///
/// Owns the node graph, the injected comparator (if any), the element count,
/// and the structural version counter that fail-fast cursors compare against.
/// Structural changes are delegated to the shaping policy `P`; the engine
/// itself only descends, compares, and keeps the books.
pub(crate) struct RawBstMap<K, V, P = Standard> {
    graph: NodeGraph<K, V>,
    comparator: Option<Comparator<K>>,
    /// Number of key-value pairs reachable from the root.
    len: usize,
    /// Incremented on every structural change: insertion, replacement splice,
    /// removal, clear.
    version: u64,
    _policy: PhantomData<fn() -> P>,
}

impl<K, V, P: ShapingPolicy<K, V>> RawBstMap<K, V, P> {
    pub(crate) const fn new() -> Self {
        Self {
            graph: NodeGraph::new(),
            comparator: None,
            len: 0,
            version: 0,
            _policy: PhantomData,
        }
    }

    pub(crate) fn with_comparator(comparator: Comparator<K>) -> Self {
        Self {
            graph: NodeGraph::new(),
            comparator: Some(comparator),
            len: 0,
            version: 0,
            _policy: PhantomData,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The live structural version, captured and re-checked by cursors.
    pub(crate) const fn version(&self) -> u64 {
        self.version
    }

    pub(crate) const fn graph(&self) -> &NodeGraph<K, V> {
        &self.graph
    }

    pub(crate) fn clear(&mut self) {
        self.graph.clear();
        self.len = 0;
        self.version = self.version.wrapping_add(1);
    }

    /// Maximum depth in edges, by breadth-first traversal. Diagnostic only;
    /// no mutation path consults it. O(n) time, O(width) auxiliary space.
    pub(crate) fn height(&self) -> usize {
        let Some(root) = self.graph.root() else {
            return 0;
        };
        let mut frontier = VecDeque::new();
        frontier.push_back((root, 0));
        let mut max_depth = 0;
        while let Some((handle, depth)) = frontier.pop_front() {
            max_depth = max_depth.max(depth);
            let node = self.graph.node(handle);
            if let Some(left) = node.left() {
                frontier.push_back((left, depth + 1));
            }
            if let Some(right) = node.right() {
                frontier.push_back((right, depth + 1));
            }
        }
        max_depth
    }

    /// Returns a node reference by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawBstMap<K, V, P>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: Only the graph's nodes arena is projected.
        unsafe { NodeGraph::node_ptr(&raw const (*ptr).graph, handle) }
    }

    /// Returns a mutable value reference by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawBstMap<K, V, P>`.
    /// - The caller must have logical exclusive access to the value at `handle`.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: Only the graph's values arena is projected; traversal never
        // reads it.
        unsafe { NodeGraph::value_mut_ptr(&raw mut (*ptr).graph, handle) }
    }

    /// In-order successor via raw node projections only.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawBstMap<K, V, P>`.
    pub(crate) unsafe fn successor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: Only the graph's nodes arena is projected.
        unsafe { NodeGraph::successor_ptr(&raw const (*ptr).graph, handle) }
    }

    /// Removes the mapping held by `handle`, which must be live and reachable.
    ///
    /// Also reports the handle that physically left the graph so a cursor can
    /// re-thread itself when the splice evicted its queued successor.
    pub(crate) fn remove_at(&mut self, handle: Handle) -> ((K, V), Handle) {
        self.len -= 1;
        self.version = self.version.wrapping_add(1);
        let spliced = P::remove(&mut self.graph, handle);
        (self.graph.release(spliced), spliced)
    }

    /// Drains every entry in key order, leaving the map empty. O(n); used by
    /// the owning iterator.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut handles = Vec::with_capacity(self.len);
        let mut current = self.graph.first();
        while let Some(handle) = current {
            handles.push(handle);
            current = self.graph.successor(handle);
        }

        let mut entries = Vec::with_capacity(handles.len());
        for handle in handles {
            entries.push(self.graph.release(handle));
        }

        self.graph.clear();
        self.len = 0;
        self.version = self.version.wrapping_add(1);
        entries
    }
}

impl<K: Ord, V, P: ShapingPolicy<K, V>> RawBstMap<K, V, P> {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        match &self.comparator {
            Some(comparator) => comparator(a, b),
            None => a.cmp(b),
        }
    }

    /// Binary-search descent from the root. Every visited node is reported to
    /// the shaping policy's hook before the comparison. O(depth).
    pub(crate) fn locate(&self, key: &K) -> Option<Handle> {
        let mut current = self.graph.root();
        while let Some(handle) = current {
            P::on_visit(&self.graph, handle);
            let node = self.graph.node(handle);
            current = match self.compare(key, node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let handle = self.locate(key)?;
        Some(self.graph.value(self.graph.node(handle).value()))
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.locate(key)?;
        let value = self.graph.node(handle).value();
        Some(self.graph.value_mut(value))
    }

    pub(crate) fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let handle = self.locate(key)?;
        let node = self.graph.node(handle);
        Some((node.key(), self.graph.value(node.value())))
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// A duplicate key is handled by node substitution, not value overwrite:
    /// the shaping policy splices a fresh node into the matched node's graph
    /// position and the displaced node is released here. Either outcome is a
    /// structural change, so the version counter always advances. The policy
    /// allocates the node at the placement point, so a comparison that
    /// unwinds mid-descent leaves the arenas and the count untouched.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let displaced = {
            let comparator = self.comparator.as_deref();
            P::insert(&mut self.graph, key, value, &move |a, b| match comparator {
                Some(comparator) => comparator(a, b),
                None => a.cmp(b),
            })
        };
        self.version = self.version.wrapping_add(1);
        match displaced {
            Some(old) => {
                let (_, value) = self.graph.release(old);
                Some(value)
            }
            None => {
                self.len += 1;
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub(crate) fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let handle = self.locate(key)?;
        Some(self.remove_at(handle).0)
    }
}
