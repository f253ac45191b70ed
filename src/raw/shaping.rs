use core::cmp::Ordering;

use super::graph::NodeGraph;
use super::handle::Handle;
use super::node::Side;

/// The pair of algorithms that decide how insertion and removal restructure
/// the node graph, plus a hook observing every node touched during descent.
///
/// The engine owns the traversal skeleton, comparison, length, and version
/// bookkeeping; a policy only rearranges links. [`Standard`] never
/// restructures beyond the minimal splice and its visit hook does nothing; a
/// self-adjusting variant would restructure inside `insert`/`remove` and key
/// its statistics off `on_visit`, without touching the engine.
pub(crate) trait ShapingPolicy<K, V> {
    /// Observation hook invoked on every node visited during a search descent.
    fn on_visit(graph: &NodeGraph<K, V>, node: Handle);

    /// Places `key`/`value` into the graph, allocating their node only once
    /// its slot is known. A comparison that unwinds mid-descent must leave
    /// the arenas untouched.
    ///
    /// Returns the handle the new node displaced when an equal key was
    /// already present; the displaced node is off the graph but still in the
    /// arena, and the engine releases it. Returns `None` when the new node
    /// filled an empty slot.
    fn insert(graph: &mut NodeGraph<K, V>, key: K, value: V, cmp: &dyn Fn(&K, &K) -> Ordering) -> Option<Handle>;

    /// Splices the mapping held by `node` out of the graph.
    ///
    /// Returns the handle that physically left the graph, which is `node`
    /// itself unless the two-child case promoted the in-order successor into
    /// it. Either way the returned handle is unreachable from the root and
    /// holds the removed mapping's payload, ready for the engine to release.
    fn remove(graph: &mut NodeGraph<K, V>, node: Handle) -> Handle;
}

/// The default, non-balancing shaping policy.
pub(crate) struct Standard;

impl<K, V> ShapingPolicy<K, V> for Standard {
    #[inline]
    fn on_visit(_graph: &NodeGraph<K, V>, _node: Handle) {}

    fn insert(graph: &mut NodeGraph<K, V>, key: K, value: V, cmp: &dyn Fn(&K, &K) -> Ordering) -> Option<Handle> {
        let Some(root) = graph.root() else {
            let incoming = graph.alloc(key, value);
            graph.set_root(Some(incoming));
            return None;
        };

        let mut current = root;
        loop {
            let side = match cmp(&key, graph.node(current).key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    // Duplicate key: substitute a fresh node at the same
                    // graph position and hand the old node back.
                    let incoming = graph.alloc(key, value);
                    graph.substitute(current, incoming);
                    return Some(current);
                }
            };
            match graph.node(current).child(side) {
                Some(next) => current = next,
                None => {
                    let incoming = graph.alloc(key, value);
                    graph.attach(current, side, incoming);
                    return None;
                }
            }
        }
    }

    fn remove(graph: &mut NodeGraph<K, V>, node: Handle) -> Handle {
        match (graph.node(node).left(), graph.node(node).right()) {
            (Some(_), Some(right)) => {
                // The in-order successor is the leftmost node of the right
                // subtree; it has no left child, so splicing it out is the
                // one-child case below. Its payload is promoted into the
                // retained node, which keeps both subtrees ordered: the
                // promoted key is the smallest key greater than the removed
                // one.
                let successor = graph.leftmost(right);
                let successor_child = graph.node(successor).right();
                graph.replace_in_parent(successor, successor_child);
                graph.swap_payload(node, successor);
                successor
            }
            _ => {
                let child = graph.node(node).lone_child();
                graph.replace_in_parent(node, child);
                node
            }
        }
    }
}
