use super::handle::Handle;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A single tree cell.
///
/// Owns its key and a handle to its value (values live in their own arena so
/// mutable value iteration never aliases node traversal). The left and right
/// handles are owning in the logical sense: a node is reachable through
/// exactly one child slot or through the root. The parent handle is a
/// non-owning back-reference used for upward traversal and removal bookkeeping.
pub(crate) struct Node<K> {
    key: K,
    value: Handle,
    left: Option<Handle>,
    right: Option<Handle>,
    parent: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a detached node; links are wired up by the shaping policy.
    pub(crate) const fn new(key: K, value: Handle) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) const fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) const fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    pub(crate) const fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    pub(crate) const fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// The sole descendant of a node with at most one child.
    pub(crate) const fn lone_child(&self) -> Option<Handle> {
        match (self.left, self.right) {
            (Some(left), None) => Some(left),
            (_, right) => right,
        }
    }

    /// Exchanges payloads with `other`, leaving both nodes' links untouched.
    /// Used by two-child removal, which retains the node object and promotes
    /// the successor's entry into it.
    pub(crate) const fn swap_payload(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.key, &mut other.key);
        core::mem::swap(&mut self.value, &mut other.value);
    }

    /// Dismantles the node into its payload.
    pub(crate) fn into_payload(self) -> (K, Handle) {
        (self.key, self.value)
    }

    /// Severs all three relations. A discarded node must not keep handles to
    /// live slots.
    pub(crate) const fn clear_links(&mut self) {
        self.left = None;
        self.right = None;
        self.parent = None;
    }
}
