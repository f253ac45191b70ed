use thiserror::Error;

use crate::raw::Handle;

use super::BstMap;

/// The ways a detached [`Cursor`] operation can fail.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum CursorError {
    /// The tree was structurally modified (insertion, replacement, removal,
    /// or clear) by something other than this cursor since the cursor last
    /// observed it.
    #[error("tree was structurally modified outside the cursor")]
    ConcurrentModification,

    /// [`Cursor::remove_current`] was called before any entry was produced,
    /// or twice for the same entry.
    #[error("cursor has no current entry")]
    NoCurrentEntry,
}

/// A detached, fail-fast cursor over the entries of a [`BstMap`], in
/// ascending key order.
///
/// Created by the [`cursor`](BstMap::cursor) method. The cursor holds no
/// borrow of the map; instead the map is re-presented on every call, and the
/// cursor compares the map's structural version against the version it
/// captured. A mismatch means the tree changed behind the cursor's back, and
/// every subsequent call reports [`CursorError::ConcurrentModification`]
/// rather than walking a graph whose links it no longer understands.
///
/// [`remove_current`](Cursor::remove_current) is the exception: it removes
/// the most recently produced entry through the cursor itself, re-threads the
/// cursor across the splice, and leaves it valid.
///
/// A cursor must only be presented the map that created it; presenting
/// another map is a logic error (typically surfacing as
/// `ConcurrentModification` or entries from the wrong map).
///
/// # Examples
///
/// ```
/// use bst_tree::BstMap;
///
/// let mut map = BstMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut cursor = map.cursor();
///
/// assert_eq!(cursor.next(&map), Ok(Some((&1, &"a"))));
/// assert_eq!(cursor.remove_current(&mut map), Ok((1, "a")));
/// assert_eq!(cursor.next(&map), Ok(Some((&2, &"b"))));
///
/// // An outside mutation is detected on the next step.
/// map.insert(4, "d");
/// assert!(cursor.next(&map).is_err());
/// ```
#[derive(Clone, Debug)]
#[must_use = "cursors do nothing unless stepped with `next`"]
pub struct Cursor {
    /// The map version this cursor last observed.
    expected_version: u64,
    /// The node the next successful `next` call will produce.
    next: Option<Handle>,
    /// The node the last `next` call produced, cleared by `remove_current`.
    current: Option<Handle>,
}

impl Cursor {
    pub(super) fn new<K, V>(map: &BstMap<K, V>) -> Cursor {
        Cursor {
            expected_version: map.raw.version(),
            next: map.raw.graph().first(),
            current: None,
        }
    }

    fn check<K, V>(&self, map: &BstMap<K, V>) -> Result<(), CursorError> {
        if map.raw.version() == self.expected_version {
            Ok(())
        } else {
            Err(CursorError::ConcurrentModification)
        }
    }

    /// Advances the cursor and returns the next entry in key order, or
    /// `Ok(None)` once the entries are exhausted.
    ///
    /// # Errors
    ///
    /// [`CursorError::ConcurrentModification`] if the map was structurally
    /// modified outside this cursor since the last call.
    ///
    /// # Complexity
    ///
    /// O(1) amortized, O(depth) worst case.
    pub fn next<'a, K, V>(
        &mut self,
        map: &'a BstMap<K, V>,
    ) -> Result<Option<(&'a K, &'a V)>, CursorError> {
        self.check(map)?;
        let Some(handle) = self.next else {
            // Exhaustion keeps `current`: the final entry stays removable.
            return Ok(None);
        };
        let graph = map.raw.graph();
        let node = graph.node(handle);
        self.next = graph.successor(handle);
        self.current = Some(handle);
        Ok(Some((node.key(), graph.value(node.value()))))
    }

    /// Removes the entry most recently produced by [`next`](Cursor::next) and
    /// returns it, leaving the cursor positioned to continue in key order.
    ///
    /// # Errors
    ///
    /// * [`CursorError::ConcurrentModification`] if the map was structurally
    ///   modified outside this cursor since the last call.
    /// * [`CursorError::NoCurrentEntry`] if `next` has not produced an entry
    ///   yet, or the produced entry was already removed.
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn remove_current<K, V>(&mut self, map: &mut BstMap<K, V>) -> Result<(K, V), CursorError> {
        self.check(map)?;
        let current = self.current.take().ok_or(CursorError::NoCurrentEntry)?;
        let (entry, spliced) = map.raw.remove_at(current);
        if self.next == Some(spliced) {
            // Two-child removal splices out exactly the queued successor and
            // promotes its payload into the retained node.
            self.next = Some(current);
        }
        self.expected_version = map.raw.version();
        Ok(entry)
    }
}
