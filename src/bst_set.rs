use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::bst_map::{self, BstMap, CursorError};

/// An ordered set based on an unbalanced binary search tree.
///
/// A thin adapter over [`BstMap<T, ()>`]: every element is stored as a key
/// mapped to the unit value, so ordering, duplicate handling, removal
/// splicing, and fail-fast cursors are exactly the map's. See [`BstMap`] for
/// the performance profile and the caveats about mutating stored elements or
/// supplying an inconsistent comparator.
///
/// # Examples
///
/// ```
/// use bst_tree::BstSet;
///
/// // Type inference lets us omit an explicit type signature (which
/// // would be `BstSet<&str>` in this example).
/// let mut books = BstSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains(&"The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove(&"The Odyssey");
///
/// // Iterate over everything in order.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
pub struct BstSet<T> {
    map: BstMap<T, ()>,
}

/// An iterator over the items of a `BstSet`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`BstSet`]. See its
/// documentation for more.
///
/// [`iter`]: BstSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: bst_map::Keys<'a, T, ()>,
}

/// An owning iterator over the items of a `BstSet`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`BstSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T> {
    inner: bst_map::IntoIter<T, ()>,
}

/// A detached, fail-fast cursor over the items of a [`BstSet`], in ascending
/// order.
///
/// Created by the [`cursor`](BstSet::cursor) method. Semantics are those of
/// the map cursor ([`bst_map::Cursor`]): no borrow is held, the set is
/// re-presented on every call, outside structural modification is reported as
/// [`CursorError::ConcurrentModification`], and
/// [`remove_current`](Cursor::remove_current) removes through the cursor
/// without invalidating it.
///
/// # Examples
///
/// ```
/// use bst_tree::BstSet;
///
/// let mut set = BstSet::from([1, 2, 3, 4]);
///
/// let mut cursor = set.cursor();
/// while let Some(&item) = cursor.next(&set).unwrap() {
///     if item % 2 == 0 {
///         assert_eq!(cursor.remove_current(&mut set), Ok(item));
///     }
/// }
/// let remaining: Vec<_> = set.iter().copied().collect();
/// assert_eq!(remaining, [1, 3]);
/// ```
#[derive(Clone, Debug)]
#[must_use = "cursors do nothing unless stepped with `next`"]
pub struct Cursor {
    inner: bst_map::Cursor,
}

impl<T> BstSet<T> {
    /// Makes a new, empty `BstSet` ordered by the item type's [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let mut set: BstSet<i32> = BstSet::new();
    /// ```
    #[must_use]
    pub const fn new() -> BstSet<T> {
        BstSet { map: BstMap::new() }
    }

    /// Makes a new, empty `BstSet` ordered by `comparator`.
    ///
    /// The comparator replaces the item type's natural ordering for every
    /// operation on this set, and must implement a consistent total order
    /// over all items ever inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let mut set = BstSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// set.extend([1, 2, 3]);
    ///
    /// let items: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(items, [3, 2, 1]);
    /// ```
    pub fn with_comparator<F>(comparator: F) -> BstSet<T>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        BstSet {
            map: BstMap::with_comparator(comparator),
        }
    }

    /// Returns the number of items in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let mut v = BstSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no items.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let mut v = BstSet::new();
    /// assert!(v.is_empty());
    /// v.insert(1);
    /// assert!(!v.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all items.
    ///
    /// Counts as a structural change: any active [`Cursor`] fails fast on its
    /// next use.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let mut v = BstSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Gets an iterator over the items of the set, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let set = BstSet::from([3, 1, 2]);
    /// let items: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(items, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.keys(),
        }
    }

    /// Creates a detached [`Cursor`] positioned before the first item.
    ///
    /// See [`BstMap::cursor`] for the fail-fast contract. The cursor must
    /// only be presented the set that created it.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            inner: self.map.cursor(),
        }
    }
}

impl<T: Ord> BstSet<T> {
    /// Returns `true` if the set contains an item equal to the value.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let set = BstSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    pub fn contains(&self, item: &T) -> bool {
        self.map.contains_key(item)
    }

    /// Adds an item to the set.
    ///
    /// Returns whether the item was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal item, `true` is
    ///   returned.
    /// - If the set already contained an equal item, `false` is returned, and
    ///   the stored item is replaced by the new one (by node substitution, as
    ///   with [`BstMap::insert`]).
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let mut set = BstSet::new();
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, item: T) -> bool {
        self.map.insert(item, ()).is_none()
    }

    /// Removes an item from the set. Returns whether such an item was
    /// present.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let mut set = BstSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove(&mut self, item: &T) -> bool {
        self.map.remove(item).is_some()
    }
}

impl Cursor {
    /// Advances the cursor and returns the next item in order, or `Ok(None)`
    /// once the items are exhausted.
    ///
    /// # Errors
    ///
    /// [`CursorError::ConcurrentModification`] if the set was structurally
    /// modified outside this cursor since the last call.
    pub fn next<'a, T>(&mut self, set: &'a BstSet<T>) -> Result<Option<&'a T>, CursorError> {
        Ok(self.inner.next(&set.map)?.map(|(item, _)| item))
    }

    /// Removes the item most recently produced by [`next`](Cursor::next) and
    /// returns it, leaving the cursor positioned to continue in order.
    ///
    /// # Errors
    ///
    /// * [`CursorError::ConcurrentModification`] if the set was structurally
    ///   modified outside this cursor since the last call.
    /// * [`CursorError::NoCurrentEntry`] if `next` has not produced an item
    ///   yet, or the produced item was already removed.
    pub fn remove_current<T>(&mut self, set: &mut BstSet<T>) -> Result<T, CursorError> {
        let (item, ()) = self.inner.remove_current(&mut set.map)?;
        Ok(item)
    }
}

impl<T: PartialEq> PartialEq for BstSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for BstSet<T> {}

impl<T: fmt::Debug> fmt::Debug for BstSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for BstSet<T> {
    fn default() -> Self {
        BstSet::new()
    }
}

impl<T: Ord> FromIterator<T> for BstSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = BstSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for BstSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T: Ord + Copy> Extend<&'a T> for BstSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &item in iter {
            self.insert(item);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for BstSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a BstSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for BstSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the items of the set, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_tree::BstSet;
    ///
    /// let set = BstSet::from([3, 1, 2]);
    /// let items: Vec<_> = set.into_iter().collect();
    /// assert_eq!(items, [1, 2, 3]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.inner.len()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(item, ())| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.inner.len()).finish()
    }
}
