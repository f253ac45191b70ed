use alloc::vec::Vec;

use super::handle::Handle;

/// A slot arena with a free list.
///
/// Handles stay stable across unrelated allocations and frees; a freed slot is
/// recycled by the next `alloc`. The arena exclusively owns its elements, so
/// "discard a node" is a plain `take`/`free` rather than pointer surgery.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live (non-freed) elements.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            // Strict less-than: slots.len() must stay representable as a Handle
            // after the push.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns a reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    #[inline]
    pub(crate) unsafe fn get_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a T {
        // SAFETY: Caller guarantees ptr is valid. We only read from the slots field.
        unsafe { (&(*ptr).slots)[handle.to_index()].as_ref().expect("`Arena::get_ptr()` - `handle` is invalid!") }
    }

    /// Returns a mutable reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    /// - The caller must have logical exclusive access to the element at `handle`
    ///   and must not hold another reference into this arena.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        // SAFETY: Caller guarantees ptr is valid and the element is exclusively
        // accessed. We only touch the slots field.
        unsafe { (&mut (*ptr).slots)[handle.to_index()].as_mut().expect("`Arena::get_mut_ptr()` - `handle` is invalid!") }
    }

    /// Returns mutable references to two distinct elements at once.
    pub(crate) fn get2_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (i, j) = (a.to_index(), b.to_index());
        assert_ne!(i, j, "`Arena::get2_mut()` - handles must be distinct!");
        fn expect<T>(slot: Option<&mut T>) -> &mut T {
            slot.expect("`Arena::get2_mut()` - `handle` is invalid!")
        }
        if i < j {
            let (lo, hi) = self.slots.split_at_mut(j);
            (expect(lo[i].as_mut()), expect(hi[0].as_mut()))
        } else {
            let (lo, hi) = self.slots.split_at_mut(i);
            let (first, second) = (expect(hi[0].as_mut()), expect(lo[j].as_mut()));
            (first, second)
        }
    }

    /// Removes and returns the element at `handle`, recycling its slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Alloc(u32),
        Get(usize),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            20 => any::<u32>().prop_map(Op::Alloc),
            6 => any::<usize>().prop_map(Op::Get),
            6 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Op::GetMut(which, value)),
            6 => any::<usize>().prop_map(Op::Take),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        // Drives the arena with random alloc/take/clear traffic and checks every
        // live handle against a Vec model after each step.
        #[test]
        fn arena_matches_model(ops in prop::collection::vec(op_strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for op in ops {
                match op {
                    Op::Alloc(value) => {
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Op::Get(which) => {
                        if let Some(&(handle, value)) = pick(&model, which) {
                            prop_assert_eq!(*arena.get(handle), value);
                        }
                    }
                    Op::GetMut(which, value) => {
                        let Some(index) = index_of(&model, which) else { continue };
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Op::Take(which) => {
                        let Some(index) = index_of(&model, which) else { continue };
                        let (handle, expected) = model.swap_remove(index);
                        prop_assert_eq!(arena.take(handle), expected);
                    }
                    Op::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    fn pick<T>(model: &[T], which: usize) -> Option<&T> {
        index_of(model, which).map(|index| &model[index])
    }

    fn index_of<T>(model: &[T], which: usize) -> Option<usize> {
        if model.is_empty() { None } else { Some(which % model.len()) }
    }

    #[test]
    fn slots_are_recycled() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let _b = arena.alloc(2);
        assert_eq!(arena.take(a), 1);
        // The freed slot is handed back out before the arena grows.
        let c = arena.alloc(3);
        assert_eq!(c, a);
        assert_eq!(arena.len(), 2);
    }
}
