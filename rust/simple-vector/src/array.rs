use std::{mem, ptr, slice};

use simple_vector_buffer::Buffer;
use simple_vector_common::{Result, result::verify_index};

/// A growable, contiguous sequence of `T` backed by a single [`Buffer`].
///
/// The slots `[0, len)` hold live values; `[len, capacity)` is spare storage.
/// When an append or insertion finds the array full, capacity grows to 1 (from
/// empty) or doubles.
///
/// Element access comes in two flavors: [`DynamicArray::at`] checks the index
/// and reports [`ErrorKind::OutOfRange`](simple_vector_common::ErrorKind::OutOfRange),
/// while [`DynamicArray::get_unchecked`] skips the check entirely. Plain
/// indexing (`array[i]`) follows slice semantics and panics when out of range.
pub struct DynamicArray<T> {
    /// Backing storage; its capacity is the capacity of the array.
    storage: Buffer<T>,
    /// Number of live elements at the front of `storage`.
    len: usize,
}

impl<T> DynamicArray<T> {
    /// Creates an empty array without allocating.
    pub const fn new() -> DynamicArray<T> {
        DynamicArray {
            storage: Buffer::empty(),
            len: 0,
        }
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    ///
    /// No element is constructed.
    pub fn with_capacity(capacity: usize) -> DynamicArray<T> {
        DynamicArray {
            storage: Buffer::new(capacity),
            len: 0,
        }
    }

    /// Creates an array of `len` default values, with `capacity == len`.
    pub fn with_len(len: usize) -> DynamicArray<T>
    where
        T: Default,
    {
        let mut array = DynamicArray::with_capacity(len);
        for _ in 0..len {
            // SAFETY: the array was allocated with room for `len` elements.
            unsafe { array.push_unchecked(T::default()) };
        }
        array
    }

    /// Creates an array of `len` clones of `value`, with `capacity == len`.
    pub fn from_elem(len: usize, value: T) -> DynamicArray<T>
    where
        T: Clone,
    {
        let mut array = DynamicArray::with_capacity(len);
        for _ in 0..len {
            // SAFETY: the array was allocated with room for `len` elements.
            unsafe { array.push_unchecked(value.clone()) };
        }
        array
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of elements the array can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// Returns the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Returns a pointer to the first element.
    ///
    /// For an empty array the pointer is unspecified: it may or may not point
    /// into an allocation, and must not be dereferenced.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Returns a mutable pointer to the first element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Returns a reference to the element at `index`, or `OutOfRange` if
    /// `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T> {
        verify_index(index, self.len)?;
        // SAFETY: the index was checked against `len` above.
        Ok(unsafe { self.get_unchecked(index) })
    }

    /// Returns a mutable reference to the element at `index`, or `OutOfRange`
    /// if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        verify_index(index, self.len)?;
        // SAFETY: the index was checked against `len` above.
        Ok(unsafe { self.get_unchecked_mut(index) })
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`DynamicArray::len`].
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index < len`, so the slot is live.
        unsafe { &*self.storage.as_ptr().add(index) }
    }

    /// Returns a mutable reference to the element at `index` without bounds
    /// checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`DynamicArray::len`].
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index < len`, so the slot is live.
        unsafe { &mut *self.storage.as_mut_ptr().add(index) }
    }

    /// Removes all elements. Capacity and storage are kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Changes the length to `new_len`.
    ///
    /// Shrinking drops the tail and keeps the storage. Growing fills
    /// `[len, new_len)` with default values, reallocating to
    /// `max(new_len, 2 * capacity)` first if the current capacity is too small.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        if new_len > self.capacity() {
            let grown = new_len.max(self.capacity().saturating_mul(2));
            self.reallocate(Buffer::new(grown));
        }
        while self.len < new_len {
            // SAFETY: capacity is at least `new_len` at this point.
            unsafe { self.push_unchecked(T::default()) };
        }
    }

    /// Ensures the capacity is at least `new_capacity`, reallocating to exactly
    /// that many slots if needed. The length is unchanged.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.capacity() {
            self.reallocate(Buffer::new(new_capacity));
        }
    }

    /// Fallible version of [`DynamicArray::reserve`].
    ///
    /// On error the array is left untouched.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity > self.capacity() {
            self.reallocate(Buffer::try_new(new_capacity)?);
        }
        Ok(())
    }

    /// Appends `item`, doubling the capacity if the array is full.
    pub fn push_back(&mut self, item: T) {
        self.grow_for(1);
        // SAFETY: there is at least one spare slot.
        unsafe { self.push_unchecked(item) };
    }

    /// Inserts `value` at `index`, shifting the elements after it to the right,
    /// and returns the index of the inserted value.
    ///
    /// Inserting at `len` is equivalent to [`DynamicArray::push_back`]. A full
    /// array is rebuilt into storage of twice the capacity (1 if empty) with
    /// `value` placed directly in its final slot.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );

        if len == self.capacity() {
            let mut storage = Buffer::new(self.grown_capacity());
            log::trace!(
                "insert at {index} grows dynamic array: capacity {} -> {}",
                self.capacity(),
                storage.capacity()
            );
            // SAFETY: the new buffer holds at least `len + 1` slots and does not
            // overlap the old one. Live values are moved bitwise, and the old
            // buffer is released without dropping them.
            unsafe {
                let src = self.storage.as_ptr();
                let dst = storage.as_mut_ptr();
                ptr::copy_nonoverlapping(src, dst, index);
                ptr::write(dst.add(index), value);
                ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), len - index);
            }
            self.storage.swap(&mut storage);
        } else {
            // SAFETY: `len < capacity`, so shifting `[index, len)` one slot to the
            // right stays in bounds; `ptr::copy` handles the overlap.
            unsafe {
                let at = self.storage.as_mut_ptr().add(index);
                ptr::copy(at, at.add(1), len - index);
                ptr::write(at, value);
            }
        }
        self.len = len + 1;
        index
    }

    /// Removes and returns the last element, or `None` if the array is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` is live and is now outside the
        // live prefix, so it is read out exactly once.
        Some(unsafe { ptr::read(self.storage.as_ptr().add(self.len)) })
    }

    /// Drops the element at `index` and shifts the following elements left.
    ///
    /// Returns `index`, which now addresses the element that followed the
    /// erased one, or equals `len` if the last element was erased.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        // SAFETY: `index < len`; the erased value is read out once, the tail
        // closes the gap, and `len` is updated before the value is dropped.
        unsafe {
            let at = self.storage.as_mut_ptr().add(index);
            let erased = ptr::read(at);
            ptr::copy(at.add(1), at, len - index - 1);
            self.len = len - 1;
            drop(erased);
        }
        index
    }

    /// Exchanges contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut DynamicArray<T>) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Writes `item` into the first spare slot.
    ///
    /// # Safety
    ///
    /// `len` must be less than `capacity`.
    #[inline]
    unsafe fn push_unchecked(&mut self, item: T) {
        debug_assert!(self.len < self.capacity());
        // SAFETY: the caller guarantees a spare slot at `len`.
        unsafe { ptr::write(self.storage.as_mut_ptr().add(self.len), item) };
        self.len += 1;
    }

    /// Drops the elements in `[new_len, len)`. Storage is kept.
    fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail_len = self.len - new_len;
        self.len = new_len;
        // SAFETY: `[new_len, new_len + tail_len)` were live and are now outside
        // the live prefix, so they are dropped exactly once.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(
                self.storage.as_mut_ptr().add(new_len),
                tail_len,
            );
            ptr::drop_in_place(tail);
        }
    }

    /// Capacity after one growth step: 1 from empty, doubled otherwise.
    fn grown_capacity(&self) -> usize {
        match self.capacity() {
            0 => 1,
            capacity => capacity.saturating_mul(2),
        }
    }

    /// Makes room for `additional` more elements. When the spare capacity is
    /// too small, grows to `len + additional` or one growth step, whichever is
    /// larger.
    pub(crate) fn grow_for(&mut self, additional: usize) {
        if additional <= self.capacity() - self.len {
            return;
        }
        let required = self.len.saturating_add(additional);
        self.reallocate(Buffer::new(required.max(self.grown_capacity())));
    }

    /// Moves the live elements into `storage` and adopts it, releasing the
    /// previous allocation.
    fn reallocate(&mut self, mut storage: Buffer<T>) {
        debug_assert!(storage.capacity() >= self.len);
        log::trace!(
            "reallocating dynamic array: capacity {} -> {}, len {}",
            self.capacity(),
            storage.capacity(),
            self.len
        );
        // SAFETY: both buffers have room for `len` elements and do not overlap.
        // The old buffer is released without dropping the moved values.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), storage.as_mut_ptr(), self.len);
        }
        self.storage.swap(&mut storage);
    }

    /// Splits the array into its storage and live length without dropping
    /// anything.
    pub(crate) fn into_parts(self) -> (Buffer<T>, usize) {
        let mut this = mem::ManuallyDrop::new(self);
        (mem::take(&mut this.storage), this.len)
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Deep copy; the copy's capacity equals the source's length.
    fn clone(&self) -> Self {
        let mut copy = DynamicArray::with_capacity(self.len);
        for item in self.as_slice() {
            // SAFETY: `copy` was allocated with room for `self.len` elements.
            unsafe { copy.push_unchecked(item.clone()) };
        }
        copy
    }

    /// Copy assignment. Assigning an array to itself is a no-op; otherwise a
    /// full copy is built before `self` is touched.
    fn clone_from(&mut self, source: &Self) {
        if ptr::eq(self, source) {
            return;
        }
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        DynamicArray::new()
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: the live prefix is dropped once; the buffer then frees the
        // memory without touching the slots.
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) };
    }
}
