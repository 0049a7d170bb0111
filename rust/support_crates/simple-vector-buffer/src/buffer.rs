//! `Buffer<T>`: an exclusively owned, fixed-size heap allocation of `T` slots.
//!
//! The buffer is move-only. It hands out its slots as `MaybeUninit<T>` and
//! leaves construction and destruction of the values stored in them to the
//! caller. Dropping a buffer releases the allocation without running any
//! element destructors.

use std::{
    alloc::{self, Layout},
    fmt,
    marker::PhantomData,
    mem::{self, ManuallyDrop, MaybeUninit},
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr::NonNull,
    slice,
};

use simple_vector_common::{Error, Result};

/// Exclusively owned storage for `capacity` contiguous slots of `T`.
///
/// An empty buffer (capacity 0) holds no allocation. Zero-sized element types
/// never allocate either, but still report the requested capacity.
pub struct Buffer<T> {
    /// Start of the allocation, or a dangling, well-aligned pointer when
    /// nothing is allocated.
    ptr: NonNull<T>,
    /// Number of `T` slots the allocation was made for.
    capacity: usize,
    _marker: PhantomData<T>,
}

/// Why a raw allocation request could not be satisfied.
enum AllocFailure {
    CapacityOverflow,
    Exhausted(Layout),
}

impl<T> Buffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates a buffer that owns nothing.
    pub const fn empty() -> Buffer<T> {
        Buffer {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates storage for `capacity` slots of `T`.
    ///
    /// A zero `capacity` produces an empty buffer without touching the allocator.
    ///
    /// # Panics
    ///
    /// Panics if the total byte size overflows `isize::MAX`. Aborts through
    /// [`std::alloc::handle_alloc_error`] if the allocator cannot satisfy the
    /// request.
    pub fn new(capacity: usize) -> Buffer<T> {
        match Self::allocate(capacity) {
            Ok(buffer) => buffer,
            Err(AllocFailure::CapacityOverflow) => capacity_overflow(capacity),
            Err(AllocFailure::Exhausted(layout)) => alloc::handle_alloc_error(layout),
        }
    }

    /// Fallible version of [`Buffer::new`].
    ///
    /// # Errors
    ///
    /// Returns `CapacityOverflow` if the byte size of the request is not
    /// representable, and `AllocationFailed` if the allocator returned null.
    pub fn try_new(capacity: usize) -> Result<Buffer<T>> {
        Self::allocate(capacity).map_err(|failure| match failure {
            AllocFailure::CapacityOverflow => {
                log::debug!("buffer of {capacity} slots overflows the address space");
                Error::capacity_overflow(capacity)
            }
            AllocFailure::Exhausted(layout) => {
                log::debug!(
                    "allocator refused {} bytes for a buffer of {capacity} slots",
                    layout.size()
                );
                Error::allocation_failed(layout.size())
            }
        })
    }

    fn allocate(capacity: usize) -> std::result::Result<Buffer<T>, AllocFailure> {
        if capacity == 0 {
            return Ok(Buffer::empty());
        }
        if Self::IS_ZST {
            return Ok(Buffer {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }
        let layout = Layout::array::<T>(capacity).map_err(|_| AllocFailure::CapacityOverflow)?;
        // SAFETY: `capacity > 0` and `T` is not zero-sized, so `layout` has a
        // non-zero size.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<T>();
        let ptr = NonNull::new(ptr).ok_or(AllocFailure::Exhausted(layout))?;
        Ok(Buffer {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Adopts an allocation previously given up by [`Buffer::into_raw_parts`]
    /// or [`Buffer::release`].
    ///
    /// # Safety
    ///
    /// `ptr` and `capacity` must be exactly a pair returned by `into_raw_parts`
    /// or `release` for the same `T`, and the allocation must not be adopted
    /// or freed anywhere else.
    pub unsafe fn from_raw_parts(ptr: *mut T, capacity: usize) -> Buffer<T> {
        if capacity == 0 {
            return Buffer::empty();
        }
        debug_assert!(!ptr.is_null());
        Buffer {
            // SAFETY: a non-empty buffer never hands out a null pointer.
            ptr: unsafe { NonNull::new_unchecked(ptr) },
            capacity,
            _marker: PhantomData,
        }
    }

    /// Consumes the buffer and returns its raw pointer and capacity without
    /// freeing anything.
    ///
    /// The caller becomes responsible for the allocation; the only way to
    /// release it is to re-adopt it with [`Buffer::from_raw_parts`].
    #[must_use = "discarding the raw parts leaks the allocation"]
    pub fn into_raw_parts(self) -> (*mut T, usize) {
        let this = ManuallyDrop::new(self);
        (this.ptr.as_ptr(), this.capacity)
    }

    /// Gives up ownership of the allocation and leaves `self` empty.
    ///
    /// See [`Buffer::into_raw_parts`].
    #[must_use = "discarding the released pointer leaks the allocation"]
    pub fn release(&mut self) -> (*mut T, usize) {
        mem::take(self).into_raw_parts()
    }

    /// Returns the number of slots this buffer owns.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the buffer holds a live heap allocation.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0 && !Self::IS_ZST
    }

    /// Returns the raw pointer to the first slot, without giving up ownership.
    ///
    /// For an empty buffer the pointer is dangling and must not be
    /// dereferenced.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns the mutable raw pointer to the first slot.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns all slots as possibly-uninitialized storage.
    #[inline]
    pub fn as_slots(&self) -> &[MaybeUninit<T>] {
        // SAFETY: the pointer is valid for `capacity` slots (or dangling with
        // `capacity == 0`, or the type is zero-sized), and `MaybeUninit<T>`
        // places no requirement on slot contents.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Returns all slots as possibly-uninitialized mutable storage.
    #[inline]
    pub fn as_slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: see `as_slots`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Returns the slot at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`Buffer::capacity`].
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &MaybeUninit<T> {
        debug_assert!(index < self.capacity);
        // SAFETY: the caller guarantees `index < capacity`.
        unsafe { &*self.ptr.as_ptr().add(index).cast::<MaybeUninit<T>>() }
    }

    /// Returns the mutable slot at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`Buffer::capacity`].
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        debug_assert!(index < self.capacity);
        // SAFETY: the caller guarantees `index < capacity`.
        unsafe { &mut *self.ptr.as_ptr().add(index).cast::<MaybeUninit<T>>() }
    }

    /// Exchanges the allocations owned by `self` and `other` in O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut Buffer<T>) {
        mem::swap(self, other);
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Buffer::empty()
    }
}

impl<T> Deref for Buffer<T> {
    type Target = [MaybeUninit<T>];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slots()
    }
}

impl<T> DerefMut for Buffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_slots_mut()
    }
}

impl<T> Index<usize> for Buffer<T> {
    type Output = MaybeUninit<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slots()[index]
    }
}

impl<T> IndexMut<usize> for Buffer<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.as_slots_mut()[index]
    }
}

impl<T> Drop for Buffer<T> {
    /// Returns the allocation to the global allocator. Slot contents are not
    /// dropped.
    fn drop(&mut self) {
        if self.is_allocated() {
            // SAFETY: the same layout was validated by `Layout::array` when
            // the allocation was made.
            unsafe {
                let layout = Layout::from_size_align_unchecked(
                    mem::size_of::<T>() * self.capacity,
                    mem::align_of::<T>(),
                );
                alloc::dealloc(self.ptr.as_ptr().cast(), layout);
            }
        }
    }
}

// SAFETY: `Buffer<T>` uniquely owns its allocation, so it can move between
// threads whenever the values it may hold can.
unsafe impl<T: Send> Send for Buffer<T> {}

// SAFETY: shared access only hands out shared references to the slots.
unsafe impl<T: Sync> Sync for Buffer<T> {}

impl<T> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cold]
fn capacity_overflow(requested: usize) -> ! {
    panic!("capacity overflow: cannot allocate {requested} slots")
}
