use crate::DynamicArray;

/// Construction tag asking for an empty [`DynamicArray`] with a given capacity.
///
/// Distinguishes "reserve room for `n` elements" from "make `n` elements"
/// ([`DynamicArray::with_len`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveProxy {
    capacity: usize,
}

impl ReserveProxy {
    /// Creates a tag for `capacity` slots.
    pub const fn new(capacity: usize) -> ReserveProxy {
        ReserveProxy { capacity }
    }

    /// Returns the requested capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Returns a [`ReserveProxy`] for `capacity` slots.
///
/// ```
/// use simple_vector::{DynamicArray, reserve};
///
/// let v: DynamicArray<String> = reserve(10).into();
/// assert_eq!(v.len(), 0);
/// assert_eq!(v.capacity(), 10);
/// ```
pub const fn reserve(capacity: usize) -> ReserveProxy {
    ReserveProxy::new(capacity)
}

impl<T> From<ReserveProxy> for DynamicArray<T> {
    fn from(proxy: ReserveProxy) -> Self {
        DynamicArray::with_capacity(proxy.capacity())
    }
}
