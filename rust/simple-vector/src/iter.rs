use std::iter::FusedIterator;
use std::{fmt, ptr, slice};

use simple_vector_buffer::Buffer;

use crate::DynamicArray;

/// By-value iterator over the elements of a [`DynamicArray`].
///
/// Owns the array's storage; elements not yielded are dropped together with
/// the iterator.
pub struct IntoIter<T> {
    storage: Buffer<T>,
    /// Index of the next element yielded from the front.
    start: usize,
    /// One past the index of the next element yielded from the back.
    end: usize,
}

impl<T> IntoIter<T> {
    /// Returns the elements that have not been yielded yet.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[start, end)` are live and not yet yielded.
        unsafe {
            slice::from_raw_parts(
                self.storage.as_ptr().add(self.start),
                self.end - self.start,
            )
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: the slot at `start` is live and is read out exactly once.
        let item = unsafe { ptr::read(self.storage.as_ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot at the new `end` is live and is read out exactly once.
        Some(unsafe { ptr::read(self.storage.as_ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        // SAFETY: `[start, end)` are the only live slots left; they are dropped
        // once and the buffer then frees the memory.
        unsafe {
            let rest = ptr::slice_from_raw_parts_mut(
                self.storage.as_mut_ptr().add(self.start),
                remaining,
            );
            self.start = self.end;
            ptr::drop_in_place(rest);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let (storage, len) = self.into_parts();
        IntoIter {
            storage,
            start: 0,
            end: len,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::DynamicArray;

    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_into_iter_yields_in_order() {
        let v = DynamicArray::from(["a".to_string(), "b".to_string(), "c".to_string()]);
        let collected: Vec<String> = v.into_iter().collect();
        assert_eq!(collected, ["a", "b", "c"]);
    }

    #[test]
    fn test_into_iter_from_both_ends() {
        let mut it = DynamicArray::from([1, 2, 3, 4]).into_iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.as_slice(), &[2, 3]);
        assert_eq!(it.next_back(), Some(3));
        assert_eq!(it.next(), Some(2));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn test_into_iter_drops_remainder() {
        let drops = Rc::new(Cell::new(0));
        let mut v = DynamicArray::with_capacity(8);
        for _ in 0..5 {
            v.push_back(Tracked(drops.clone()));
        }
        let mut it = v.into_iter();
        drop(it.next());
        assert_eq!(drops.get(), 1);
        drop(it);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn test_into_iter_of_empty() {
        let v = DynamicArray::<u32>::new();
        assert_eq!(v.into_iter().count(), 0);
    }

    #[test]
    fn test_debug_shows_remaining() {
        let mut it = DynamicArray::from([1, 2, 3]).into_iter();
        it.next();
        assert_eq!(format!("{it:?}"), "IntoIter([2, 3])");
    }
}
