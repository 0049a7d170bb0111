//! A growable array with manually managed storage.
//!
//! [`DynamicArray<T>`] keeps a logical length over a single
//! [`Buffer<T>`](simple_vector_buffer::Buffer) allocation. Appends and
//! insertions into a full array grow the capacity to 1 (from empty) or double
//! it; removals and [`DynamicArray::clear`] never give memory back.
//!
//! # Construction
//!
//! - [`DynamicArray::new`]: empty, no allocation.
//! - [`DynamicArray::with_len`]: `n` default values.
//! - [`DynamicArray::from_elem`] / `dyn_array![v; n]`: `n` clones of `v`.
//! - `DynamicArray::from([a, b, c])` / `dyn_array![a, b, c]`: a literal list.
//! - `DynamicArray::from(reserve(n))`: empty with capacity `n`.
//!
//! # Access
//!
//! [`DynamicArray::at`] is bounds checked and returns
//! [`ErrorKind::OutOfRange`](simple_vector_common::ErrorKind::OutOfRange) past
//! the end. [`DynamicArray::get_unchecked`] is the unchecked fast path. Indexing
//! and all slice methods are available through `Deref<Target = [T]>`.
//!
//! # Examples
//!
//! ```
//! use simple_vector::dyn_array;
//!
//! let mut v = dyn_array![1, 2, 4];
//! assert_eq!(v.insert(2, 3), 2);
//! assert_eq!(v, [1, 2, 3, 4]);
//! assert_eq!(v.capacity(), 6);
//!
//! assert!(v.at(4).is_err());
//! assert_eq!(v.erase(0), 0);
//! assert_eq!(v[0], 2);
//!
//! let moved = std::mem::take(&mut v);
//! assert_eq!(v.capacity(), 0);
//! assert_eq!(moved.len(), 3);
//! ```

pub mod array;
pub mod iter;
mod macros;
pub mod reserve;
mod traits;

pub use array::DynamicArray;
pub use iter::IntoIter;
pub use reserve::{ReserveProxy, reserve};
pub use simple_vector_common::{Error, ErrorKind, Result};
