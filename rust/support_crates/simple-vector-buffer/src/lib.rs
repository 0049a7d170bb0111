//! Single-owner heap storage for a contiguous run of `T` slots.
//!
//! [`Buffer`] is the raw storage layer underneath `simple_vector::DynamicArray`.
//! It allocates and releases memory but never constructs or drops elements:
//! tracking which slots hold live values is the owner's responsibility.

pub mod buffer;

pub use buffer::Buffer;

#[cfg(test)]
mod tests;
