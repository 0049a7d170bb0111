//! Error and result definitions shared by the simple-vector crates.

pub mod error;
pub mod result;

pub use error::{Error, ErrorKind};
pub use result::Result;
