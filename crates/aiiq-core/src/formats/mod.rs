//! # Formats Module
//!
//! Byte-level encodings of stored submissions.
//!
//! File I/O is in `storage`; everything here is a pure transformation.

mod table;

pub use table::*;
