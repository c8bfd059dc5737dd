//! Framing constants for serialized collections
//!
//! A serialized collection is laid out as:
//!
//! ```text
//! [data_num: i32 LE]
//! [index length: i32 LE][index values: i32 LE * length]
//! [backend matrix encoding]
//! ```
//!
//! The framing is the same for every backend; only the trailing matrix
//! encoding differs.

/// Width in bytes of a framed integer (`data_num`, lengths, index values)
pub const FRAME_INT_SIZE: usize = 4;

/// Width in bytes of a wide count (sparse non-zero count and column pointers)
pub const WIDE_INT_SIZE: usize = 8;

/// Width in bytes of the element type tag leading every matrix encoding
pub const DATA_TYPE_TAG_SIZE: usize = 1;

/// Width in bytes of the `[tag][rows][cols]` prefix shared by all matrix encodings
pub const MATRIX_PREFIX_SIZE: usize = DATA_TYPE_TAG_SIZE + 2 * FRAME_INT_SIZE;

