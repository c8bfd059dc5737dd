//! Validation utilities for collections
//!
//! Pure functions with no I/O: checked conversions to and from the on-disk
//! integer width, the overflow-checked non-zero accumulator, and parsing of
//! range strings.

pub mod bounds;
pub mod parsing;

pub use bounds::{accumulate_nonzero, from_frame_int, to_frame_int};
pub use parsing::parse_range;
#[cfg(feature = "alloc")]
pub use parsing::parse_index_list;
