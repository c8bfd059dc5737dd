//! Binary layout definitions for serialized collections
//!
//! Pure layout definitions; reading and writing live in the `matvar` crate.

pub mod constants;
pub mod data_type;

pub use constants::*;
pub use data_type::{DataType, MatrixKind};
