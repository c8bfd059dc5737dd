#![no_std]

//! MatVar Core - Variable-Length Matrix Collection Definitions
//!
//! This crate provides the pure building blocks of a variable-length matrix
//! collection: the error model, the backend matrix capability trait, the
//! column index table with its consistency rules, and the binary framing
//! constants. It performs no I/O.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
#[cfg(feature = "alloc")]
pub mod index;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
#[cfg(feature = "alloc")]
pub use index::ColumnIndex;
pub use traits::*;
pub use validation::*;
