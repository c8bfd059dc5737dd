//! MatVar - Variable-Length Matrix Collections
//!
//! A collection stores many variable-width data points (sequences, bags of
//! feature vectors) in one backing matrix. Each data point owns a contiguous
//! block of columns, recorded as a `(begin, end)` pair in a column index
//! table.
//!
//! ## Architecture
//!
//! MatVar keeps definitions and implementation in separate crates:
//!
//! - **matvar-core**: Error model, backend matrix traits, the column index
//!   table and its consistency rules (no I/O)
//! - **matvar**: The [`MatVar`] container, dense and sparse backends, and
//!   the binary stream and file codec
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matvar::{DenseMatrix, MatVar};
//!
//! fn example() -> matvar::Result<()> {
//!     // Two data points of width 2 and 1
//!     let a = DenseMatrix::from_column_major(3, 2, vec![1.0f32; 6])?;
//!     let b = DenseMatrix::from_column_major(3, 1, vec![2.0f32; 3])?;
//!
//!     let mut collection = MatVar::new();
//!     collection.transfer_from(vec![a, b], None)?;
//!     println!("{}", collection.shape_str()); // 3 x 3, #data=2
//!
//!     // Reorder data points and persist the result
//!     let reversed = collection.select(&[1, 0])?;
//!     reversed.write_file("reversed.mv")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap**: Memory-map large collection files when reading
//! - **serde**: Serialize shapes and configuration
//! - **cli**: The `matvar` command-line tool

pub use matvar_core::{
    // Core traits
    ColumnMatrix, MatrixElement, StorageBackend,
    // Format definitions
    DataType, MatrixKind,
    // Index table
    ColumnIndex,
    // Error handling
    ErrorCategory, MatVarError, Result,
    // Parsing utilities
    parse_index_list, parse_range,
};

pub mod codec;
pub mod config;
pub mod container;
pub mod dense;
pub mod file_io;
pub mod sparse;

pub use codec::MatrixIo;
pub use config::IoConfig;
pub use container::{MatVar, MatVarShape};
pub use dense::DenseMatrix;
pub use file_io::FileBytes;
pub use sparse::SparseMatrix;
