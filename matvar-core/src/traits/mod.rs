//! Abstract interfaces for variable-length matrix collections
//!
//! Traits are pure interfaces; concrete backends live in the `matvar` crate.

pub mod backend;
pub mod element;
pub mod matrix;

pub use backend::StorageBackend;
pub use element::MatrixElement;
pub use matrix::ColumnMatrix;
