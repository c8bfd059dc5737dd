//! Backend matrix capability interface
//!
//! A variable-length matrix collection does not care how its columns are
//! stored. Any type implementing [`ColumnMatrix`] can back it, dense or
//! sparse alike.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::error::Result;

/// Column-addressable matrix usable as the backing store of a collection
///
/// Columns are the unit of partitioning: gathering, concatenation and
/// transfer all operate on whole columns and preserve column order.
pub trait ColumnMatrix: Clone + Default {
    /// Number of rows
    fn row_num(&self) -> usize;

    /// Number of columns
    fn col_num(&self) -> usize;

    /// Number of stored non-zero elements
    fn nonzero_num(&self) -> usize;

    /// Build a new matrix holding the listed columns of `self`, in order
    ///
    /// Columns may repeat. The result has `self.row_num()` rows and
    /// `cols.len()` columns. Fails with `ColumnOutOfRange` when a listed
    /// column does not exist.
    fn gather_columns(&self, cols: &[usize]) -> Result<Self>;

    /// Append the columns of `other` after the columns of `self`
    ///
    /// Fails with `IncompatibleShape` when row counts differ.
    fn cbind(&mut self, other: &Self) -> Result<()>;

    /// Build one matrix from `sources` laid side by side, taking their storage
    ///
    /// `row_num`, `col_num` and `nonzero_num` are the already validated totals
    /// and serve as allocation hints.
    #[cfg(feature = "alloc")]
    fn transfer_from(
        sources: Vec<Self>,
        row_num: usize,
        col_num: usize,
        nonzero_num: u64,
    ) -> Result<Self>;

    /// Matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize) {
        (self.row_num(), self.col_num())
    }
}
