//! Column index table for variable-length matrix collections
//!
//! The table is a flat sequence of `i32` values read as `(begin, end)`
//! pairs. Pair `i` gives the half-open column range `[begin, end)` of data
//! point `i` within the backing matrix. Values are signed because tables
//! may arrive from callers or from disk before they are validated.

use alloc::vec::Vec;
use core::ops::Range;

use crate::validation::to_frame_int;
use crate::{MatVarError, Result};

/// Flat table of begin/end column boundaries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    values: Vec<i32>,
}

impl ColumnIndex {
    /// Create an empty table
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Wrap raw values without validation
    pub fn from_values(values: Vec<i32>) -> Self {
        Self { values }
    }

    /// Tile `col_num` columns so that every column is one data point
    pub fn one_per_column(col_num: usize) -> Result<Self> {
        let end = to_frame_int(col_num, "ColumnIndex::one_per_column")?;
        let mut values = Vec::with_capacity(col_num * 2);
        for col in 0..end {
            values.push(col);
            values.push(col + 1);
        }
        Ok(Self { values })
    }

    /// Lay out data points of the given widths contiguously from column 0
    ///
    /// Returns the table together with the total column count.
    pub fn from_widths<I>(widths: I) -> Result<(Self, usize)>
    where
        I: IntoIterator<Item = usize>,
    {
        let widths = widths.into_iter();
        let mut values = Vec::with_capacity(widths.size_hint().0 * 2);
        let mut offset = 0usize;
        for width in widths {
            values.push(to_frame_int(offset, "ColumnIndex::from_widths")?);
            offset = offset
                .checked_add(width)
                .ok_or(MatVarError::CapacityExceeded {
                    op: "ColumnIndex::from_widths",
                    reason: "total column count overflows",
                })?;
            values.push(to_frame_int(offset, "ColumnIndex::from_widths")?);
        }
        Ok((Self { values }, offset))
    }

    /// Number of stored values (twice the number of pairs when well formed)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of complete `(begin, end)` pairs
    pub fn pair_count(&self) -> usize {
        self.values.len() / 2
    }

    /// Raw values
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    /// Value at `pos`, if any
    pub fn get(&self, pos: usize) -> Option<i32> {
        self.values.get(pos).copied()
    }

    /// Overwrite the value at `pos`
    pub fn set(&mut self, pos: usize, value: i32) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(pos)
            .ok_or(MatVarError::ColumnOutOfRange {
                op: "ColumnIndex::set",
                col: pos,
                col_num: len,
            })?;
        *slot = value;
        Ok(())
    }

    /// Append one value
    pub fn push(&mut self, value: i32) {
        self.values.push(value);
    }

    /// Append one `(begin, end)` pair
    pub fn push_pair(&mut self, begin: i32, end: i32) {
        self.values.push(begin);
        self.values.push(end);
    }

    /// Replace the contents with the integers `first..last`
    pub fn fill_range(&mut self, first: i32, last: i32) {
        self.values.clear();
        self.values.extend(first..last);
    }

    /// Append every value of `other` shifted by `offset`
    pub fn concat_shifted(&mut self, other: &ColumnIndex, offset: i32) -> Result<()> {
        self.values.reserve(other.values.len());
        for &value in &other.values {
            let shifted = value
                .checked_add(offset)
                .ok_or(MatVarError::CapacityExceeded {
                    op: "ColumnIndex::concat_shifted",
                    reason: "shifted column index exceeds a 4-byte signed integer",
                })?;
            self.values.push(shifted);
        }
        Ok(())
    }

    /// Raw `(begin, end)` pair of data point `idx`
    pub fn pair(&self, idx: usize) -> Option<(i32, i32)> {
        let begin = *self.values.get(idx * 2)?;
        let end = *self.values.get(idx * 2 + 1)?;
        Some((begin, end))
    }

    /// Iterate over raw `(begin, end)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.values.chunks_exact(2).map(|p| (p[0], p[1]))
    }

    /// Verify the table against a data point count and a column count
    ///
    /// Checks, in order: the table holds exactly `data_num` pairs; every
    /// range starts at or after column 0, has non-negative width and ends
    /// within `col_num`; the last range ends exactly at `col_num`.
    /// Adjacency between ranges is not checked.
    pub fn check_consistency(&self, data_num: usize, col_num: usize, op: &'static str) -> Result<()> {
        if data_num.checked_mul(2) != Some(self.values.len()) {
            return Err(MatVarError::DataCountConflict {
                op,
                index_len: self.values.len(),
                data_num,
            });
        }
        for (data_index, (begin, end)) in self.pairs().enumerate() {
            let (begin, end) = (begin as i64, end as i64);
            if end - begin < 0 || begin < 0 || end > col_num as i64 {
                return Err(MatVarError::InvalidColumnRange {
                    op,
                    data_index,
                    begin,
                    end,
                    col_num,
                });
            }
        }
        if let Some(&last_end) = self.values.last() {
            if last_end as i64 != col_num as i64 {
                return Err(MatVarError::SizeConflict {
                    op,
                    last_end: last_end as i64,
                    col_num,
                });
            }
        }
        Ok(())
    }

    /// Range of data point `idx` as `usize` bounds
    ///
    /// Only meaningful on a table that passed [`check_consistency`].
    ///
    /// [`check_consistency`]: ColumnIndex::check_consistency
    pub fn range(&self, idx: usize) -> Option<Range<usize>> {
        let (begin, end) = self.pair(idx)?;
        Some(begin as usize..end as usize)
    }
}

impl From<Vec<i32>> for ColumnIndex {
    fn from(values: Vec<i32>) -> Self {
        Self::from_values(values)
    }
}

impl From<&[i32]> for ColumnIndex {
    fn from(values: &[i32]) -> Self {
        Self::from_values(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use alloc::vec;

    const OP: &str = "test";

    #[test]
    fn test_one_per_column() {
        let index = ColumnIndex::one_per_column(3).unwrap();
        assert_eq!(index.as_slice(), &[0, 1, 1, 2, 2, 3]);
        assert_eq!(index.pair_count(), 3);
        assert!(index.check_consistency(3, 3, OP).is_ok());

        let empty = ColumnIndex::one_per_column(0).unwrap();
        assert!(empty.is_empty());
        assert!(empty.check_consistency(0, 0, OP).is_ok());
    }

    #[test]
    fn test_from_widths() {
        let (index, total) = ColumnIndex::from_widths([2, 1, 2]).unwrap();
        assert_eq!(index.as_slice(), &[0, 2, 2, 3, 3, 5]);
        assert_eq!(total, 5);

        // Zero width is structurally allowed
        let (index, total) = ColumnIndex::from_widths([0, 3]).unwrap();
        assert_eq!(index.as_slice(), &[0, 0, 0, 3]);
        assert!(index.check_consistency(2, total, OP).is_ok());
    }

    #[test]
    fn test_concat_shifted() {
        let mut a = ColumnIndex::from(vec![0, 2, 2, 3]);
        let b = ColumnIndex::from(vec![0, 4]);
        a.concat_shifted(&b, 3).unwrap();
        assert_eq!(a.as_slice(), &[0, 2, 2, 3, 3, 7]);

        let err = a.concat_shifted(&b, i32::MAX).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CapacityExceeded);
    }

    #[test]
    fn test_fill_range_and_set() {
        let mut index = ColumnIndex::new();
        index.fill_range(2, 5);
        assert_eq!(index.as_slice(), &[2, 3, 4]);
        index.set(1, 9).unwrap();
        assert_eq!(index.get(1), Some(9));
        assert!(index.set(3, 0).is_err());
    }

    #[test]
    fn test_check_consistency_count_conflict() {
        let index = ColumnIndex::from(vec![0, 1, 1, 2]);
        let err = index.check_consistency(3, 2, OP).unwrap_err();
        assert_eq!(
            err,
            MatVarError::DataCountConflict {
                op: OP,
                index_len: 4,
                data_num: 3
            }
        );
    }

    #[test]
    fn test_check_consistency_bad_ranges() {
        // Negative width
        let index = ColumnIndex::from(vec![0, 3, 3, 2, 2, 5]);
        let err = index.check_consistency(3, 5, OP).unwrap_err();
        assert_eq!(
            err,
            MatVarError::InvalidColumnRange {
                op: OP,
                data_index: 1,
                begin: 3,
                end: 2,
                col_num: 5
            }
        );

        // Negative begin
        let index = ColumnIndex::from(vec![-1, 2]);
        assert_eq!(
            index.check_consistency(1, 2, OP).unwrap_err().category(),
            ErrorCategory::InvalidState
        );

        // End past the matrix
        let index = ColumnIndex::from(vec![0, 6]);
        assert!(matches!(
            index.check_consistency(1, 5, OP),
            Err(MatVarError::InvalidColumnRange { .. })
        ));
    }

    #[test]
    fn test_check_consistency_trailing_columns() {
        let index = ColumnIndex::from(vec![0, 2, 2, 4]);
        let err = index.check_consistency(2, 5, OP).unwrap_err();
        assert_eq!(
            err,
            MatVarError::SizeConflict {
                op: OP,
                last_end: 4,
                col_num: 5
            }
        );
    }

    #[test]
    fn test_overlap_is_not_rejected() {
        // Only containment and coverage are checked
        let index = ColumnIndex::from(vec![0, 3, 1, 4]);
        assert!(index.check_consistency(2, 4, OP).is_ok());
    }

    #[test]
    fn test_range() {
        let index = ColumnIndex::from(vec![0, 2, 2, 5]);
        assert_eq!(index.range(1), Some(2..5));
        assert_eq!(index.range(2), None);
    }
}
