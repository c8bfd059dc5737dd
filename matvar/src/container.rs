//! Variable-length matrix collection
//!
//! A [`MatVar`] holds one backing matrix whose columns are split into a
//! sequence of contiguous, variable-width blocks. Each block is one data
//! point, for instance one sequence or one bag of features. The split is
//! recorded in a [`ColumnIndex`] of `(begin, end)` pairs.
//!
//! After every structural change the index table is checked against the
//! matrix: it must hold exactly `data_num` pairs, every range must lie in
//! `[0, col_num]` with non-negative width, and the last range must end at
//! `col_num`. Each operation builds and checks its new state before
//! committing it, so a failed call leaves the collection untouched.

use std::io::{Read, Write};
use std::ops::Range;
use std::path::Path;

use matvar_core::{
    accumulate_nonzero, from_frame_int, to_frame_int, ColumnIndex, ColumnMatrix, MatVarError,
    MatrixKind, Result, StorageBackend,
};

use crate::codec::{self, MatrixIo};
use crate::config::IoConfig;
use crate::file_io;

/// Shape summary of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatVarShape {
    pub rows: usize,
    pub cols: usize,
    pub data_num: usize,
}

impl std::fmt::Display for MatVarShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}, #data={}", self.rows, self.cols, self.data_num)
    }
}

/// Matrix whose columns are grouped into variable-width data points
#[derive(Debug, Clone, PartialEq)]
pub struct MatVar<M: ColumnMatrix> {
    data_num: usize,
    column_index: ColumnIndex,
    matrix: M,
}

impl<M: ColumnMatrix> Default for MatVar<M> {
    fn default() -> Self {
        Self {
            data_num: 0,
            column_index: ColumnIndex::new(),
            matrix: M::default(),
        }
    }
}

impl<M: ColumnMatrix> MatVar<M> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `matrix` with an explicit index table
    pub fn with_index(matrix: M, index: ColumnIndex) -> Result<Self> {
        let mut mv = Self::new();
        mv.reset(matrix, index)?;
        Ok(mv)
    }

    /// Attach `matrix`, treating every column as one data point
    pub fn per_column(matrix: M) -> Result<Self> {
        let mut mv = Self::new();
        mv.reset_per_column(matrix)?;
        Ok(mv)
    }

    /// Number of data points
    pub fn data_num(&self) -> usize {
        self.data_num
    }

    /// Number of rows of the backing matrix
    pub fn row_num(&self) -> usize {
        self.matrix.row_num()
    }

    /// Number of columns of the backing matrix
    pub fn col_num(&self) -> usize {
        self.matrix.col_num()
    }

    pub fn shape(&self) -> MatVarShape {
        MatVarShape {
            rows: self.row_num(),
            cols: self.col_num(),
            data_num: self.data_num,
        }
    }

    /// Human-readable shape, e.g. `"3 x 5, #data=2"`
    pub fn shape_str(&self) -> String {
        self.shape().to_string()
    }

    /// Backing matrix
    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    /// Raw index table
    pub fn index(&self) -> &ColumnIndex {
        &self.column_index
    }

    fn check_idx(&self, idx: usize, op: &'static str) -> Result<()> {
        if idx >= self.data_num {
            return Err(MatVarError::IndexOutOfRange {
                op,
                index: idx,
                data_num: self.data_num,
            });
        }
        Ok(())
    }

    /// First column of data point `idx`
    pub fn col_begin(&self, idx: usize) -> Result<usize> {
        self.col_range_checked(idx, "MatVar::col_begin")
            .map(|r| r.start)
    }

    /// One past the last column of data point `idx`
    pub fn col_end(&self, idx: usize) -> Result<usize> {
        self.col_range_checked(idx, "MatVar::col_end").map(|r| r.end)
    }

    /// Column range of data point `idx`
    pub fn col_range(&self, idx: usize) -> Result<Range<usize>> {
        self.col_range_checked(idx, "MatVar::col_range")
    }

    /// Number of columns of data point `idx`
    pub fn width(&self, idx: usize) -> Result<usize> {
        self.col_range_checked(idx, "MatVar::width")
            .map(|r| r.len())
    }

    fn col_range_checked(&self, idx: usize, op: &'static str) -> Result<Range<usize>> {
        self.check_idx(idx, op)?;
        // A checked table holds data_num pairs of non-negative values
        self.column_index
            .range(idx)
            .ok_or(MatVarError::IndexOutOfRange {
                op,
                index: idx,
                data_num: self.data_num,
            })
    }

    /// Column ranges of all data points, in order
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.column_index
            .pairs()
            .map(|(begin, end)| begin as usize..end as usize)
    }

    /// Replace the contents with `matrix` partitioned by `index`
    ///
    /// Fails with `DataCountConflict` when `index` has odd length, and with
    /// `InvalidColumnRange` or `SizeConflict` when its ranges do not fit
    /// `matrix`. On failure `self` is unchanged.
    pub fn reset(&mut self, matrix: M, index: ColumnIndex) -> Result<()> {
        let data_num = index.len() / 2;
        Self::check_consistency(&index, data_num, matrix.col_num())?;
        self.commit(data_num, index, matrix);
        Ok(())
    }

    /// Replace the contents with `matrix`, one data point per column
    pub fn reset_per_column(&mut self, matrix: M) -> Result<()> {
        let index = ColumnIndex::one_per_column(matrix.col_num())?;
        self.reset(matrix, index)
    }

    /// Return to the empty state
    pub fn clear(&mut self) {
        self.data_num = 0;
        self.column_index = ColumnIndex::new();
        self.matrix = M::default();
    }

    /// Make `self` a copy of `source`
    pub fn assign(&mut self, source: &Self) -> Result<()> {
        self.reset(source.matrix.clone(), source.column_index.clone())
    }

    /// Build the collection from independent matrices, one data point each
    ///
    /// Data point `i` spans the columns of `sources[i]`, laid out in input
    /// order. `count` limits how many sources are used; `None` or
    /// `Some(0)` uses all of them, and sources past `count` are dropped.
    /// All sources must have the row count of the first one. Their
    /// non-zero counts are summed in a signed 64-bit accumulator, and an
    /// overflow fails with `CapacityExceeded` before the backing matrix is
    /// built. The sources' storage is moved into the new backing matrix.
    pub fn transfer_from(&mut self, mut sources: Vec<M>, count: Option<usize>) -> Result<()> {
        let op = "MatVar::transfer_from";
        let data_num = match count {
            Some(n) if n > 0 => n,
            _ => sources.len(),
        };
        if data_num > sources.len() {
            return Err(MatVarError::InvalidArgument {
                op,
                reason: "count exceeds the number of source matrices",
            });
        }
        sources.truncate(data_num);

        let row_num = sources.first().map_or(0, |m| m.row_num());
        if let Some((source, m)) = sources
            .iter()
            .enumerate()
            .find(|(_, m)| m.row_num() != row_num)
        {
            return Err(MatVarError::InconsistentShape {
                op,
                source,
                expected_rows: row_num,
                found_rows: m.row_num(),
            });
        }

        let (index, col_num) = ColumnIndex::from_widths(sources.iter().map(|m| m.col_num()))?;
        let nonzero_num = accumulate_nonzero(sources.iter().map(|m| m.nonzero_num()), op)?;

        tracing::debug!(
            data_num,
            row_num,
            col_num,
            nonzero_num,
            "transferring source matrices"
        );
        let matrix = M::transfer_from(sources, row_num, col_num, nonzero_num)?;
        Self::check_consistency(&index, data_num, matrix.col_num())?;
        self.commit(data_num, index, matrix);
        Ok(())
    }

    /// New collection holding the data points of `self` named by `indices`
    ///
    /// Order is preserved and indices may repeat. Each selected data point
    /// keeps its width; its columns are copied in increasing order.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let op = "MatVar::select";
        let mut index = ColumnIndex::new();
        let mut cols = Vec::new();
        let mut offset = 0usize;
        for &idx in indices {
            let range = self.col_range_checked(idx, op)?;
            let begin = to_frame_int(offset, op)?;
            offset += range.len();
            index.push_pair(begin, to_frame_int(offset, op)?);
            cols.extend(range);
        }

        tracing::trace!(
            selected = indices.len(),
            cols = cols.len(),
            "gathering selected data points"
        );
        let matrix = self.matrix.gather_columns(&cols)?;
        let data_num = indices.len();
        Self::check_consistency(&index, data_num, matrix.col_num())?;
        Ok(Self {
            data_num,
            column_index: index,
            matrix,
        })
    }

    /// New collection holding data points `range.start..range.end` of `self`
    pub fn select_range(&self, range: Range<usize>) -> Result<Self> {
        let indices: Vec<usize> = range.collect();
        self.select(&indices)
    }

    /// Replace the contents with the data points of `source` named by `indices`
    pub fn set(&mut self, source: &Self, indices: &[usize]) -> Result<()> {
        *self = source.select(indices)?;
        Ok(())
    }

    /// Append the data points of `other` after those of `self`
    ///
    /// Row counts must match, else `IncompatibleShape`. The ranges of
    /// `other` are shifted by the current column count of `self`.
    pub fn cbind(&mut self, other: &Self) -> Result<()> {
        let op = "MatVar::cbind";
        if self.row_num() != other.row_num() {
            return Err(MatVarError::IncompatibleShape {
                op,
                rows: self.row_num(),
                other_rows: other.row_num(),
            });
        }

        let col_num = self
            .col_num()
            .checked_add(other.col_num())
            .ok_or(MatVarError::CapacityExceeded {
                op,
                reason: "column count overflows",
            })?;
        let mut index = self.column_index.clone();
        index.concat_shifted(&other.column_index, to_frame_int(self.col_num(), op)?)?;
        let data_num = self.data_num + other.data_num;
        Self::check_consistency(&index, data_num, col_num)?;

        // Row counts match, so the backend append cannot fail half way
        self.matrix.cbind(&other.matrix)?;
        self.data_num = data_num;
        self.column_index = index;

        tracing::debug!(
            added = other.data_num,
            data_num,
            col_num,
            "appended data points"
        );
        Ok(())
    }

    /// Re-tile the backing matrix so that every column is one data point
    pub fn separate_columns(&mut self) -> Result<()> {
        let index = ColumnIndex::one_per_column(self.col_num())?;
        tracing::debug!(
            from = self.data_num,
            to = self.col_num(),
            "separating columns into data points"
        );
        self.update_index(index)
    }

    /// Replace the index table, keeping the backing matrix
    ///
    /// Fails with `InvalidArgument` when `index` has odd length.
    pub fn update_index(&mut self, index: ColumnIndex) -> Result<()> {
        if index.len() % 2 != 0 {
            return Err(MatVarError::InvalidArgument {
                op: "MatVar::update_index",
                reason: "index must be pairs of begin and end",
            });
        }
        let data_num = index.len() / 2;
        Self::check_consistency(&index, data_num, self.col_num())?;
        self.data_num = data_num;
        self.column_index = index;
        Ok(())
    }

    fn check_consistency(index: &ColumnIndex, data_num: usize, col_num: usize) -> Result<()> {
        index
            .check_consistency(data_num, col_num, "MatVar::check_consistency")
            .map_err(|err| {
                tracing::warn!(%err, "rejected column index");
                err
            })
    }

    fn commit(&mut self, data_num: usize, index: ColumnIndex, matrix: M) {
        self.data_num = data_num;
        self.column_index = index;
        self.matrix = matrix;
    }
}

impl<M: ColumnMatrix + MatrixIo> MatVar<M> {
    /// Storage layout of the backing matrix
    pub fn kind(&self) -> MatrixKind {
        M::KIND
    }

    /// Write `data_num`, the index table, then the backing matrix
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let op = "MatVar::write";
        codec::write_i32(writer, to_frame_int(self.data_num, op)?, op)?;
        codec::write_int_array(writer, self.column_index.as_slice(), op)?;
        self.matrix.write_to(writer)
    }

    /// Read a collection written by [`MatVar::write_to`]
    ///
    /// The decoded index table is checked against the decoded matrix.
    /// A stored `data_num` that disagrees with the index length is
    /// `CorruptedData`; ranges that do not fit the matrix fail like any
    /// other rejected index table.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let op = "MatVar::read";
        let data_num = from_frame_int(codec::read_i32(reader, op)?, op)?;
        let column_index = ColumnIndex::from_values(codec::read_int_array(reader, op)?);
        if data_num.checked_mul(2) != Some(column_index.len()) {
            return Err(MatVarError::CorruptedData {
                op,
                reason: "stored #data disagrees with the index length",
            });
        }
        let matrix = M::read_from(reader)?;
        Self::check_consistency(&column_index, data_num, matrix.col_num())?;
        Ok(Self {
            data_num,
            column_index,
            matrix,
        })
    }

    /// Write only the backing matrix, without the partitioning
    pub fn write_matrix_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.matrix.write_to(writer)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        tracing::debug!(
            path = %path.as_ref().display(),
            shape = %self.shape(),
            kind = %M::KIND,
            "writing collection"
        );
        file_io::write_with(path, |w| self.write_to(w))
    }

    /// Write only the backing matrix to `path`
    pub fn write_matrix_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        file_io::write_with(path, |w| self.write_matrix_to(w))
    }

    /// Read a collection from `path` with the default [`IoConfig`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_file(path, &IoConfig::default())
    }

    /// Read a collection from `path`
    pub fn read_file<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<Self> {
        let bytes = file_io::load(path.as_ref(), config)?;
        let mut slice = bytes.as_slice();
        let mv = Self::read_from(&mut slice)?;
        if !slice.is_empty() {
            tracing::warn!(
                path = %path.as_ref().display(),
                trailing = slice.len(),
                "ignoring trailing bytes after collection"
            );
        }
        tracing::debug!(shape = %mv.shape(), mapped = bytes.is_mapped(), "read collection");
        Ok(mv)
    }
}
