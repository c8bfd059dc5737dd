//! Compressed sparse column backend matrix
//!
//! Only non-zero elements are stored. The entries of column `c` are
//! `row_idx[col_ptr[c]..col_ptr[c + 1]]` and the matching `values`, with
//! row indices strictly increasing inside a column.

use std::io::{Read, Write};

use hashbrown::HashMap;
use matvar_core::{ColumnMatrix, MatVarError, MatrixElement, MatrixKind, Result};

use crate::codec::{self, MatrixIo};

/// Sparse matrix in compressed sparse column layout
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T: MatrixElement> {
    row_num: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: MatrixElement> Default for SparseMatrix<T> {
    fn default() -> Self {
        Self {
            row_num: 0,
            col_ptr: vec![0],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: MatrixElement> SparseMatrix<T> {
    /// Create an all-zero `row_num` x `col_num` matrix
    pub fn zeros(row_num: usize, col_num: usize) -> Self {
        Self {
            row_num,
            col_ptr: vec![0; col_num + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triplets in any order
    ///
    /// A later triplet for the same position replaces an earlier one.
    /// Zero values are not stored.
    pub fn from_triplets(
        row_num: usize,
        col_num: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self> {
        let op = "SparseMatrix::from_triplets";
        let mut cells: HashMap<(usize, usize), T> = HashMap::with_capacity(triplets.len());
        for &(row, col, value) in triplets {
            if col >= col_num {
                return Err(MatVarError::ColumnOutOfRange { op, col, col_num });
            }
            if row >= row_num {
                return Err(MatVarError::InvalidArgument {
                    op,
                    reason: "row out of range",
                });
            }
            cells.insert((col, row), value);
        }

        let mut entries: Vec<((usize, usize), T)> =
            cells.into_iter().filter(|(_, v)| !v.is_zero()).collect();
        entries.sort_unstable_by_key(|&(pos, _)| pos);

        let mut col_ptr = vec![0usize; col_num + 1];
        let mut row_idx = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for ((col, row), value) in entries {
            col_ptr[col + 1] += 1;
            row_idx.push(row);
            values.push(value);
        }
        for col in 0..col_num {
            col_ptr[col + 1] += col_ptr[col];
        }

        Ok(Self {
            row_num,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// Element at (`row`, `col`); `None` outside the matrix
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.row_num {
            return None;
        }
        let (rows, values) = self.column(col)?;
        match rows.binary_search(&row) {
            Ok(pos) => Some(values[pos]),
            Err(_) => Some(T::default()),
        }
    }

    /// Stored row indices and values of column `col`
    pub fn column(&self, col: usize) -> Option<(&[usize], &[T])> {
        if col >= self.col_num() {
            return None;
        }
        let span = self.col_ptr[col]..self.col_ptr[col + 1];
        Some((&self.row_idx[span.clone()], &self.values[span]))
    }
}

impl<T: MatrixElement> ColumnMatrix for SparseMatrix<T> {
    fn row_num(&self) -> usize {
        self.row_num
    }

    fn col_num(&self) -> usize {
        self.col_ptr.len() - 1
    }

    fn nonzero_num(&self) -> usize {
        self.values.len()
    }

    fn gather_columns(&self, cols: &[usize]) -> Result<Self> {
        let col_num = self.col_num();
        let mut nnz = 0usize;
        for &col in cols {
            if col >= col_num {
                return Err(MatVarError::ColumnOutOfRange {
                    op: "SparseMatrix::gather_columns",
                    col,
                    col_num,
                });
            }
            nnz += self.col_ptr[col + 1] - self.col_ptr[col];
        }

        let mut col_ptr = Vec::with_capacity(cols.len() + 1);
        let mut row_idx = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        col_ptr.push(0);
        for &col in cols {
            let span = self.col_ptr[col]..self.col_ptr[col + 1];
            row_idx.extend_from_slice(&self.row_idx[span.clone()]);
            values.extend_from_slice(&self.values[span]);
            col_ptr.push(values.len());
        }

        Ok(Self {
            row_num: self.row_num,
            col_ptr,
            row_idx,
            values,
        })
    }

    fn cbind(&mut self, other: &Self) -> Result<()> {
        if self.row_num != other.row_num {
            return Err(MatVarError::IncompatibleShape {
                op: "SparseMatrix::cbind",
                rows: self.row_num,
                other_rows: other.row_num,
            });
        }
        let offset = self.values.len();
        self.row_idx.extend_from_slice(&other.row_idx);
        self.values.extend_from_slice(&other.values);
        self.col_ptr
            .extend(other.col_ptr[1..].iter().map(|&p| p + offset));
        Ok(())
    }

    fn transfer_from(
        sources: Vec<Self>,
        row_num: usize,
        col_num: usize,
        nonzero_num: u64,
    ) -> Result<Self> {
        let op = "SparseMatrix::transfer_from";
        let nnz = usize::try_from(nonzero_num).map_err(|_| MatVarError::CapacityExceeded {
            op,
            reason: "non-zero count exceeds addressable memory",
        })?;

        let mut col_ptr = Vec::with_capacity(col_num + 1);
        let mut row_idx = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        col_ptr.push(0);
        for (source_index, mut source) in sources.into_iter().enumerate() {
            if source.row_num != row_num {
                return Err(MatVarError::InconsistentShape {
                    op,
                    source: source_index,
                    expected_rows: row_num,
                    found_rows: source.row_num,
                });
            }
            let offset = values.len();
            row_idx.append(&mut source.row_idx);
            values.append(&mut source.values);
            col_ptr.extend(source.col_ptr[1..].iter().map(|&p| p + offset));
        }

        if col_ptr.len() != col_num + 1 {
            return Err(MatVarError::InvalidArgument {
                op,
                reason: "column count hint disagrees with the sources",
            });
        }

        Ok(Self {
            row_num,
            col_ptr,
            row_idx,
            values,
        })
    }
}

impl<T: MatrixElement> MatrixIo for SparseMatrix<T> {
    const KIND: MatrixKind = MatrixKind::Sparse;

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let op = "SparseMatrix::write";
        codec::write_data_type::<T, W>(writer, op)?;
        codec::write_count(writer, self.row_num, op)?;
        codec::write_count(writer, self.col_num(), op)?;
        codec::write_wide_count(writer, self.values.len(), op)?;

        let col_ptr = self
            .col_ptr
            .iter()
            .map(|&p| i64::try_from(p))
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(|_| MatVarError::CapacityExceeded {
                op,
                reason: "column pointer too large for an 8-byte signed integer",
            })?;
        codec::write_elements(writer, &col_ptr, op)?;

        // Every row index is below row_num, which already fit in an i32
        let row_idx: Vec<i32> = self.row_idx.iter().map(|&r| r as i32).collect();
        codec::write_elements(writer, &row_idx, op)?;
        codec::write_elements(writer, &self.values, op)
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let op = "SparseMatrix::read";
        let corrupted = |reason| MatVarError::CorruptedData { op, reason };

        codec::expect_data_type::<T, R>(reader, op)?;
        let row_num = codec::read_count(reader, op)?;
        let col_num = codec::read_count(reader, op)?;
        let nnz = codec::read_wide_count(reader, op)?;

        let col_ptr = codec::read_elements::<i64, R>(reader, col_num + 1, op)?
            .into_iter()
            .map(|p| usize::try_from(p).map_err(|_| corrupted("negative column pointer")))
            .collect::<Result<Vec<usize>>>()?;
        if col_ptr.first() != Some(&0) || col_ptr.last() != Some(&nnz) {
            return Err(corrupted("column pointers do not span the non-zero count"));
        }
        if col_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(corrupted("column pointers decrease"));
        }

        let row_idx = codec::read_elements::<i32, R>(reader, nnz, op)?
            .into_iter()
            .map(|r| match usize::try_from(r) {
                Ok(r) if r < row_num => Ok(r),
                _ => Err(corrupted("row index out of range")),
            })
            .collect::<Result<Vec<usize>>>()?;
        let unsorted = col_ptr
            .windows(2)
            .any(|w| row_idx[w[0]..w[1]].windows(2).any(|r| r[0] >= r[1]));
        if unsorted {
            return Err(corrupted("row indices not strictly increasing within a column"));
        }
        let values = codec::read_elements(reader, nnz, op)?;

        Ok(Self {
            row_num,
            col_ptr,
            row_idx,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matvar_core::ErrorCategory;

    /// 3 x 4 matrix with one entry per column at row `c % 3`, value `c + 1`
    fn sample() -> SparseMatrix<f64> {
        let triplets: Vec<_> = (0..4).map(|c| (c % 3, c, (c + 1) as f64)).collect();
        SparseMatrix::from_triplets(3, 4, &triplets).unwrap()
    }

    #[test]
    fn test_from_triplets() {
        let m = sample();
        assert_eq!(m.dimensions(), (3, 4));
        assert_eq!(m.nonzero_num(), 4);
        assert_eq!(m.get(0, 3), Some(4.0));
        assert_eq!(m.get(1, 3), Some(0.0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_from_triplets_duplicates_and_zeros() {
        let m = SparseMatrix::from_triplets(
            2,
            2,
            &[(1, 0, 5i32), (0, 1, 0), (1, 0, 6), (0, 0, 2)],
        )
        .unwrap();
        assert_eq!(m.nonzero_num(), 2);
        assert_eq!(m.column(0), Some((&[0usize, 1][..], &[2, 6][..])));
        assert_eq!(m.column(1).map(|(rows, _)| rows.len()), Some(0));

        let err = SparseMatrix::from_triplets(2, 2, &[(0, 2, 1i32)]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::IndexOutOfRange);
    }

    #[test]
    fn test_gather_columns() {
        let m = sample();
        let g = m.gather_columns(&[3, 1, 3]).unwrap();
        assert_eq!(g.dimensions(), (3, 3));
        assert_eq!(g.nonzero_num(), 3);
        assert_eq!(g.get(0, 0), Some(4.0));
        assert_eq!(g.get(1, 1), Some(2.0));
        assert_eq!(g.get(0, 2), Some(4.0));

        assert!(m.gather_columns(&[4]).is_err());
        assert_eq!(m.gather_columns(&[]).unwrap().dimensions(), (3, 0));
    }

    #[test]
    fn test_cbind_and_transfer() {
        let mut a = sample();
        let b = SparseMatrix::from_triplets(3, 1, &[(2, 0, 9.0)]).unwrap();
        a.cbind(&b).unwrap();
        assert_eq!(a.dimensions(), (3, 5));
        assert_eq!(a.get(2, 4), Some(9.0));

        let err = a.cbind(&SparseMatrix::zeros(2, 1)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::IncompatibleShape);

        let t = SparseMatrix::transfer_from(vec![sample(), b], 3, 5, 5).unwrap();
        assert_eq!(t, a);
    }

    #[test]
    fn test_io_round_trip() {
        let m = sample();
        let mut buf = Vec::new();
        m.write_to(&mut buf).unwrap();
        // tag, rows, cols, nnz, 5 column pointers, 4 row indices, 4 values
        assert_eq!(buf.len(), 1 + 4 + 4 + 8 + 5 * 8 + 4 * 4 + 4 * 8);

        let back = SparseMatrix::<f64>::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_read_rejects_bad_row_index() {
        let m = SparseMatrix::from_triplets(3, 1, &[(2, 0, 1.0f32)]).unwrap();
        let mut buf = Vec::new();
        m.write_to(&mut buf).unwrap();
        // The single row index sits right before the single f32 value
        let pos = buf.len() - 4 - 4;
        buf[pos..pos + 4].copy_from_slice(&7i32.to_le_bytes());
        let err = SparseMatrix::<f32>::read_from(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CorruptedData);
    }

    #[test]
    fn test_read_rejects_unsorted_rows() {
        let m = SparseMatrix::from_triplets(3, 1, &[(0, 0, 1.0f32), (2, 0, 2.0)]).unwrap();
        let mut buf = Vec::new();
        m.write_to(&mut buf).unwrap();
        // Two row indices precede the two f32 values
        let pos = buf.len() - 2 * 4 - 2 * 4;

        let mut swapped = buf.clone();
        swapped[pos..pos + 4].copy_from_slice(&2i32.to_le_bytes());
        swapped[pos + 4..pos + 8].copy_from_slice(&0i32.to_le_bytes());
        let err = SparseMatrix::<f32>::read_from(&mut swapped.as_slice()).unwrap_err();
        assert_eq!(
            err,
            MatVarError::CorruptedData {
                op: "SparseMatrix::read",
                reason: "row indices not strictly increasing within a column"
            }
        );

        let mut repeated = buf;
        repeated[pos..pos + 4].copy_from_slice(&2i32.to_le_bytes());
        let err = SparseMatrix::<f32>::read_from(&mut repeated.as_slice()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CorruptedData);
    }
}
