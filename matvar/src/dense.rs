//! Dense column-major backend matrix
//!
//! Every element is stored. Column `c` occupies
//! `values[c * row_num..(c + 1) * row_num]`, so gathering and concatenating
//! whole columns are plain slice copies.

use std::io::{Read, Write};

use matvar_core::{ColumnMatrix, MatVarError, MatrixElement, MatrixKind, Result};
use rayon::prelude::*;

use crate::codec::{self, MatrixIo};

/// Dense matrix stored column by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseMatrix<T: MatrixElement> {
    row_num: usize,
    col_num: usize,
    values: Vec<T>,
}

fn element_count(row_num: usize, col_num: usize, op: &'static str) -> Result<usize> {
    row_num
        .checked_mul(col_num)
        .ok_or(MatVarError::CapacityExceeded {
            op,
            reason: "element count overflows",
        })
}

impl<T: MatrixElement> DenseMatrix<T> {
    /// Create a zero-filled `row_num` x `col_num` matrix
    pub fn zeros(row_num: usize, col_num: usize) -> Result<Self> {
        let len = element_count(row_num, col_num, "DenseMatrix::zeros")?;
        Ok(Self {
            row_num,
            col_num,
            values: vec![T::default(); len],
        })
    }

    /// Wrap column-major `values`
    ///
    /// `values.len()` must equal `row_num * col_num`.
    pub fn from_column_major(row_num: usize, col_num: usize, values: Vec<T>) -> Result<Self> {
        let op = "DenseMatrix::from_column_major";
        if element_count(row_num, col_num, op)? != values.len() {
            return Err(MatVarError::InvalidArgument {
                op,
                reason: "value count must equal rows times columns",
            });
        }
        Ok(Self {
            row_num,
            col_num,
            values,
        })
    }

    /// Build a matrix from equally long columns
    pub fn from_columns(row_num: usize, columns: &[&[T]]) -> Result<Self> {
        let op = "DenseMatrix::from_columns";
        let mut values = Vec::with_capacity(element_count(row_num, columns.len(), op)?);
        for column in columns {
            if column.len() != row_num {
                return Err(MatVarError::InvalidArgument {
                    op,
                    reason: "every column must have row_num elements",
                });
            }
            values.extend_from_slice(column);
        }
        Ok(Self {
            row_num,
            col_num: columns.len(),
            values,
        })
    }

    /// Element at (`row`, `col`)
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.row_num || col >= self.col_num {
            return None;
        }
        Some(self.values[col * self.row_num + row])
    }

    /// Overwrite the element at (`row`, `col`)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if col >= self.col_num {
            return Err(MatVarError::ColumnOutOfRange {
                op: "DenseMatrix::set",
                col,
                col_num: self.col_num,
            });
        }
        if row >= self.row_num {
            return Err(MatVarError::InvalidArgument {
                op: "DenseMatrix::set",
                reason: "row out of range",
            });
        }
        self.values[col * self.row_num + row] = value;
        Ok(())
    }

    /// Elements of column `col`, top to bottom
    pub fn column(&self, col: usize) -> Option<&[T]> {
        if col >= self.col_num {
            return None;
        }
        Some(&self.values[col * self.row_num..(col + 1) * self.row_num])
    }

    /// All elements in column-major order
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: MatrixElement> ColumnMatrix for DenseMatrix<T> {
    fn row_num(&self) -> usize {
        self.row_num
    }

    fn col_num(&self) -> usize {
        self.col_num
    }

    fn nonzero_num(&self) -> usize {
        self.values.iter().filter(|v| !v.is_zero()).count()
    }

    fn gather_columns(&self, cols: &[usize]) -> Result<Self> {
        let op = "DenseMatrix::gather_columns";
        if let Some(&col) = cols.iter().find(|&&c| c >= self.col_num) {
            return Err(MatVarError::ColumnOutOfRange {
                op,
                col,
                col_num: self.col_num,
            });
        }

        let rows = self.row_num;
        let mut values = vec![T::default(); element_count(rows, cols.len(), op)?];
        if rows > 0 {
            values
                .par_chunks_mut(rows)
                .zip(cols.par_iter())
                .for_each(|(dst, &col)| {
                    dst.copy_from_slice(&self.values[col * rows..(col + 1) * rows]);
                });
        }

        Ok(Self {
            row_num: rows,
            col_num: cols.len(),
            values,
        })
    }

    fn cbind(&mut self, other: &Self) -> Result<()> {
        if self.row_num != other.row_num {
            return Err(MatVarError::IncompatibleShape {
                op: "DenseMatrix::cbind",
                rows: self.row_num,
                other_rows: other.row_num,
            });
        }
        self.values.extend_from_slice(&other.values);
        self.col_num += other.col_num;
        Ok(())
    }

    fn transfer_from(
        sources: Vec<Self>,
        row_num: usize,
        col_num: usize,
        _nonzero_num: u64,
    ) -> Result<Self> {
        let op = "DenseMatrix::transfer_from";
        let total = element_count(row_num, col_num, op)?;

        let mut values: Vec<T> = Vec::new();
        let mut cols = 0usize;
        for (source_index, mut source) in sources.into_iter().enumerate() {
            if source.row_num != row_num {
                return Err(MatVarError::InconsistentShape {
                    op,
                    source: source_index,
                    expected_rows: row_num,
                    found_rows: source.row_num,
                });
            }
            cols += source.col_num;
            if values.is_empty() {
                // Adopt the first non-empty buffer instead of copying it
                values = std::mem::take(&mut source.values);
                values.reserve(total.saturating_sub(values.len()));
            } else {
                values.append(&mut source.values);
            }
        }

        if cols != col_num {
            return Err(MatVarError::InvalidArgument {
                op,
                reason: "column count hint disagrees with the sources",
            });
        }

        Ok(Self {
            row_num,
            col_num,
            values,
        })
    }
}

impl<T: MatrixElement> MatrixIo for DenseMatrix<T> {
    const KIND: MatrixKind = MatrixKind::Dense;

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let op = "DenseMatrix::write";
        codec::write_data_type::<T, W>(writer, op)?;
        codec::write_count(writer, self.row_num, op)?;
        codec::write_count(writer, self.col_num, op)?;
        codec::write_elements(writer, &self.values, op)
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let op = "DenseMatrix::read";
        codec::expect_data_type::<T, R>(reader, op)?;
        let row_num = codec::read_count(reader, op)?;
        let col_num = codec::read_count(reader, op)?;
        let len = row_num
            .checked_mul(col_num)
            .ok_or(MatVarError::CorruptedData {
                op,
                reason: "element count overflows",
            })?;
        let values = codec::read_elements(reader, len, op)?;
        Ok(Self {
            row_num,
            col_num,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matvar_core::{ErrorCategory, MATRIX_PREFIX_SIZE};

    /// 2 x 5 matrix whose column `c` holds `[c, 10 + c]`
    fn sample() -> DenseMatrix<f32> {
        let values = (0..5).flat_map(|c| [c as f32, 10.0 + c as f32]).collect();
        DenseMatrix::from_column_major(2, 5, values).unwrap()
    }

    #[test]
    fn test_accessors() {
        let m = sample();
        assert_eq!(m.dimensions(), (2, 5));
        assert_eq!(m.get(1, 3), Some(13.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.column(4), Some(&[4.0, 14.0][..]));
        assert_eq!(m.nonzero_num(), 9);
    }

    #[test]
    fn test_from_column_major_length_check() {
        let err = DenseMatrix::<f32>::from_column_major(2, 2, vec![1.0; 3]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    }

    #[test]
    fn test_set() {
        let mut m = DenseMatrix::<i32>::zeros(2, 2).unwrap();
        m.set(1, 0, 7).unwrap();
        assert_eq!(m.as_slice(), &[0, 7, 0, 0]);
        assert!(m.set(0, 2, 1).is_err());
        assert!(m.set(2, 0, 1).is_err());
    }

    #[test]
    fn test_gather_columns_order_and_duplicates() {
        let m = sample();
        let g = m.gather_columns(&[3, 4, 0, 0]).unwrap();
        assert_eq!(g.dimensions(), (2, 4));
        assert_eq!(g.column(0), Some(&[3.0, 13.0][..]));
        assert_eq!(g.column(1), Some(&[4.0, 14.0][..]));
        assert_eq!(g.column(2), g.column(3));

        let err = m.gather_columns(&[1, 5]).unwrap_err();
        assert_eq!(
            err,
            MatVarError::ColumnOutOfRange {
                op: "DenseMatrix::gather_columns",
                col: 5,
                col_num: 5
            }
        );
    }

    #[test]
    fn test_gather_columns_zero_rows() {
        let m = DenseMatrix::<f32>::zeros(0, 3).unwrap();
        let g = m.gather_columns(&[2, 1]).unwrap();
        assert_eq!(g.dimensions(), (0, 2));
    }

    #[test]
    fn test_cbind() {
        let mut a = sample();
        let b = DenseMatrix::from_columns(2, &[&[7.0f32, 8.0][..]]).unwrap();
        a.cbind(&b).unwrap();
        assert_eq!(a.dimensions(), (2, 6));
        assert_eq!(a.column(5), Some(&[7.0, 8.0][..]));

        let c = DenseMatrix::<f32>::zeros(3, 1).unwrap();
        let err = a.cbind(&c).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::IncompatibleShape);
    }

    #[test]
    fn test_transfer_from() {
        let a = DenseMatrix::from_columns(2, &[&[1.0f32, 2.0][..]]).unwrap();
        let b = DenseMatrix::from_columns(2, &[&[3.0f32, 4.0][..], &[5.0, 6.0][..]]).unwrap();
        let m = DenseMatrix::transfer_from(vec![a, b], 2, 3, 6).unwrap();
        assert_eq!(m.dimensions(), (2, 3));
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let a = DenseMatrix::<f32>::zeros(2, 1).unwrap();
        let b = DenseMatrix::<f32>::zeros(3, 1).unwrap();
        let err = DenseMatrix::transfer_from(vec![a, b], 2, 2, 0).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InconsistentShape);
    }

    #[test]
    fn test_io_round_trip() {
        let m = sample();
        let mut buf = Vec::new();
        m.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), MATRIX_PREFIX_SIZE + 10 * 4);

        let back = DenseMatrix::<f32>::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back, m);

        let err = DenseMatrix::<f64>::read_from(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CorruptedData);
    }
}
