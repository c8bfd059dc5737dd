//! Error types for variable-length matrix collections

/// Broad classification of a [`MatVarError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed caller input
    InvalidArgument,
    /// Index table disagrees with the backing matrix
    InvalidState,
    /// Data point or column index outside the valid range
    IndexOutOfRange,
    /// Concatenation between matrices of differing row counts
    IncompatibleShape,
    /// Transfer sources disagreeing on row count
    InconsistentShape,
    /// Counts too large for their representation
    CapacityExceeded,
    /// Serialized content that cannot be decoded
    CorruptedData,
    /// Underlying read/write failure
    Io,
}

/// Errors that can occur while building, reshaping or persisting a collection
///
/// Every variant carries the operation tag (`op`) of the call that failed,
/// along with whatever values are needed to diagnose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatVarError {
    /// Malformed caller input
    InvalidArgument {
        op: &'static str,
        reason: &'static str,
    },
    /// Index table length is not twice the data point count
    DataCountConflict {
        op: &'static str,
        index_len: usize,
        data_num: usize,
    },
    /// A data point's range has negative width or leaves the matrix
    InvalidColumnRange {
        op: &'static str,
        data_index: usize,
        begin: i64,
        end: i64,
        col_num: usize,
    },
    /// The last range does not end at the matrix's column count
    SizeConflict {
        op: &'static str,
        last_end: i64,
        col_num: usize,
    },
    /// Data point index outside `[0, data_num)`
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        data_num: usize,
    },
    /// Column index outside `[0, col_num)`
    ColumnOutOfRange {
        op: &'static str,
        col: usize,
        col_num: usize,
    },
    /// Row counts differ between concatenated matrices
    IncompatibleShape {
        op: &'static str,
        rows: usize,
        other_rows: usize,
    },
    /// A transfer source has a different row count than the first one
    InconsistentShape {
        op: &'static str,
        source: usize,
        expected_rows: usize,
        found_rows: usize,
    },
    /// A count does not fit its representation
    CapacityExceeded {
        op: &'static str,
        reason: &'static str,
    },
    /// Serialized content that cannot be decoded
    CorruptedData {
        op: &'static str,
        reason: &'static str,
    },
    /// Underlying read/write failure
    Io {
        op: &'static str,
        reason: &'static str,
    },
}

impl MatVarError {
    /// Classify this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            MatVarError::InvalidArgument { .. } => ErrorCategory::InvalidArgument,
            MatVarError::DataCountConflict { .. }
            | MatVarError::InvalidColumnRange { .. }
            | MatVarError::SizeConflict { .. } => ErrorCategory::InvalidState,
            MatVarError::IndexOutOfRange { .. } | MatVarError::ColumnOutOfRange { .. } => {
                ErrorCategory::IndexOutOfRange
            }
            MatVarError::IncompatibleShape { .. } => ErrorCategory::IncompatibleShape,
            MatVarError::InconsistentShape { .. } => ErrorCategory::InconsistentShape,
            MatVarError::CapacityExceeded { .. } => ErrorCategory::CapacityExceeded,
            MatVarError::CorruptedData { .. } => ErrorCategory::CorruptedData,
            MatVarError::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Operation tag of the failing call
    pub const fn operation(&self) -> &'static str {
        match self {
            MatVarError::InvalidArgument { op, .. }
            | MatVarError::DataCountConflict { op, .. }
            | MatVarError::InvalidColumnRange { op, .. }
            | MatVarError::SizeConflict { op, .. }
            | MatVarError::IndexOutOfRange { op, .. }
            | MatVarError::ColumnOutOfRange { op, .. }
            | MatVarError::IncompatibleShape { op, .. }
            | MatVarError::InconsistentShape { op, .. }
            | MatVarError::CapacityExceeded { op, .. }
            | MatVarError::CorruptedData { op, .. }
            | MatVarError::Io { op, .. } => op,
        }
    }
}

impl core::fmt::Display for MatVarError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatVarError::InvalidArgument { op, reason } => write!(f, "{op}: {reason}"),
            MatVarError::DataCountConflict {
                op,
                index_len,
                data_num,
            } => write!(
                f,
                "{op}: #data conflict (index length {index_len}, #data {data_num})"
            ),
            MatVarError::InvalidColumnRange {
                op,
                data_index,
                begin,
                end,
                col_num,
            } => write!(
                f,
                "{op}: invalid column range for data point {data_index} (col0={begin} col1={end} colNum={col_num})"
            ),
            MatVarError::SizeConflict {
                op,
                last_end,
                col_num,
            } => write!(
                f,
                "{op}: size conflict (last range ends at {last_end}, colNum={col_num})"
            ),
            MatVarError::IndexOutOfRange {
                op,
                index,
                data_num,
            } => write!(f, "{op}: invalid data index {index} (#data={data_num})"),
            MatVarError::ColumnOutOfRange { op, col, col_num } => {
                write!(f, "{op}: invalid column {col} (colNum={col_num})")
            }
            MatVarError::IncompatibleShape {
                op,
                rows,
                other_rows,
            } => write!(f, "{op}: #row doesn't match ({rows} vs {other_rows})"),
            MatVarError::InconsistentShape {
                op,
                source,
                expected_rows,
                found_rows,
            } => write!(
                f,
                "{op}: #row must be fixed (source {source} has {found_rows} rows, expected {expected_rows})"
            ),
            MatVarError::CapacityExceeded { op, reason } => write!(f, "{op}: {reason}"),
            MatVarError::CorruptedData { op, reason } => write!(f, "{op}: {reason}"),
            MatVarError::Io { op, reason } => write!(f, "{op}: {reason}"),
        }
    }
}

impl core::error::Error for MatVarError {}

/// Result type for collection operations
pub type Result<T> = core::result::Result<T, MatVarError>;

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_category_and_operation() {
        let err = MatVarError::IncompatibleShape {
            op: "MatVar::cbind",
            rows: 3,
            other_rows: 4,
        };
        assert_eq!(err.category(), ErrorCategory::IncompatibleShape);
        assert_eq!(err.operation(), "MatVar::cbind");
        assert_eq!(
            err.to_string(),
            "MatVar::cbind: #row doesn't match (3 vs 4)"
        );
    }

    #[test]
    fn test_range_diagnostics_in_message() {
        let err = MatVarError::InvalidColumnRange {
            op: "MatVar::check_consistency",
            data_index: 1,
            begin: 4,
            end: 2,
            col_num: 5,
        };
        assert_eq!(err.category(), ErrorCategory::InvalidState);
        let msg = err.to_string();
        assert!(msg.contains("col0=4"));
        assert!(msg.contains("col1=2"));
        assert!(msg.contains("colNum=5"));
    }
}
