//! Checked integer conversions for collection bookkeeping
//!
//! Column counts and data point counts are `usize` in memory but `i32` on
//! disk. Non-zero counts from many sources are summed in a signed 64-bit
//! accumulator that must never wrap.

use crate::MatVarError;

/// Convert an in-memory count to the on-disk `i32` width
///
/// Fails with `CapacityExceeded` when the value does not fit.
pub const fn to_frame_int(value: usize, op: &'static str) -> Result<i32, MatVarError> {
    if value > i32::MAX as usize {
        return Err(MatVarError::CapacityExceeded {
            op,
            reason: "value too large for a 4-byte signed integer",
        });
    }
    Ok(value as i32)
}

/// Convert an on-disk `i32` count back to `usize`
///
/// Negative values can only come from a damaged stream, so they are
/// reported as `CorruptedData`.
pub const fn from_frame_int(value: i32, op: &'static str) -> Result<usize, MatVarError> {
    if value < 0 {
        return Err(MatVarError::CorruptedData {
            op,
            reason: "negative count in stream",
        });
    }
    Ok(value as usize)
}

/// Sum non-zero element counts without leaving the signed 63-bit range
///
/// The total must stay representable as an `i64`; otherwise the
/// accumulation stops with `CapacityExceeded` before any caller commits to
/// an allocation of that size.
pub fn accumulate_nonzero<I>(counts: I, op: &'static str) -> Result<u64, MatVarError>
where
    I: IntoIterator<Item = usize>,
{
    let overflow = MatVarError::CapacityExceeded {
        op,
        reason: "too large for representable element count",
    };
    let mut total: i64 = 0;
    for count in counts {
        let count = i64::try_from(count).map_err(|_| overflow)?;
        total = total.checked_add(count).ok_or(overflow)?;
    }
    Ok(total as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    #[test]
    fn test_to_frame_int() {
        assert_eq!(to_frame_int(0, "t"), Ok(0));
        assert_eq!(to_frame_int(i32::MAX as usize, "t"), Ok(i32::MAX));
        let err = to_frame_int(i32::MAX as usize + 1, "t").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CapacityExceeded);
    }

    #[test]
    fn test_from_frame_int() {
        assert_eq!(from_frame_int(7, "t"), Ok(7));
        let err = from_frame_int(-1, "t").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CorruptedData);
    }

    #[test]
    fn test_accumulate_nonzero_within_range() {
        assert_eq!(accumulate_nonzero([3usize, 0, 9], "t"), Ok(12));
        assert_eq!(accumulate_nonzero(core::iter::empty::<usize>(), "t"), Ok(0));
        let near_limit = i64::MAX as usize - 1;
        assert_eq!(
            accumulate_nonzero([near_limit, 1], "t"),
            Ok(i64::MAX as u64)
        );
    }

    #[test]
    fn test_accumulate_nonzero_overflow() {
        let half = (i64::MAX / 2) as usize + 1;
        let err = accumulate_nonzero([half, half], "MatVar::transfer_from").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CapacityExceeded);
        assert_eq!(err.operation(), "MatVar::transfer_from");

        // A single count beyond i64 is rejected too
        let err = accumulate_nonzero([usize::MAX], "t").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CapacityExceeded);
    }
}
