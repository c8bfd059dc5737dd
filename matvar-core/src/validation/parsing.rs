//! Parsing utilities for data point selections
//!
//! Selections are written either as a half-open range (`start:end` or
//! `start-end`) or as a comma separated list of indices (`2,0,0`).

use crate::MatVarError;
use core::ops::Range;

const OP: &str = "parse_range";

fn invalid(reason: &'static str) -> MatVarError {
    MatVarError::InvalidArgument { op: OP, reason }
}

/// Parse a range string in the format "start:end" or "start-end"
///
/// Returns the half-open `start..end`. `start > end` is rejected.
pub fn parse_range(range_str: &str) -> Result<Range<usize>, MatVarError> {
    if range_str.is_empty() {
        return Err(invalid("empty range"));
    }

    let (start_str, end_str) = range_str
        .split_once(':')
        .or_else(|| range_str.split_once('-'))
        .ok_or_else(|| invalid("range must look like start:end"))?;

    let start = parse_usize(start_str)?;
    let end = parse_usize(end_str)?;

    if start > end {
        return Err(invalid("range start exceeds range end"));
    }

    Ok(start..end)
}

/// Parse a comma separated list of data point indices
///
/// Order and duplicates are preserved. Whitespace around entries is ignored.
#[cfg(feature = "alloc")]
pub fn parse_index_list(list: &str) -> Result<alloc::vec::Vec<usize>, MatVarError> {
    if list.trim().is_empty() {
        return Err(invalid("empty index list"));
    }
    list.split(',').map(|part| parse_usize(part.trim())).collect()
}

/// Parse a usize from a string with error handling
fn parse_usize(s: &str) -> Result<usize, MatVarError> {
    if s.is_empty() {
        return Err(invalid("missing number"));
    }

    let mut result: usize = 0;

    for byte in s.bytes() {
        if !byte.is_ascii_digit() {
            return Err(invalid("not a decimal number"));
        }

        let digit = (byte - b'0') as usize;

        if result > (usize::MAX - digit) / 10 {
            return Err(MatVarError::CapacityExceeded {
                op: OP,
                reason: "number too large",
            });
        }

        result = result * 10 + digit;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0:10"), Ok(0..10));
        assert_eq!(parse_range("5:15"), Ok(5..15));
        assert_eq!(parse_range("0-10"), Ok(0..10));
        assert_eq!(parse_range("3:3"), Ok(3..3));

        for bad in ["", "10:5", "abc:def", "10", "10:", ":10", "-1:4"] {
            let err = parse_range(bad).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::InvalidArgument, "{bad}");
        }
    }

    #[test]
    fn test_parse_usize() {
        assert_eq!(parse_usize("0"), Ok(0));
        assert_eq!(parse_usize("999999"), Ok(999999));
        assert!(parse_usize("12a").is_err());
        assert_eq!(
            parse_usize("99999999999999999999999").unwrap_err().category(),
            ErrorCategory::CapacityExceeded
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_parse_index_list() {
        assert_eq!(parse_index_list("2,0"), Ok(alloc::vec![2, 0]));
        assert_eq!(parse_index_list(" 1, 1 ,4"), Ok(alloc::vec![1, 1, 4]));
        assert!(parse_index_list("").is_err());
        assert!(parse_index_list("1,,2").is_err());
        assert!(parse_index_list("1,x").is_err());
    }
}
