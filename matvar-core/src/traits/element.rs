//! Scalar element contract for backend matrices
//!
//! Defines which scalar types a backend matrix may hold and how a single
//! scalar is laid out in a serialized matrix.

use crate::format::DataType;

/// Trait for types that can be stored as matrix elements
///
/// All element types are plain old data (`bytemuck::Pod`), have a zero
/// value (`Default`), and encode as little-endian bytes of `size_bytes()`
/// length.
pub trait MatrixElement:
    Copy + Clone + PartialEq + Default + Send + Sync + bytemuck::Pod + core::fmt::Debug
{
    /// Tag written ahead of a serialized matrix holding this type
    fn data_type() -> DataType;

    /// Size in bytes of one encoded element
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Whether this value is the additive zero
    fn is_zero(self) -> bool {
        self == Self::default()
    }

    /// Append the little-endian encoding of `self` to `out`
    #[cfg(feature = "alloc")]
    fn write_le(self, out: &mut alloc::vec::Vec<u8>);

    /// Decode from exactly `size_bytes()` little-endian bytes
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_matrix_element {
    ($ty:ty, $tag:ident) => {
        impl MatrixElement for $ty {
            fn data_type() -> DataType {
                DataType::$tag
            }

            #[cfg(feature = "alloc")]
            fn write_le(self, out: &mut alloc::vec::Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..core::mem::size_of::<$ty>()]);
                <$ty>::from_le_bytes(raw)
            }
        }
    };
}

impl_matrix_element!(f32, F32);
impl_matrix_element!(f64, F64);
impl_matrix_element!(i32, I32);
impl_matrix_element!(i64, I64);
impl_matrix_element!(u32, U32);
impl_matrix_element!(u64, U64);

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_data_type_tags() {
        assert_eq!(f32::data_type(), DataType::F32);
        assert_eq!(u64::data_type(), DataType::U64);
        assert_eq!(f64::size_bytes(), 8);
        assert_eq!(i32::size_bytes(), 4);
    }

    #[test]
    fn test_le_encoding() {
        let mut out = Vec::new();
        1.5f32.write_le(&mut out);
        (-2i32).write_le(&mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(f32::read_le(&out[0..4]), 1.5);
        assert_eq!(i32::read_le(&out[4..8]), -2);
        assert_eq!(&out[4..8], &[0xfe, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_is_zero() {
        assert!(0.0f64.is_zero());
        assert!(!0.25f64.is_zero());
        assert!(0u32.is_zero());
    }
}
