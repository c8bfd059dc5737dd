//! Stream primitives shared by the container framing and backend encodings
//!
//! All integers and elements are little-endian. Framed integers are `i32`,
//! wide counts are `i64`.

use std::io::{ErrorKind, Read, Write};

use matvar_core::{
    from_frame_int, to_frame_int, DataType, MatVarError, MatrixElement, MatrixKind, Result,
    DATA_TYPE_TAG_SIZE, FRAME_INT_SIZE, WIDE_INT_SIZE,
};

/// Binary persistence for a backend matrix
///
/// Each backend owns its encoding; the container only frames it.
pub trait MatrixIo: Sized {
    /// Storage layout written by this backend
    const KIND: MatrixKind;

    /// Write the self-contained encoding of `self`
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;

    /// Read an encoding produced by [`MatrixIo::write_to`]
    fn read_from<R: Read>(reader: &mut R) -> Result<Self>;
}

/// Map an I/O failure to a collection error
///
/// A short read means the stream was cut off, which is reported as
/// corrupted data rather than as an I/O fault.
pub(crate) fn io_error(op: &'static str, err: std::io::Error, reason: &'static str) -> MatVarError {
    if err.kind() == ErrorKind::UnexpectedEof {
        MatVarError::CorruptedData {
            op,
            reason: "unexpected end of stream",
        }
    } else {
        MatVarError::Io { op, reason }
    }
}

fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8], op: &'static str) -> Result<()> {
    writer
        .write_all(bytes)
        .map_err(|e| io_error(op, e, "write failed"))
}

fn read_array<R: Read, const N: usize>(reader: &mut R, op: &'static str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|e| io_error(op, e, "read failed"))?;
    Ok(buf)
}

/// Read exactly `len` bytes without trusting `len` for preallocation
fn read_exact_vec<R: Read>(reader: &mut R, len: usize, op: &'static str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| io_error(op, e, "read failed"))?;
    if buf.len() != len {
        return Err(MatVarError::CorruptedData {
            op,
            reason: "unexpected end of stream",
        });
    }
    Ok(buf)
}

pub(crate) fn write_i32<W: Write>(writer: &mut W, value: i32, op: &'static str) -> Result<()> {
    write_bytes(writer, &value.to_le_bytes(), op)
}

pub(crate) fn read_i32<R: Read>(reader: &mut R, op: &'static str) -> Result<i32> {
    Ok(i32::from_le_bytes(read_array::<R, FRAME_INT_SIZE>(reader, op)?))
}

pub(crate) fn write_i64<W: Write>(writer: &mut W, value: i64, op: &'static str) -> Result<()> {
    write_bytes(writer, &value.to_le_bytes(), op)
}

pub(crate) fn read_i64<R: Read>(reader: &mut R, op: &'static str) -> Result<i64> {
    Ok(i64::from_le_bytes(read_array::<R, WIDE_INT_SIZE>(reader, op)?))
}

/// Write a non-negative count as a framed `i32`
pub(crate) fn write_count<W: Write>(writer: &mut W, count: usize, op: &'static str) -> Result<()> {
    write_i32(writer, to_frame_int(count, op)?, op)
}

/// Read a framed `i32` that must be a non-negative count
pub(crate) fn read_count<R: Read>(reader: &mut R, op: &'static str) -> Result<usize> {
    from_frame_int(read_i32(reader, op)?, op)
}

/// Write a wide count as `i64`
pub(crate) fn write_wide_count<W: Write>(
    writer: &mut W,
    count: usize,
    op: &'static str,
) -> Result<()> {
    let value = i64::try_from(count).map_err(|_| MatVarError::CapacityExceeded {
        op,
        reason: "value too large for an 8-byte signed integer",
    })?;
    write_i64(writer, value, op)
}

/// Read an `i64` that must be a non-negative count
pub(crate) fn read_wide_count<R: Read>(reader: &mut R, op: &'static str) -> Result<usize> {
    let value = read_i64(reader, op)?;
    usize::try_from(value).map_err(|_| MatVarError::CorruptedData {
        op,
        reason: "negative or oversized count in stream",
    })
}

/// Write a self-describing `i32` sequence: length, then values
pub(crate) fn write_int_array<W: Write>(
    writer: &mut W,
    values: &[i32],
    op: &'static str,
) -> Result<()> {
    let mut buf = Vec::with_capacity(FRAME_INT_SIZE * (values.len() + 1));
    buf.extend_from_slice(&to_frame_int(values.len(), op)?.to_le_bytes());
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    write_bytes(writer, &buf, op)
}

/// Read a sequence written by [`write_int_array`]
pub(crate) fn read_int_array<R: Read>(reader: &mut R, op: &'static str) -> Result<Vec<i32>> {
    let len = read_count(reader, op)?;
    let bytes = read_exact_vec(reader, len * FRAME_INT_SIZE, op)?;
    Ok(bytes
        .chunks_exact(FRAME_INT_SIZE)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Write the element type tag of `T`
pub(crate) fn write_data_type<T: MatrixElement, W: Write>(
    writer: &mut W,
    op: &'static str,
) -> Result<()> {
    write_bytes(writer, &[T::data_type().to_u8()], op)
}

/// Read an element type tag and require it to be the tag of `T`
pub(crate) fn expect_data_type<T: MatrixElement, R: Read>(
    reader: &mut R,
    op: &'static str,
) -> Result<()> {
    let [tag] = read_array::<R, DATA_TYPE_TAG_SIZE>(reader, op)?;
    match DataType::from_u8(tag) {
        Some(found) if found == T::data_type() => Ok(()),
        Some(_) => Err(MatVarError::CorruptedData {
            op,
            reason: "element type does not match the requested matrix type",
        }),
        None => Err(MatVarError::CorruptedData {
            op,
            reason: "unknown element type tag",
        }),
    }
}

/// Write a run of elements
pub(crate) fn write_elements<T: MatrixElement, W: Write>(
    writer: &mut W,
    values: &[T],
    op: &'static str,
) -> Result<()> {
    if cfg!(target_endian = "little") {
        return write_bytes(writer, bytemuck::cast_slice(values), op);
    }
    let mut buf = Vec::with_capacity(values.len() * T::size_bytes());
    for &value in values {
        value.write_le(&mut buf);
    }
    write_bytes(writer, &buf, op)
}

/// Read `count` elements written by [`write_elements`]
pub(crate) fn read_elements<T: MatrixElement, R: Read>(
    reader: &mut R,
    count: usize,
    op: &'static str,
) -> Result<Vec<T>> {
    let len = count
        .checked_mul(T::size_bytes())
        .ok_or(MatVarError::CorruptedData {
            op,
            reason: "element count overflows",
        })?;
    let bytes = read_exact_vec(reader, len, op)?;
    if cfg!(target_endian = "little") {
        return Ok(bytemuck::pod_collect_to_vec(&bytes));
    }
    Ok(bytes.chunks_exact(T::size_bytes()).map(T::read_le).collect())
}
