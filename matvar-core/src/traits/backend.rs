//! Storage backend trait for serialized collections
//!
//! Loading a collection from a file goes through a byte view of the file,
//! whether that view is a memory map or a buffer read into memory.

/// Trait for backends that expose serialized bytes
///
/// This trait provides a minimal interface for accessing the underlying
/// byte data of a storage backend, regardless of how it's implemented
/// (memory-mapped files, in-memory buffers, etc.).
pub trait StorageBackend {
    /// Get a slice of the underlying data
    fn as_slice(&self) -> &[u8];

    /// Get the size of the data in bytes
    ///
    /// Default implementation uses the slice length.
    fn size(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the backend holds no bytes at all
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl StorageBackend for [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

#[cfg(feature = "alloc")]
impl StorageBackend for alloc::vec::Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }
}
