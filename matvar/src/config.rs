//! Configuration for reading and writing collections

/// Options controlling how collections are loaded from files
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IoConfig {
    /// Files at least this large are memory-mapped instead of read into a buffer
    pub mmap_threshold_bytes: usize,
}

impl IoConfig {
    /// Default memory-map threshold (64 MiB)
    pub const DEFAULT_MMAP_THRESHOLD: usize = 64 * 1024 * 1024;

    /// Set the memory-map threshold in bytes
    pub fn with_mmap_threshold(mut self, bytes: usize) -> Self {
        self.mmap_threshold_bytes = bytes;
        self
    }

    /// Whether a file of `len` bytes should be memory-mapped
    pub fn should_mmap(&self, len: u64) -> bool {
        cfg!(feature = "mmap") && len >= self.mmap_threshold_bytes as u64
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            mmap_threshold_bytes: Self::DEFAULT_MMAP_THRESHOLD,
        }
    }
}
