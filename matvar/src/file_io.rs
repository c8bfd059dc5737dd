//! File targets for serialized collections
//!
//! Writing goes through a buffered file. Reading loads the whole file as a
//! [`StorageBackend`]: large files are memory-mapped, small ones are read
//! into an owned buffer, and decoding then runs over the byte slice.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use matvar_core::{MatVarError, Result, StorageBackend};
#[cfg(feature = "mmap")]
use memmap2::{Mmap, MmapOptions};

use crate::codec::io_error;
use crate::config::IoConfig;

/// Bytes of a collection file held in memory
pub enum FileBytes {
    /// Memory-mapped file contents
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
    /// File contents read into memory
    Buffered(Vec<u8>),
}

impl StorageBackend for FileBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            FileBytes::Mapped(mmap) => &mmap[..],
            FileBytes::Buffered(buf) => buf.as_slice(),
        }
    }
}

impl FileBytes {
    /// Whether the contents are memory-mapped
    pub fn is_mapped(&self) -> bool {
        match self {
            #[cfg(feature = "mmap")]
            FileBytes::Mapped(_) => true,
            FileBytes::Buffered(_) => false,
        }
    }
}

/// Load a file, memory-mapping it when `config` says so
pub fn load<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<FileBytes> {
    let op = "file_io::load";
    let mut file = File::open(path.as_ref()).map_err(|_| MatVarError::Io {
        op,
        reason: "failed to open file",
    })?;
    let len = file
        .metadata()
        .map_err(|_| MatVarError::Io {
            op,
            reason: "failed to read file metadata",
        })?
        .len();

    if config.should_mmap(len) {
        #[cfg(feature = "mmap")]
        {
            // SAFETY: The map is read-only and lives only as long as the
            // returned FileBytes. Concurrent modification of the file by
            // another process is not guarded against, as with any mmap.
            let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|_| MatVarError::Io {
                op,
                reason: "failed to memory-map file",
            })?;
            tracing::debug!(path = %path.as_ref().display(), len, "memory-mapped collection file");
            return Ok(FileBytes::Mapped(mmap));
        }
    }

    let mut buf = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    file.read_to_end(&mut buf)
        .map_err(|e| io_error(op, e, "failed to read file"))?;
    tracing::debug!(path = %path.as_ref().display(), len, mapped = false, "read collection file");
    Ok(FileBytes::Buffered(buf))
}

/// Create (or truncate) a file and run `write` against a buffered writer
pub fn write_with<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let op = "file_io::write_with";
    let file = File::create(path.as_ref()).map_err(|_| MatVarError::Io {
        op,
        reason: "failed to create file",
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .map_err(|e| io_error(op, e, "failed to flush file"))?;
    Ok(())
}
