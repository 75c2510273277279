//! Backing bytes for an opened ROOT file.

use std::ops::Deref;

/// Where the file bytes live.
///
/// DQM files are opened once and read from many workers, so disk files are
/// memory-mapped; in-memory buffers come from fixtures and `from_bytes`.
pub enum DataSource {
    /// Bytes held in memory.
    Owned(Vec<u8>),
    /// Read-only memory map of a file on disk.
    Mapped(memmap2::Mmap),
}

impl DataSource {
    /// Map a file read-only.
    pub fn map(file: &std::fs::File) -> std::io::Result<Self> {
        // SAFETY: the mapping is read-only; truncating the file underneath a
        // running comparison is outside what we support.
        let mmap = unsafe { memmap2::Mmap::map(file)? };
        Ok(DataSource::Mapped(mmap))
    }
}

impl Deref for DataSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match self {
            DataSource::Owned(v) => v,
            DataSource::Mapped(m) => m,
        }
    }
}
