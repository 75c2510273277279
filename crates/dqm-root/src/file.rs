//! File header parsing and the top-level [`RootFile`] handle.

use std::fs;
use std::path::{Path, PathBuf};

use crate::datasource::DataSource;
use crate::decompress::decompress;
use crate::directory::{DirHeader, Directory};
use crate::error::{Result, RootError};
use crate::histogram::Histogram;
use crate::key::Key;
use crate::objects;
use crate::rbuffer::RBuffer;
use crate::walk::Walk;

const ROOT_MAGIC: &[u8; 4] = b"root";
/// Smallest file that can hold the fixed header.
const MIN_FILE_LEN: usize = 64;
/// File format versions from this value on use 64-bit seek pointers.
const LARGE_FILE_VERSION: u32 = 1_000_000;

/// Fields of the file header needed to reach the top directory.
#[derive(Debug, Clone, Copy)]
struct FileHeader {
    is_large: bool,
    top: DirHeader,
}

/// A ROOT file opened read-only.
///
/// The handle is immutable after opening and `Sync`, so one instance can be
/// shared by every worker comparing histograms.
pub struct RootFile {
    data: DataSource,
    header: FileHeader,
    path: PathBuf,
}

impl RootFile {
    /// Memory-map and parse a file on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)?;
        Self::from_source(DataSource::map(&file)?, path)
    }

    /// Parse a file held in memory.
    pub fn from_bytes(data: Vec<u8>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_source(DataSource::Owned(data), path.into())
    }

    fn from_source(data: DataSource, path: PathBuf) -> Result<Self> {
        if data.len() < MIN_FILE_LEN || &data[..4] != ROOT_MAGIC {
            return Err(RootError::BadMagic);
        }
        let header = parse_header(&data)?;
        tracing::debug!(path = %path.display(), large = header.is_large, "opened ROOT file");
        Ok(Self { data, header, path })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Depth-first walk over every non-directory key in the file.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self)
    }

    /// Read a histogram by its slash-separated path.
    ///
    /// Leading, trailing and doubled slashes are ignored, so the paths
    /// produced by [`walk`](Self::walk) resolve as-is.
    pub fn get_histogram(&self, path: &str) -> Result<Histogram> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = parts.split_last() else {
            return Err(RootError::KeyNotFound(path.to_string()));
        };

        let mut dir = self.top_directory()?;
        for &part in dirs {
            let key = dir
                .find_key(part)
                .ok_or_else(|| RootError::KeyNotFound(format!("{part} (in path {path})")))?;
            if !key.is_directory() {
                return Err(RootError::NotADirectory {
                    name: part.to_string(),
                    class_name: key.class_name.clone(),
                });
            }
            dir = self.read_subdirectory(key)?;
        }

        let key = dir.find_key(leaf).ok_or_else(|| RootError::KeyNotFound(path.to_string()))?;
        let payload = self.read_key_payload(key)?;
        objects::read_histogram(&payload, &key.class_name)
    }

    pub(crate) fn top_directory(&self) -> Result<Directory> {
        Directory::read(&self.data, self.header.top, self.header.is_large)
    }

    pub(crate) fn read_subdirectory(&self, key: &Key) -> Result<Directory> {
        let payload = self.read_key_payload(key)?;
        Directory::from_payload(&payload, &self.data, self.header.is_large)
    }

    /// Object bytes behind a key, decompressed when needed.
    pub(crate) fn read_key_payload(&self, key: &Key) -> Result<Vec<u8>> {
        let start = usize::try_from(key.seek_key)
            .map_err(|_| RootError::Deserialization(format!("seek {} too large", key.seek_key)))?;
        let out_of_range = || RootError::BufferUnderflow {
            offset: start,
            need: key.n_bytes as usize,
            have: self.data.len().saturating_sub(start),
        };
        let end = start
            .checked_add(key.n_bytes as usize)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(out_of_range)?;
        let obj_start = start
            .checked_add(usize::from(key.key_len))
            .filter(|&obj_start| obj_start <= end)
            .ok_or_else(out_of_range)?;

        let stored = &self.data[obj_start..end];
        if key.is_compressed() { decompress(stored, key.obj_len as usize) } else { Ok(stored.to_vec()) }
    }
}

/// Parse the fixed file header and the top directory record.
///
/// ```text
/// offset  field (small file; seek fields are u64 when large)
///    0    "root"
///    4    fVersion      u32
///    8    fBEGIN        u32
///   12    fEND          u32 | u64
///         fSeekFree     u32 | u64
///         fNbytesFree   u32
///         nfree         u32
///         fNbytesName   u32
///         fUnits        u8
///         fCompress     u32
///         fSeekInfo     u32 | u64
///         fNbytesInfo   u32
///         fUUID         18 bytes
/// ```
/// The top TDirectory streamer sits at `fBEGIN + fNbytesName`.
fn parse_header(data: &[u8]) -> Result<FileHeader> {
    let mut r = RBuffer::at(data, 4);
    let version = r.read_u32()?;
    let is_large = version >= LARGE_FILE_VERSION;
    let begin = r.read_u32()? as usize;
    let _end = r.read_seek(is_large)?;
    let _seek_free = r.read_seek(is_large)?;
    let _nbytes_free = r.read_u32()?;
    let _nfree = r.read_u32()?;
    let nbytes_name = r.read_u32()? as usize;

    let dir_offset = begin + nbytes_name;
    if dir_offset >= data.len() {
        return Err(RootError::Deserialization("top directory lies past end of file".into()));
    }
    let top = DirHeader::read(&mut RBuffer::at(data, dir_offset))?;
    Ok(FileHeader { is_large, top })
}
