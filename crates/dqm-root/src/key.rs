//! TKey records: the per-object header that locates a payload in the file.

use crate::error::Result;
use crate::rbuffer::RBuffer;

/// Keys with a class version above this use 64-bit seek pointers.
const LARGE_KEY_VERSION: u16 = 1000;

/// A decoded TKey.
#[derive(Debug, Clone)]
pub struct Key {
    /// Key header plus (possibly compressed) object bytes.
    pub n_bytes: u32,
    /// TKey class version.
    pub version: u16,
    /// Uncompressed object length.
    pub obj_len: u32,
    /// Length of this header.
    pub key_len: u16,
    /// Cycle number within the owning directory.
    pub cycle: u16,
    /// Absolute file offset of the key.
    pub seek_key: u64,
    /// Stored class name, e.g. `TH1F` or `TDirectoryFile`.
    pub class_name: String,
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
}

/// Name, class and cycle of a key, detached from file offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Object name.
    pub name: String,
    /// Object class name.
    pub class_name: String,
    /// Cycle number.
    pub cycle: u16,
}

impl From<&Key> for KeyInfo {
    fn from(key: &Key) -> Self {
        Self { name: key.name.clone(), class_name: key.class_name.clone(), cycle: key.cycle }
    }
}

impl Key {
    /// Decode a key at the reader's position.
    pub fn read(r: &mut RBuffer, file_is_large: bool) -> Result<Self> {
        let n_bytes = r.read_u32()?;
        let version = r.read_u16()?;
        let obj_len = r.read_u32()?;
        let _datime = r.read_u32()?;
        let key_len = r.read_u16()?;
        let cycle = r.read_u16()?;
        let large = file_is_large || version > LARGE_KEY_VERSION;
        let seek_key = r.read_seek(large)?;
        let _seek_pdir = r.read_seek(large)?;
        let class_name = r.read_string()?;
        let name = r.read_string()?;
        let title = r.read_string()?;

        Ok(Key { n_bytes, version, obj_len, key_len, cycle, seek_key, class_name, name, title })
    }

    /// Whether this key holds a sub-directory.
    pub fn is_directory(&self) -> bool {
        is_directory_class(&self.class_name)
    }

    /// Whether the payload is stored compressed.
    pub fn is_compressed(&self) -> bool {
        self.obj_len != self.n_bytes.saturating_sub(u32::from(self.key_len))
    }
}

/// Classes ROOT treats as folders.
pub fn is_directory_class(class_name: &str) -> bool {
    matches!(class_name, "TDirectoryFile" | "TDirectory")
}
