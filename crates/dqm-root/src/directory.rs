//! TDirectory records and their key lists.

use crate::error::Result;
use crate::key::Key;
use crate::rbuffer::RBuffer;

/// Directory class versions above this use 64-bit seek pointers.
const LARGE_DIR_VERSION: u16 = 1000;

/// Seek information carried by a TDirectory streamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirHeader {
    /// Offset of the key-list record.
    pub seek_keys: u64,
    /// Size of the key-list record.
    pub nbytes_keys: u32,
}

impl DirHeader {
    /// Decode a TDirectory streamer at the reader's position.
    pub fn read(r: &mut RBuffer) -> Result<Self> {
        let version = r.read_u16()?;
        let _datime_c = r.read_u32()?;
        let _datime_m = r.read_u32()?;
        let nbytes_keys = r.read_u32()?;
        let _nbytes_name = r.read_u32()?;
        let large = version > LARGE_DIR_VERSION;
        let _seek_dir = r.read_seek(large)?;
        let _seek_parent = r.read_seek(large)?;
        let seek_keys = r.read_seek(large)?;
        Ok(Self { seek_keys, nbytes_keys })
    }
}

/// The ordered keys of one directory.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    keys: Vec<Key>,
}

impl Directory {
    /// Read the key list referenced by `header` out of the whole file.
    ///
    /// The list is itself stored behind a TKey header, followed by a u32 key
    /// count and that many TKey records. An empty directory has
    /// `seek_keys == 0`.
    pub fn read(file_data: &[u8], header: DirHeader, file_is_large: bool) -> Result<Self> {
        if header.seek_keys == 0 {
            return Ok(Self::default());
        }
        let mut r = RBuffer::at(file_data, header.seek_keys as usize);
        let _list_key = Key::read(&mut r, file_is_large)?;
        let n = r.read_u32()? as usize;
        let keys = (0..n).map(|_| Key::read(&mut r, file_is_large)).collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    /// Decode a sub-directory from its (decompressed) TDirectoryFile payload.
    pub fn from_payload(payload: &[u8], file_data: &[u8], file_is_large: bool) -> Result<Self> {
        let header = DirHeader::read(&mut RBuffer::new(payload))?;
        Self::read(file_data, header, file_is_large)
    }

    /// Every key as stored, all cycles included.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// One key per name, keeping the highest cycle, in first-seen order.
    pub fn latest_keys(&self) -> Vec<&Key> {
        let mut out: Vec<&Key> = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            match out.iter_mut().find(|k| k.name == key.name) {
                Some(slot) if slot.cycle < key.cycle => *slot = key,
                Some(_) => {}
                None => out.push(key),
            }
        }
        out
    }

    /// Key with this name and the highest cycle.
    pub fn find_key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().filter(|k| k.name == name).max_by_key(|k| k.cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, cycle: u16) -> Key {
        Key {
            n_bytes: 0,
            version: 4,
            obj_len: 0,
            key_len: 0,
            cycle,
            seek_key: u64::from(cycle),
            class_name: "TH1F".into(),
            name: name.into(),
            title: String::new(),
        }
    }

    #[test]
    fn latest_keys_dedups_cycles_in_order() {
        let dir = Directory { keys: vec![key("b", 1), key("a", 1), key("b", 2)] };
        let latest: Vec<(&str, u16)> =
            dir.latest_keys().iter().map(|k| (k.name.as_str(), k.cycle)).collect();
        assert_eq!(latest, vec![("b", 2), ("a", 1)]);
        assert_eq!(dir.find_key("b").map(|k| k.cycle), Some(2));
        assert!(dir.find_key("missing").is_none());
    }

    #[test]
    fn empty_directory_has_no_keys() {
        let dir = Directory::read(&[], DirHeader { seek_keys: 0, nbytes_keys: 0 }, false).unwrap();
        assert!(dir.keys().is_empty());
    }
}
