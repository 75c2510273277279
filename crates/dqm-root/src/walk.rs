//! Lazy depth-first traversal of a file's directory tree.

use std::vec;

use crate::file::RootFile;
use crate::key::{Key, KeyInfo};

/// One non-directory key reached by [`Walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Slash-joined path from the file root, with a leading `/`.
    pub path: String,
    /// Name, class and cycle of the key.
    pub key: KeyInfo,
}

struct Frame {
    prefix: String,
    keys: vec::IntoIter<Key>,
}

/// Depth-first iterator over every leaf key of a [`RootFile`].
///
/// Directories are decoded only when reached. One that fails to decode is
/// logged and skipped; its siblings are still visited. Keys with several
/// cycles are reported once, at their highest cycle.
pub struct Walk<'a> {
    file: &'a RootFile,
    stack: Vec<Frame>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(file: &'a RootFile) -> Self {
        let stack = match file.top_directory() {
            Ok(dir) => vec![Frame { prefix: String::new(), keys: latest(&dir) }],
            Err(e) => {
                tracing::warn!(path = %file.path().display(), error = %e, "cannot read top directory");
                Vec::new()
            }
        };
        Self { file, stack }
    }
}

fn latest(dir: &crate::directory::Directory) -> vec::IntoIter<Key> {
    dir.latest_keys().into_iter().cloned().collect::<Vec<_>>().into_iter()
}

impl Iterator for Walk<'_> {
    type Item = WalkEntry;

    fn next(&mut self) -> Option<WalkEntry> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(key) = frame.keys.next() else {
                self.stack.pop();
                continue;
            };
            let path = format!("{}/{}", frame.prefix, key.name);

            if !key.is_directory() {
                return Some(WalkEntry { path, key: KeyInfo::from(&key) });
            }
            match self.file.read_subdirectory(&key) {
                Ok(dir) => self.stack.push(Frame { prefix: path, keys: latest(&dir) }),
                Err(e) => tracing::warn!(path = %path, error = %e, "skipping unreadable directory"),
            }
        }
    }
}
