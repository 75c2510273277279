//! Error types for ROOT file reading.

use thiserror::Error;

/// Errors raised while decoding a ROOT file.
#[derive(Error, Debug)]
pub enum RootError {
    /// I/O error opening or mapping the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File does not start with the `root` magic or is too short.
    #[error("not a ROOT file (bad magic)")]
    BadMagic,

    /// A read ran past the end of the buffer.
    #[error("buffer underflow at offset {offset}: need {need} bytes, have {have}")]
    BufferUnderflow {
        /// Read position.
        offset: usize,
        /// Bytes requested.
        need: usize,
        /// Bytes available.
        have: usize,
    },

    /// Compressed record could not be inflated.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Streamed object did not match the expected layout.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// No key with this name (or path) exists.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Intermediate path component is not a directory.
    #[error("'{name}' is not a directory (class: {class_name})")]
    NotADirectory {
        /// Path component.
        name: String,
        /// Its stored class.
        class_name: String,
    },

    /// Object exists but is not a supported histogram class.
    #[error("unsupported class: {0}")]
    UnsupportedClass(String),
}

/// Result alias for ROOT reading.
pub type Result<T> = std::result::Result<T, RootError>;
