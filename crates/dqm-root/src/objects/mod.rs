//! Object payload decoding, dispatched on the stored class name.

mod th1;

use crate::error::{Result, RootError};
use crate::histogram::Histogram;

/// Histogram classes this reader can decode.
pub const HISTOGRAM_CLASSES: &[&str] = &["TH1F", "TH1D"];

/// Decode a histogram from a decompressed payload.
pub fn read_histogram(payload: &[u8], class_name: &str) -> Result<Histogram> {
    match class_name {
        "TH1F" => th1::read(payload, th1::Storage::F32),
        "TH1D" => th1::read(payload, th1::Storage::F64),
        other => Err(RootError::UnsupportedClass(other.to_string())),
    }
}
