//! Fetching histogram pairs and normalizing them to unit area.

use dqm_root::{Histogram, RootError, RootFile};

use crate::descriptor::Descriptor;
use crate::error::{CompareError, Result};

/// Scale `h` so its in-range integral is 1.
///
/// A histogram with zero integral is left untouched. Errors follow the
/// contents (see [`Histogram::scale`]).
pub fn normalize(h: &mut Histogram) {
    let integral = h.integral();
    if integral != 0.0 {
        h.scale(1.0 / integral);
    }
}

/// Read one histogram, mapping a missing key to `HistogramNotFound`.
pub fn fetch(file: &RootFile, label: &str, path: &str) -> Result<Histogram> {
    file.get_histogram(path).map_err(|e| match e {
        RootError::KeyNotFound(_) | RootError::NotADirectory { .. } => {
            CompareError::HistogramNotFound { file: label.to_string(), path: path.to_string() }
        }
        other => CompareError::Root(other),
    })
}

/// Current and reference histograms for `desc`, both normalized.
pub fn load_pair(
    current: &RootFile,
    reference: &RootFile,
    desc: &Descriptor,
) -> Result<(Histogram, Histogram)> {
    let mut h1 = fetch(current, "current", &desc.path)?;
    let mut h2 = fetch(reference, "reference", &desc.ref_path)?;
    normalize(&mut h1);
    normalize(&mut h2);
    tracing::debug!(
        path = %desc.path,
        entries = h1.entries,
        ref_entries = h2.entries,
        "loaded histogram pair"
    );
    Ok((h1, h2))
}
