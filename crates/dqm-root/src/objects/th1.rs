//! TH1F / TH1D streamers.
//!
//! Layout as written by ROOT 6 (every versioned block carries a byte count):
//! ```text
//! TH1F | TH1D
//!   TH1
//!     TNamed              fName, fTitle
//!     TAttLine, TAttFill, TAttMarker
//!     fNcells             i32, n_bins + 2
//!     fXaxis              TAxis (fNbins, fXmin, fXmax, fXbins)
//!     fYaxis, fZaxis      skipped by byte count
//!     fBarOffset, fBarWidth, fEntries, fTsumw, fTsumw2, fTsumwx, fTsumwx2
//!     fMaximum, fMinimum  (v >= 2)
//!     fNormFactor         (v >= 3)
//!     fContour, fSumw2    TArrayD
//!     fOption, fFunctions, fBufferSize + fBuffer (v >= 4),
//!     fBinStatErrOpt (v >= 7), fStatOverflows (v >= 8)
//!   TArrayF | TArrayD     fNcells contents, underflow first
//! ```

use crate::error::{Result, RootError};
use crate::histogram::Histogram;
use crate::rbuffer::RBuffer;

/// Element type of the trailing content array.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Storage {
    F32,
    F64,
}

struct Th1Base {
    name: String,
    title: String,
    n_cells: usize,
    axis: AxisInfo,
    entries: f64,
    sumw2: Option<Vec<f64>>,
}

struct AxisInfo {
    n_bins: usize,
    x_min: f64,
    x_max: f64,
    /// Explicit edges for variable binning; empty when uniform.
    edges: Vec<f64>,
}

pub(crate) fn read(data: &[u8], storage: Storage) -> Result<Histogram> {
    let mut r = RBuffer::new(data);
    let (version, _) = r.read_version()?;
    if version < 1 {
        return Err(RootError::Deserialization(format!("unsupported TH1 leaf version {version}")));
    }

    let base = read_th1_base(&mut r)?;

    let n = r.read_u32()? as usize;
    if n != base.n_cells {
        return Err(RootError::Deserialization(format!(
            "content array has {n} cells, fNcells is {}",
            base.n_cells
        )));
    }
    let raw = match storage {
        Storage::F32 => r.read_f32s(n)?,
        Storage::F64 => r.read_f64s(n)?,
    };

    build(base, &raw)
}

fn read_th1_base(r: &mut RBuffer) -> Result<Th1Base> {
    let (version, end) = r.read_version()?;

    let (name, title) = r.read_tnamed()?;
    r.skip_object()?; // TAttLine
    r.skip_object()?; // TAttFill
    r.skip_object()?; // TAttMarker

    let n_cells = r.read_i32()?;
    let n_cells = usize::try_from(n_cells)
        .map_err(|_| RootError::Deserialization(format!("negative fNcells {n_cells}")))?;

    let axis = read_taxis(r)?;
    r.skip_object()?; // fYaxis
    r.skip_object()?; // fZaxis

    let _bar_offset = r.read_i16()?;
    let _bar_width = r.read_i16()?;
    let entries = r.read_f64()?;
    r.skip(4 * 8)?; // fTsumw, fTsumw2, fTsumwx, fTsumwx2
    if version >= 2 {
        r.skip(2 * 8)?; // fMaximum, fMinimum
    }
    if version >= 3 {
        r.skip(8)?; // fNormFactor
    }

    let _contour = r.read_array_d()?;
    let sumw2 = r.read_array_d()?;
    let sumw2 = if sumw2.is_empty() { None } else { Some(sumw2) };

    let _option = r.read_string()?;
    r.skip_object()?; // fFunctions
    if version >= 4 {
        let buffer_size = r.read_i32()?;
        if buffer_size > 0 {
            r.skip(buffer_size as usize * 8)?;
        }
    }
    if version >= 7 {
        let _bin_stat_err_opt = r.read_i32()?;
    }
    if version >= 8 {
        let _stat_overflows = r.read_i32()?;
    }

    // Later versions may append members we do not read.
    if let Some(end) = end.filter(|&e| e > r.pos()) {
        r.jump_to(end)?;
    }

    Ok(Th1Base { name, title, n_cells, axis, entries, sumw2 })
}

fn read_taxis(r: &mut RBuffer) -> Result<AxisInfo> {
    let (_, end) = r.read_version()?;
    let _ = r.read_tnamed()?;
    r.skip_object()?; // TAttAxis

    let n_bins = r.read_i32()?;
    let n_bins = usize::try_from(n_bins)
        .map_err(|_| RootError::Deserialization(format!("negative fNbins {n_bins}")))?;
    let x_min = r.read_f64()?;
    let x_max = r.read_f64()?;
    let edges = r.read_array_d()?;

    match end {
        Some(end) => r.jump_to(end)?,
        None => {
            return Err(RootError::Deserialization(
                "TAxis written without byte count is not supported".into(),
            ));
        }
    }

    Ok(AxisInfo { n_bins, x_min, x_max, edges })
}

fn build(base: Th1Base, raw: &[f64]) -> Result<Histogram> {
    let n_bins = base.axis.n_bins;
    if raw.len() != n_bins + 2 {
        return Err(RootError::Deserialization(format!(
            "{} cells for {n_bins} bins (expected n_bins + 2)",
            raw.len()
        )));
    }

    let bin_content = raw[1..=n_bins].to_vec();
    let sumw2 = base.sumw2.map(|sw2| if sw2.len() == raw.len() { sw2[1..=n_bins].to_vec() } else { sw2 });

    let bin_edges = if base.axis.edges.len() == n_bins + 1 {
        base.axis.edges
    } else {
        let width = (base.axis.x_max - base.axis.x_min) / n_bins.max(1) as f64;
        (0..=n_bins).map(|i| base.axis.x_min + i as f64 * width).collect()
    };

    Ok(Histogram {
        name: base.name,
        title: base.title,
        n_bins,
        x_min: base.axis.x_min,
        x_max: base.axis.x_max,
        bin_edges,
        bin_content,
        sumw2,
        entries: base.entries,
    })
}
