//! Histogram classification from the DQM naming convention.
//!
//! Base names look like `<measurable>_<wheelOrDisk>_<station>_<sectorToken>`,
//! e.g. `Occupancy_W+0_RB1_S01` or `BXDistribution_Disk-1_RE1_R2_CH05`.

use std::fmt;

use serde::Serialize;

use crate::error::{CompareError, Result};
use crate::run_id::RunId;

/// Detector region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Barrel,
    Endcap,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Barrel => "barrel",
            Region::Endcap => "endcap",
        })
    }
}

/// Everything derived from one histogram path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    /// Path in the current file.
    pub path: String,
    /// Path in the reference file.
    pub ref_path: String,
    pub region: Region,
    /// Wheel (`W-2` .. `W2`) or disk label.
    pub wheel: String,
    pub station: String,
    /// Two-character sector.
    pub sector: String,
    pub measurable: String,
}

impl Descriptor {
    /// Parse `path` and derive the reference path.
    ///
    /// The reference path replaces the first occurrence of the current run
    /// id with the reference run id; other segments are left untouched.
    pub fn classify(path: &str, run: &RunId, ref_run: &RunId) -> Result<Self> {
        let base = path.rsplit('/').next().unwrap_or(path);
        let tokens: Vec<&str> = base.split('_').collect();
        let [measurable, wheel, station, sector_token, ..] = tokens.as_slice() else {
            return Err(CompareError::MalformedName(base.to_string()));
        };

        let wheel = if *wheel == "W+0" { "W0" } else { *wheel };
        let region = if wheel.starts_with('W') { Region::Barrel } else { Region::Endcap };

        Ok(Self {
            path: path.to_string(),
            ref_path: path.replacen(run.as_str(), ref_run.as_str(), 1),
            region,
            wheel: wheel.to_string(),
            station: station.to_string(),
            sector: last_chars(sector_token, 2).to_string(),
            measurable: measurable.to_string(),
        })
    }

    /// `<wheel>_<station>_S<sector>`: the chamber group and image folder.
    pub fn group(&self) -> String {
        format!("{}_{}_S{}", self.wheel, self.station, self.sector)
    }

    /// Score table key, `<wheel>_<station>_S<sector>_<measurable>`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.group(), self.measurable)
    }

    /// Figure title, `<measurable> - <wheel>_<station>_S<sector>`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.measurable, self.group())
    }
}

/// The last `n` characters of `s`, or all of it when shorter.
fn last_chars(s: &str, n: usize) -> &str {
    match s.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((i, _)) if n > 0 => &s[i..],
        _ if n == 0 => "",
        _ => s,
    }
}
