//! Run identifiers derived from DQM file names.

use std::fmt;
use std::path::Path;

use crate::error::{CompareError, Result};

const RUN_ID_LEN: usize = 6;

/// Six-digit run number as it appears in DQM paths (`Run 339500`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    /// Validate an explicit identifier.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() == RUN_ID_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(CompareError::InvalidRunId(s.to_string()))
        }
    }

    /// Last six characters of the file name before its first `.root`.
    ///
    /// `DQM_V0001_R000339500.root` gives `339500`.
    pub fn from_file_name(path: &Path) -> Result<Self> {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let stem = name.split(".root").next().unwrap_or_default();
        let tail = stem.char_indices().rev().nth(RUN_ID_LEN - 1).map_or(stem, |(i, _)| &stem[i..]);
        Self::parse(tail)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dqm_file_name() {
        let id = RunId::from_file_name(Path::new("/data/DQM_V0001_R000339500.root")).unwrap();
        assert_eq!(id.as_str(), "339500");
        assert_eq!(id.to_string(), "339500");
    }

    #[test]
    fn text_after_root_suffix_is_ignored() {
        let id = RunId::from_file_name(Path::new("DQM_R000339400.root.bak")).unwrap();
        assert_eq!(id.as_str(), "339400");
    }

    #[test]
    fn non_numeric_tail_is_rejected() {
        let err = RunId::from_file_name(Path::new("reference.root")).unwrap_err();
        assert!(matches!(err, CompareError::InvalidRunId(s) if s == "erence"));
        assert!(RunId::from_file_name(Path::new("42.root")).is_err());
    }

    #[test]
    fn explicit_ids() {
        assert!(RunId::parse("339500").is_ok());
        assert!(RunId::parse("33950").is_err());
        assert!(RunId::parse("3395001").is_err());
        assert!(RunId::parse("33950a").is_err());
    }
}
