//! # dqm-root
//!
//! Native ROOT file reader for DQM comparisons.
//!
//! Reads TH1F/TH1D histograms out of nested `TDirectoryFile`s without a ROOT
//! installation. Supports zlib, LZ4, ZSTD, and XZ compressed records.
//!
//! ## Example
//!
//! ```no_run
//! use dqm_root::RootFile;
//!
//! let f = RootFile::open("DQM_V0001_R000339500.root").unwrap();
//! for entry in f.walk() {
//!     println!("{} ({})", entry.path, entry.key.class_name);
//! }
//! let h = f.get_histogram("/DQMData/Run 339500/RPC/Run summary/AllHits/Occupancy_W+0_RB1_S01").unwrap();
//! println!("bins: {}, integral: {}", h.n_bins, h.integral());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datasource;
pub mod decompress;
pub mod directory;
pub mod error;
pub mod file;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;
pub mod histogram;
pub mod key;
pub mod objects;
pub mod rbuffer;
pub mod walk;

pub use error::{Result, RootError};
pub use file::RootFile;
pub use histogram::Histogram;
pub use key::KeyInfo;
pub use walk::{Walk, WalkEntry};
