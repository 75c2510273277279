//! # dqm-compare
//!
//! Run-vs-reference comparison of DQM histograms.
//!
//! For every selected histogram of the current run the matching histogram
//! of the reference run is looked up, both are normalized to unit area, an
//! overlay + ratio figure is written, and the Kolmogorov–Smirnov
//! probability is recorded in a [`ScoreTable`].
//!
//! ```no_run
//! use std::path::Path;
//! use dqm_compare::{CompareContext, DqmConfig, pipeline, select};
//!
//! let config = DqmConfig::default();
//! let ctx = CompareContext::open(
//!     Path::new("DQM_V0001_R000339500.root"),
//!     Path::new("DQM_V0001_R000339400.root"),
//!     None,
//!     None,
//!     &config,
//! )?;
//! let paths = select::select(&ctx.current, &config.selection);
//! let table = pipeline::run(&ctx, &paths);
//! table.write_json(Path::new("ks_probs.json"))?;
//! # Ok::<(), dqm_compare::CompareError>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod ks;
pub mod loader;
pub mod pipeline;
pub mod plot;
pub mod ratio;
pub mod run_id;
pub mod select;

pub use config::DqmConfig;
pub use descriptor::{Descriptor, Region};
pub use error::{CompareError, Result};
pub use pipeline::{CompareContext, Outcome, ScoreTable};
pub use run_id::RunId;
