//! Per-histogram comparison and the score table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dqm_root::RootFile;
use dqm_viz_render::config::VizConfig;
use serde::Serialize;

use crate::config::DqmConfig;
use crate::descriptor::Descriptor;
use crate::error::{CompareError, Result};
use crate::run_id::RunId;
use crate::{ks, loader, plot, ratio};

/// Everything a comparison needs, shared read-only by all workers.
pub struct CompareContext {
    pub current: RootFile,
    pub reference: RootFile,
    pub run: RunId,
    pub ref_run: RunId,
    pub images_dir: PathBuf,
    /// Figure formats by extension; empty disables plotting.
    pub formats: Vec<String>,
    pub viz: VizConfig,
}

impl CompareContext {
    /// Open both files.
    ///
    /// Run ids not given explicitly are taken from the file names.
    pub fn open(
        current: &Path,
        reference: &Path,
        run: Option<RunId>,
        ref_run: Option<RunId>,
        config: &DqmConfig,
    ) -> Result<Self> {
        let run = match run {
            Some(r) => r,
            None => RunId::from_file_name(current)?,
        };
        let ref_run = match ref_run {
            Some(r) => r,
            None => RunId::from_file_name(reference)?,
        };
        let current = RootFile::open(current)?;
        let reference = RootFile::open(reference)?;
        tracing::info!(run = %run, ref_run = %ref_run, "opened input files");

        Ok(Self {
            current,
            reference,
            run,
            ref_run,
            images_dir: config.output.images_dir.clone(),
            formats: config.output.formats.clone(),
            viz: config.viz_config(),
        })
    }

    /// Skip figure rendering; only KS scores are produced.
    pub fn without_plots(mut self) -> Self {
        self.formats.clear();
        self
    }

    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = dir.into();
        self
    }
}

/// Result of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// KS probability.
    Score(f64),
    Failed { error: String },
}

impl Outcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            Outcome::Score(p) => Some(*p),
            Outcome::Failed { .. } => None,
        }
    }
}

/// Outcomes keyed by `<wheel>_<station>_S<sector>_<measurable>`, sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreTable(BTreeMap<String, Outcome>);

impl ScoreTable {
    pub fn insert(&mut self, key: String, outcome: Outcome) {
        if self.0.insert(key.clone(), outcome).is_some() {
            tracing::debug!(key = %key, "duplicate key, keeping the later histogram");
        }
    }

    pub fn get(&self, key: &str) -> Option<&Outcome> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Outcome)> {
        self.0.iter()
    }

    pub fn n_failed(&self) -> usize {
        self.0.values().filter(|o| o.score().is_none()).count()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the table as pretty JSON, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?).map_err(|e| CompareError::io(path, e))
    }
}

/// Classify, load, plot and score one histogram.
///
/// Never fails: errors become [`Outcome::Failed`]. A path that cannot be
/// classified is keyed by the path itself.
pub fn compare_one(ctx: &CompareContext, path: &str) -> (String, Outcome) {
    let (key, result) = match Descriptor::classify(path, &ctx.run, &ctx.ref_run) {
        Ok(desc) => (desc.key(), compare_descriptor(ctx, &desc)),
        Err(e) => (path.to_string(), Err(e)),
    };
    match result {
        Ok(p) => {
            tracing::debug!(path = %path, key = %key, ks = p, "compared");
            (key, Outcome::Score(p))
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "comparison failed");
            (key, Outcome::Failed { error: e.to_string() })
        }
    }
}

fn compare_descriptor(ctx: &CompareContext, desc: &Descriptor) -> Result<f64> {
    let (h1, h2) = loader::load_pair(&ctx.current, &ctx.reference, desc)?;
    let r = ratio::ratio(&h1, &h2)?;
    if !ctx.formats.is_empty() {
        let fig = plot::build_plot(desc, &h1, &h2, &r, &ctx.run, &ctx.ref_run);
        plot::write_figures(&fig, desc, &ctx.images_dir, &ctx.formats, &ctx.viz)?;
    }
    ks::kolmogorov_test(&h1, &h2)
}

/// Compare every path on the current rayon pool.
///
/// Outcomes are folded in input order, so the table does not depend on
/// the number of threads.
pub fn run(ctx: &CompareContext, paths: &[String]) -> ScoreTable {
    use rayon::prelude::*;

    let outcomes: Vec<(String, Outcome)> =
        paths.par_iter().map(|path| compare_one(ctx, path)).collect();

    let mut table = ScoreTable::default();
    for (key, outcome) in outcomes {
        table.insert(key, outcome);
    }
    tracing::info!(
        selected = paths.len(),
        compared = table.len() - table.n_failed(),
        failed = table.n_failed(),
        "comparison finished"
    );
    table
}
