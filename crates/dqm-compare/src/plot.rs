//! Overlay + ratio figures for one histogram pair.

use std::path::{Path, PathBuf};

use dqm_root::Histogram;
use dqm_viz_render::config::VizConfig;
use dqm_viz_render::plots::ratio::{self as ratio_plot, RatioPlot, Series};

use crate::descriptor::Descriptor;
use crate::error::{CompareError, Result};
use crate::ratio::Ratio;
use crate::run_id::RunId;

/// Figure contents for a normalized pair and its ratio.
pub fn build_plot(
    desc: &Descriptor,
    current: &Histogram,
    reference: &Histogram,
    ratio: &Ratio,
    run: &RunId,
    ref_run: &RunId,
) -> RatioPlot {
    RatioPlot {
        title: desc.title(),
        x_label: String::new(),
        y_label: "a.u.".into(),
        ratio_label: "Ratio".into(),
        bin_edges: current.bin_edges.clone(),
        current: Series { label: format!("Run: {run}"), values: current.bin_content.clone() },
        reference: Series {
            label: format!("Ref. Run: {ref_run}"),
            values: reference.bin_content.clone(),
        },
        ratio: ratio.values.clone(),
        ratio_errors: ratio.errors.clone(),
    }
}

/// `<images_dir>/<group>/<group>_<measurable>.<ext>`
pub fn figure_path(images_dir: &Path, desc: &Descriptor, ext: &str) -> PathBuf {
    let group = desc.group();
    images_dir.join(&group).join(format!("{group}_{}.{ext}", desc.measurable))
}

/// Render `plot` once and write it in every requested format.
///
/// The group directory is created when absent. Returns the written paths.
pub fn write_figures(
    plot: &RatioPlot,
    desc: &Descriptor,
    images_dir: &Path,
    formats: &[String],
    config: &VizConfig,
) -> Result<Vec<PathBuf>> {
    if formats.is_empty() {
        return Ok(Vec::new());
    }
    let svg = ratio_plot::render(plot, config)?;

    let dir = images_dir.join(desc.group());
    std::fs::create_dir_all(&dir).map_err(|e| CompareError::io(&dir, e))?;

    formats
        .iter()
        .map(|ext| -> Result<PathBuf> {
            let path = figure_path(images_dir, desc, ext);
            dqm_viz_render::render_to_file(&svg, &path, config.output.dpi)?;
            Ok(path)
        })
        .collect()
}
