//! Run configuration: which histograms to compare and where results go.
//!
//! Every section and field is optional in YAML; missing values fall back to
//! the defaults below.
//!
//! ```yaml
//! selection:
//!   classes: [TH1F]
//!   require: "AllHits/"
//!   exclude: [SummaryHistogram]
//! output:
//!   images_dir: images
//!   formats: [png, pdf]
//! plot:
//!   ratio_range: [0.5, 1.5]
//! ```

use std::path::{Path, PathBuf};

use dqm_viz_render::color::Color;
use dqm_viz_render::config::VizConfig;
use serde::Deserialize;

use crate::error::{CompareError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DqmConfig {
    pub selection: SelectionConfig,
    pub output: OutputConfig,
    pub plot: PlotConfig,
}

/// Which leaves of the current file are compared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Accepted object classes.
    pub classes: Vec<String>,
    /// Substring every selected path must contain.
    pub require: String,
    /// Substrings that disqualify a path.
    pub exclude: Vec<String>,
    /// Leaf-name prefixes skipped during the walk.
    pub skip_prefixes: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            classes: vec!["TH1F".into()],
            require: "AllHits/".into(),
            exclude: vec!["SummaryHistogram".into()],
            skip_prefixes: ["<", "readoutErrors", "record", "RPCEvents"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub images_dir: PathBuf,
    pub scores_file: PathBuf,
    /// Figure formats, by file extension.
    pub formats: Vec<String>,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".into(),
            scores_file: "ks_probs.json".into(),
            formats: vec!["png".into(), "pdf".into()],
            dpi: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    /// Figure size in points.
    pub width: f64,
    pub height: f64,
    pub current_color: Color,
    pub reference_color: Color,
    pub line_width: f64,
    pub ratio_range: [f64; 2],
    /// Share of the height given to the ratio pad.
    pub ratio_frac: f64,
    pub grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 576.0,
            height: 576.0,
            current_color: Color::RED,
            reference_color: Color::BLUE,
            line_width: 3.0,
            ratio_range: [0.0, 2.1],
            ratio_frac: 0.3,
            grid: true,
        }
    }
}

const KNOWN_FORMATS: &[&str] = &["svg", "png", "pdf"];

impl DqmConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| CompareError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
        Self::from_yaml_str(&text)
            .map_err(|e| CompareError::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(f) = self.output.formats.iter().find(|f| !KNOWN_FORMATS.contains(&f.as_str())) {
            return Err(CompareError::Config(format!(
                "unknown figure format {f:?}, expected one of {KNOWN_FORMATS:?}"
            )));
        }
        if self.selection.classes.is_empty() {
            return Err(CompareError::Config("selection.classes must not be empty".into()));
        }
        self.viz_config().validate()?;
        Ok(())
    }

    /// Renderer settings derived from the `plot` and `output` sections.
    pub fn viz_config(&self) -> VizConfig {
        let mut viz = VizConfig::default();
        viz.figure.width = self.plot.width;
        viz.figure.height = self.plot.height;
        viz.colors.current = self.plot.current_color;
        viz.colors.reference = self.plot.reference_color;
        viz.colors.line_width = self.plot.line_width;
        viz.ratio.y_range = self.plot.ratio_range;
        viz.ratio.frac = self.plot.ratio_frac;
        viz.grid.show = self.plot.grid;
        viz.output.dpi = self.output.dpi;
        viz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let c = DqmConfig::from_yaml_str("{}").unwrap();
        assert_eq!(c.selection, SelectionConfig::default());
        assert_eq!(c.output.images_dir, PathBuf::from("images"));
        assert_eq!(c.output.scores_file, PathBuf::from("ks_probs.json"));
        assert_eq!(c.output.formats, vec!["png", "pdf"]);
        assert_eq!(c.selection.skip_prefixes.len(), 4);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let yaml = "selection:\n  exclude: [SummaryHistogram, Profile]\nplot:\n  ratio_range: [0.5, 1.5]\n  grid: false\n";
        let c = DqmConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(c.selection.exclude, vec!["SummaryHistogram", "Profile"]);
        assert_eq!(c.selection.require, "AllHits/");

        let viz = c.viz_config();
        assert_eq!(viz.ratio.y_range, [0.5, 1.5]);
        assert!(!viz.grid.show);
        assert_eq!(viz.colors.line_width, 3.0);
        assert_eq!(viz.output.dpi, 100);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(DqmConfig::from_yaml_str("output:\n  formats: [gif]\n").is_err());
        assert!(DqmConfig::from_yaml_str("plot:\n  ratio_frac: 0\n").is_err());
        assert!(DqmConfig::from_yaml_str("selection:\n  classes: []\n").is_err());
        assert!(DqmConfig::from_yaml_str("plots: {}\n").is_err());
        assert!(DqmConfig::from_yaml_str("plot:\n  current_color: notacolor\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = DqmConfig::load(Path::new("/nonexistent/dqm.yaml")).unwrap_err();
        assert!(matches!(err, CompareError::Io { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dqm.yaml");
        std::fs::write(&path, "output:\n  dpi: 150\n  formats: [svg]\n").unwrap();
        let c = DqmConfig::load(&path).unwrap();
        assert_eq!(c.output.dpi, 150);
        assert_eq!(c.output.formats, vec!["svg"]);
    }
}
