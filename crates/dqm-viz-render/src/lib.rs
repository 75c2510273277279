//! # dqm-viz-render
//!
//! Immediate-mode SVG drawing for DQM comparison figures, with raster (PNG)
//! and vector (PDF) export through `resvg` and `svg2pdf`.
//!
//! The plot entry point is [`plots::ratio::render`], which draws two
//! normalized histograms as step outlines above a ratio pad and returns the
//! SVG document; [`render_to_file`] converts it to whatever format the file
//! extension names.

pub mod canvas;
pub mod color;
pub mod config;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnknownFormat(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Convert an SVG document to bytes in `format` (`svg`, `png` or `pdf`).
pub fn render_to_bytes(svg: &str, format: &str, dpi: u32) -> Result<Vec<u8>> {
    match format {
        "svg" => Ok(svg.as_bytes().to_vec()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(svg, dpi),
        #[cfg(feature = "pdf")]
        "pdf" => output::pdf::svg_to_pdf(svg),
        other => {
            let _ = dpi;
            Err(RenderError::UnknownFormat(other.to_string()))
        }
    }
}

/// Write an SVG document to `path`, format inferred from the extension.
pub fn render_to_file(svg: &str, path: &Path, dpi: u32) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let bytes = render_to_bytes(svg, ext, dpi)?;
    std::fs::write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "figure written");
    Ok(())
}
