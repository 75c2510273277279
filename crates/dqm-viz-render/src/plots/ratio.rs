//! Overlay of two histograms above a ratio pad.
//!
//! ```text
//! +------------------------------+
//! |   title                      |
//! |  current (step)   legend     |  main pad, 1 - ratio_frac
//! |  reference (step)            |
//! +------------------------------+  shared edge, no gap
//! |  current / reference  (ep)   |  ratio pad, fixed y range
//! +------------------------------+
//! ```

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendEntry};
use crate::layout::margins::{Margins, PlotArea};
use crate::layout::multi_panel::MainRatioLayout;
use crate::plots::axes_draw::{Y_LABEL_OFFSET, draw_axes};
use crate::primitives::{HAlign, Stroke, TextStyle};
use crate::RenderError;

/// Headroom above the tallest bin of the main pad.
const Y_HEADROOM: f64 = 1.05;

/// One histogram drawn as a step outline.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// Everything the figure shows; binning is shared by all series.
#[derive(Debug, Clone)]
pub struct RatioPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub ratio_label: String,
    /// `n + 1` edges.
    pub bin_edges: Vec<f64>,
    pub current: Series,
    pub reference: Series,
    pub ratio: Vec<f64>,
    pub ratio_errors: Vec<f64>,
}

impl RatioPlot {
    fn check(&self) -> crate::Result<usize> {
        let n = self.current.values.len();
        if n == 0 {
            return Err(RenderError::Layout("histogram has no bins".into()));
        }
        let lens = [self.reference.values.len(), self.ratio.len(), self.ratio_errors.len()];
        if self.bin_edges.len() != n + 1 || lens.iter().any(|&l| l != n) {
            return Err(RenderError::Layout(format!(
                "inconsistent series lengths: {} edges for {n} bins, others {lens:?}",
                self.bin_edges.len()
            )));
        }
        Ok(n)
    }
}

/// Render the figure to an SVG document.
pub fn render(plot: &RatioPlot, config: &VizConfig) -> crate::Result<String> {
    let n_bins = plot.check()?;
    let mut canvas =
        Canvas::new(config.figure.width, config.figure.height)?.with_font_family(&config.font.family);

    let x_min = plot.bin_edges[0];
    let x_max = plot.bin_edges[n_bins];

    let y_max = plot
        .current
        .values
        .iter()
        .chain(&plot.reference.values)
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_top = if y_max > 0.0 { y_max * Y_HEADROOM } else { 1.0 };
    let mut y_main = Axis::auto_linear(0.0, y_top, 6).with_label(&plot.y_label);
    // The bottom label would collide with the top label of the ratio pad.
    if let (Some(&first), Some(label)) = (y_main.tick_positions.first(), y_main.tick_labels.first_mut()) {
        if first <= y_main.min {
            label.clear();
        }
    }
    let x_main = Axis::exact(x_min, x_max, 8).without_tick_labels();

    let [r_lo, r_hi] = config.ratio.y_range;
    let x_ratio = Axis::exact(x_min, x_max, 8).with_label(&plot.x_label);
    let y_ratio = Axis::with_divisions(r_lo, r_hi, config.ratio.ndivisions).with_label(&plot.ratio_label);

    let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
    let widest_tick = y_main
        .tick_labels
        .iter()
        .chain(&y_ratio.tick_labels)
        .map(|l| canvas.measure_text(l, &tick_style).width)
        .fold(0.0_f64, f64::max);
    let margins = Margins {
        left: (widest_tick + 12.0).max(Y_LABEL_OFFSET) + config.font.label_size + 8.0,
        right: 20.0,
        top: config.font.title_size * 1.4 + 14.0,
        bottom: config.font.tick_size + config.font.label_size + 34.0,
    };
    let content = PlotArea::inset(canvas.width, canvas.height, margins)?;
    let layout = MainRatioLayout::split(content, 0.0, config.ratio.frac);

    // --- Main pad ---
    let main = &layout.main;
    draw_axes(&mut canvas, main, &x_main, &y_main, config);

    let title_style = TextStyle {
        size: config.font.title_size,
        align: HAlign::Middle,
        bold: true,
        ..Default::default()
    };
    canvas.text(main.left + main.width / 2.0, main.top - 10.0, &plot.title, &title_style);

    let px_edges: Vec<f64> =
        plot.bin_edges.iter().map(|&e| x_main.data_to_pixel(e, main.left, main.right())).collect();
    let y_base = y_main.data_to_pixel(0.0, main.bottom(), main.top);

    canvas.push_clip(main.left, main.top, main.width, main.height);
    for (series, color) in
        [(&plot.current, config.colors.current), (&plot.reference, config.colors.reference)]
    {
        let py: Vec<f64> = series
            .values
            .iter()
            .map(|&v| y_main.data_to_pixel(if v.is_finite() { v } else { 0.0 }, main.bottom(), main.top))
            .collect();
        canvas.step_outline(&px_edges, &py, y_base, &Stroke::solid(color, config.colors.line_width));
    }
    canvas.pop_clip();

    let entries = [
        (&plot.current.label, config.colors.current),
        (&plot.reference.label, config.colors.reference),
    ]
    .into_iter()
    .map(|(label, color)| LegendEntry {
        label: label.clone(),
        color,
        line_width: config.colors.line_width,
    })
    .collect::<Vec<_>>();
    legend::draw_legend(&mut canvas, main, &entries, config.font.size);

    // --- Ratio pad ---
    let ratio = &layout.ratio;
    draw_axes(&mut canvas, ratio, &x_ratio, &y_ratio, config);
    canvas.push_clip(ratio.left, ratio.top, ratio.width, ratio.height);

    if (r_lo..=r_hi).contains(&1.0) {
        let ref_py = y_ratio.data_to_pixel(1.0, ratio.bottom(), ratio.top);
        canvas.line(
            ratio.left,
            ref_py,
            ratio.right(),
            ref_py,
            &Stroke::dashed(config.grid.color, 0.8),
        );
    }

    let err_style = Stroke::solid(config.colors.ratio, 1.0);
    for bi in 0..n_bins {
        let (value, err) = (plot.ratio[bi], plot.ratio_errors[bi]);
        if !value.is_finite() {
            continue;
        }
        let px_lo = x_ratio.data_to_pixel(plot.bin_edges[bi], ratio.left, ratio.right());
        let px_hi = x_ratio.data_to_pixel(plot.bin_edges[bi + 1], ratio.left, ratio.right());
        let px = 0.5 * (px_lo + px_hi);
        let py = y_ratio.data_to_pixel(value, ratio.bottom(), ratio.top);
        if err > 0.0 && err.is_finite() {
            let py_lo = y_ratio.data_to_pixel(value - err, ratio.bottom(), ratio.top);
            let py_hi = y_ratio.data_to_pixel(value + err, ratio.bottom(), ratio.top);
            canvas.error_bar(px, py_lo, py_hi, &err_style);
        }
        canvas.error_bar_h(px_lo, px_hi, py, &err_style);
        canvas.square_marker(px, py, config.ratio.marker_size, config.colors.ratio);
    }
    canvas.pop_clip();

    Ok(canvas.finish_svg())
}
