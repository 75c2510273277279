use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::{Stroke, TextStyle, VAlign};

/// One legend row: a line swatch followed by its label.
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub line_width: f64,
}

/// Draw a legend in the top-right corner of the plot area.
///
/// The box is neither filled nor outlined, so grid lines stay visible
/// behind the labels.
pub fn draw_legend(canvas: &mut Canvas, area: &PlotArea, entries: &[LegendEntry], font_size: f64) {
    if entries.is_empty() {
        return;
    }

    let row_height = font_size + 6.0;
    let swatch_w = 24.0;
    let gap = 6.0;
    let padding = 6.0;

    let text_style = TextStyle { size: font_size, valign: VAlign::Center, ..Default::default() };

    let max_w = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &text_style).width)
        .fold(0.0_f64, f64::max);
    let legend_w = padding + swatch_w + gap + max_w + padding;

    let lx = area.right() - legend_w - 8.0;
    let ly = area.top + 8.0;

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + padding + i as f64 * row_height + row_height / 2.0;
        let sx = lx + padding;
        canvas.line(sx, ey, sx + swatch_w, ey, &Stroke::solid(entry.color, entry.line_width));
        canvas.text(sx + swatch_w + gap, ey, &entry.label, &text_style);
    }
}
