use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::{HAlign, Stroke, TextStyle, VAlign};

/// Horizontal distance from the frame to the rotated y-axis title.
pub const Y_LABEL_OFFSET: f64 = 44.0;

/// Draw a box frame with ticks, grid, tick labels and axis titles.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    let frame_color = Color::BLACK;
    let tick_line = Stroke::solid(frame_color, 0.8);
    let minor_tick_line = Stroke::solid(frame_color, 0.6);
    let grid_line = Stroke::solid(config.grid.color.with_alpha(config.grid.alpha), 0.5).with_dash("2 2");

    // Ticks point into the frame when `in`, out of it otherwise.
    let dir = if config.axes.tick_direction == "in" { 1.0 } else { -1.0 };
    let tl = config.axes.tick_length * dir;
    let mtl = config.axes.minor_tick_length * dir;
    let out_pad = if dir > 0.0 { 0.0 } else { config.axes.tick_length };

    draw_frame(canvas, area);

    // --- X axis ---
    let x_label_style = TextStyle {
        size: config.font.tick_size,
        align: HAlign::Middle,
        valign: VAlign::Top,
        ..Default::default()
    };
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_line);
        }
        canvas.line(px, area.bottom(), px, area.bottom() - tl, &tick_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top + tl, &tick_line);
        }
        if let Some(label) = x_axis.tick_labels.get(i) {
            canvas.text(px, area.bottom() + out_pad + 4.0, label, &x_label_style);
        }
    }
    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() - mtl, &minor_tick_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top + mtl, &minor_tick_line);
        }
    }

    // --- Y axis ---
    let y_label_style = TextStyle {
        size: config.font.tick_size,
        align: HAlign::End,
        valign: VAlign::Center,
        ..Default::default()
    };
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_line);
        }
        canvas.line(area.left, py, area.left + tl, py, &tick_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - tl, py, &tick_line);
        }
        if let Some(label) = y_axis.tick_labels.get(i) {
            canvas.text(area.left - out_pad - 4.0, py, label, &y_label_style);
        }
    }
    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left + mtl, py, &minor_tick_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() - mtl, py, &minor_tick_line);
        }
    }

    // --- Axis titles ---
    let title_style = TextStyle {
        size: config.font.label_size,
        align: HAlign::Middle,
        ..Default::default()
    };
    if !x_axis.label.is_empty() {
        let y = area.bottom() + out_pad + config.font.tick_size + 20.0;
        canvas.text(area.left + area.width / 2.0, y, &x_axis.label, &title_style);
    }
    if !y_axis.label.is_empty() {
        let x = area.left - Y_LABEL_OFFSET;
        canvas.text_rotated(x, area.top + area.height / 2.0, &y_axis.label, &title_style, -90.0);
    }
}

/// Frame only, no ticks.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea) {
    let style = Stroke::solid(Color::BLACK, 1.0);
    canvas.line(area.left, area.top, area.right(), area.top, &style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &style);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(config: &VizConfig) -> String {
        let mut c = Canvas::new(300.0, 200.0).unwrap();
        let area = PlotArea::manual(50.0, 10.0, 240.0, 150.0);
        let x = Axis::exact(0.0, 10.0, 6).with_label("x");
        let y = Axis::with_divisions(0.0, 2.1, 505).with_label("Ratio");
        draw_axes(&mut c, &area, &x, &y, config);
        c.finish_svg()
    }

    #[test]
    fn labels_and_titles_present() {
        let svg = render(&VizConfig::default());
        assert!(svg.contains(">1.5</text>"));
        assert!(svg.contains(">Ratio</text>"));
        assert!(svg.contains("rotate(-90.0"));
    }

    #[test]
    fn grid_toggle() {
        let mut config = VizConfig::default();
        let with_grid = render(&config);
        config.grid.show = false;
        let without = render(&config);
        assert!(with_grid.contains("stroke-dasharray"));
        assert!(!without.contains("stroke-dasharray"));
    }
}
