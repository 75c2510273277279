use std::fmt::{self, Write as FmtWrite};

use crate::color::Color;
use crate::primitives::{Stroke, TextStyle};
use crate::text::{TextMetrics, measure_text};

/// Font stack written on every text element; resolved by the rasterizer
/// against the host's installed fonts.
pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif";

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        style: Stroke,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        style: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        style: TextStyle,
        rotate: Option<f64>,
    },
    Group {
        clip_id: String,
        children: Vec<SvgElement>,
    },
}

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
///
/// Elements drawn between [`push_clip`](Self::push_clip) and
/// [`pop_clip`](Self::pop_clip) are clipped to that rectangle.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
    defs: Vec<String>,
    clip_stack: Vec<(String, Vec<SvgElement>)>,
    next_clip_id: usize,
    font_family: String,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(crate::RenderError::Layout(format!("invalid canvas size {width}x{height}")));
        }
        Ok(Self {
            width,
            height,
            elements: Vec::new(),
            defs: Vec::new(),
            clip_stack: Vec::new(),
            next_clip_id: 0,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        })
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    // --- Drawing primitives ---

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Color) {
        self.push(SvgElement::Rect { x, y, w, h, fill });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &Stroke) {
        self.push(SvgElement::Line { x1, y1, x2, y2, style: style.clone() });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &Stroke) {
        if points.len() < 2 {
            return;
        }
        self.push(SvgElement::Polyline { points: points.to_vec(), style: style.clone() });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: None,
        });
    }

    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: Some(angle),
        });
    }

    /// Histogram outline: horizontal segment across each bin joined by
    /// vertical risers, closed down to `y_base` at both ends.
    ///
    /// `edges` holds `values.len() + 1` pixel x positions; `values` are pixel y.
    pub fn step_outline(&mut self, edges: &[f64], values: &[f64], y_base: f64, style: &Stroke) {
        if values.is_empty() || edges.len() != values.len() + 1 {
            return;
        }
        let mut points = Vec::with_capacity(2 * values.len() + 2);
        points.push((edges[0], y_base));
        for (i, &y) in values.iter().enumerate() {
            points.push((edges[i], y));
            points.push((edges[i + 1], y));
        }
        points.push((edges[values.len()], y_base));
        self.polyline(&points, style);
    }

    /// Vertical error bar without caps.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, style: &Stroke) {
        self.line(x, y_lo, x, y_hi, style);
    }

    /// Horizontal error bar (bin width).
    pub fn error_bar_h(&mut self, x_lo: f64, x_hi: f64, y: f64, style: &Stroke) {
        self.line(x_lo, y, x_hi, y, style);
    }

    /// Filled square centred on `(x, y)` with half-side `half`, as ROOT
    /// marker style 21.
    pub fn square_marker(&mut self, x: f64, y: f64, half: f64, color: Color) {
        self.rect(x - half, y - half, 2.0 * half, 2.0 * half, color);
    }

    // --- Clip paths ---

    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.clip_stack.push((id.clone(), Vec::new()));
        id
    }

    pub fn pop_clip(&mut self) {
        if let Some((clip_id, children)) = self.clip_stack.pop() {
            if !children.is_empty() {
                self.push(SvgElement::Group { clip_id, children });
            }
        }
    }

    // --- Text measurement ---

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_text(content, style)
    }

    // --- SVG output ---

    fn push(&mut self, elem: SvgElement) {
        match self.clip_stack.last_mut() {
            Some((_, children)) => children.push(elem),
            None => self.elements.push(elem),
        }
    }

    /// Close any open clip groups and serialize the document.
    pub fn finish_svg(mut self) -> String {
        while !self.clip_stack.is_empty() {
            self.pop_clip();
        }
        let mut out = String::with_capacity(32 * 1024);
        // Formatting into a String cannot fail.
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        )?;

        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.defs {
                out.push_str(d);
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }

        writeln!(out, r#"<rect width="{}" height="{}" fill="white" />"#, self.width, self.height)?;

        for elem in &self.elements {
            render_element(out, elem, &self.font_family)?;
        }

        out.push_str("</svg>\n");
        Ok(())
    }
}

fn render_element(out: &mut String, elem: &SvgElement, font_family: &str) -> fmt::Result {
    match elem {
        SvgElement::Rect { x, y, w, h, fill } => {
            writeln!(
                out,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{}" />"#,
                fill.to_svg_fill()
            )?;
        }
        SvgElement::Line { x1, y1, x2, y2, style } => {
            write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
            write_line_attrs(out, style)?;
            out.push_str(" />\n");
        }
        SvgElement::Polyline { points, style } => {
            out.push_str(r#"<polyline points=""#);
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write!(out, "{x:.2},{y:.2}")?;
            }
            out.push_str(r#"" fill="none""#);
            write_line_attrs(out, style)?;
            out.push_str(r#" stroke-linejoin="miter" />"#);
            out.push('\n');
        }
        SvgElement::Text { x, y, content, style, rotate } => {
            write!(out, r#"<text x="{x:.2}" y="{y:.2}""#)?;
            write!(out, r#" font-family="{font_family}" font-size="{:.1}""#, style.size)?;
            write!(out, r#" fill="{}""#, style.color.to_svg_fill())?;
            write!(out, r#" text-anchor="{}""#, style.align.svg_value())?;
            write!(out, r#" dominant-baseline="{}""#, style.valign.svg_value())?;
            if style.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if let Some(angle) = rotate {
                write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#)?;
            }
            out.push('>');
            escape_xml(out, content);
            out.push_str("</text>\n");
        }
        SvgElement::Group { clip_id, children } => {
            writeln!(out, r#"<g clip-path="url(#{clip_id})">"#)?;
            for child in children {
                render_element(out, child, font_family)?;
            }
            out.push_str("</g>\n");
        }
    }
    Ok(())
}

fn escape_xml(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_line_attrs(out: &mut String, style: &Stroke) -> fmt::Result {
    write!(out, r#" stroke="{}""#, style.color.to_svg_fill())?;
    write!(out, r#" stroke-width="{:.2}""#, style.width)?;
    if let Some(dash) = style.dash {
        write!(out, r#" stroke-dasharray="{dash}""#)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_canvas() {
        let svg = Canvas::new(100.0, 50.0).unwrap().finish_svg();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn rejects_degenerate_size() {
        assert!(Canvas::new(0.0, 10.0).is_err());
        assert!(Canvas::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn square_marker_is_centred() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        c.square_marker(40.0, 30.0, 5.0, Color::hex("#ff0000"));
        let svg = c.finish_svg();
        assert!(svg.contains(
            r##"<rect x="35.00" y="25.00" width="10.00" height="10.00" fill="#ff0000" />"##
        ));
    }

    #[test]
    fn dashed_lines_carry_dasharray() {
        let mut c = Canvas::new(100.0, 100.0).unwrap();
        c.line(0.0, 50.0, 100.0, 50.0, &Stroke::dashed(Color::BLACK, 0.8));
        c.line(0.0, 60.0, 100.0, 60.0, &Stroke::solid(Color::BLACK, 0.8));
        let svg = c.finish_svg();
        assert_eq!(svg.matches(r#"stroke-dasharray="6 3""#).count(), 1);
    }

    #[test]
    fn text_is_escaped() {
        let mut c = Canvas::new(200.0, 100.0).unwrap();
        c.text(10.0, 20.0, "Run: <339500> & ref", &TextStyle::default());
        let svg = c.finish_svg();
        assert!(svg.contains("Run: &lt;339500&gt; &amp; ref"));
        assert!(svg.contains(DEFAULT_FONT_FAMILY));
    }

    #[test]
    fn step_outline_points() {
        let mut c = Canvas::new(100.0, 100.0).unwrap();
        c.step_outline(&[0.0, 10.0, 20.0], &[50.0, 30.0], 90.0, &Stroke::solid(Color::BLACK, 1.0));
        let svg = c.finish_svg();
        assert!(svg.contains(
            r#"points="0.00,90.00 0.00,50.00 10.00,50.00 10.00,30.00 20.00,30.00 20.00,90.00""#
        ));
    }

    #[test]
    fn clipped_elements_are_grouped() {
        let mut c = Canvas::new(100.0, 100.0).unwrap();
        let id = c.push_clip(0.0, 0.0, 50.0, 50.0);
        c.line(0.0, 0.0, 80.0, 80.0, &Stroke::solid(Color::BLACK, 1.0));
        c.pop_clip();
        c.line(0.0, 0.0, 1.0, 1.0, &Stroke::solid(Color::BLACK, 1.0));
        let svg = c.finish_svg();
        assert!(svg.contains(&format!(r#"<clipPath id="{id}">"#)));
        assert!(svg.contains(&format!(r#"<g clip-path="url(#{id})">"#)));
        assert_eq!(svg.matches("<line").count(), 2);
    }
}
