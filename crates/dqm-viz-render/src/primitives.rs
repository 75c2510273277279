//! Stroke and text attributes handed to [`Canvas`](crate::canvas::Canvas).

use crate::color::Color;

/// Dash pattern of the reference line in the ratio pad.
const DASHED: &str = "6 3";

/// How lines, step outlines and error bars are stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// `stroke-dasharray` value; `None` draws a continuous line.
    pub dash: Option<&'static str>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self::solid(color, width).with_dash(DASHED)
    }

    pub fn with_dash(mut self, pattern: &'static str) -> Self {
        self.dash = Some(pattern);
        self
    }
}

/// Font size, colour and placement of a text run relative to its anchor point.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub align: HAlign,
    pub valign: VAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { size: 10.0, color: Color::BLACK, bold: false, align: HAlign::Start, valign: VAlign::Baseline }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Start,
    Middle,
    End,
}

impl HAlign {
    /// SVG `text-anchor`.
    pub fn svg_value(self) -> &'static str {
        match self {
            HAlign::Start => "start",
            HAlign::Middle => "middle",
            HAlign::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    /// Anchor sits on the text baseline.
    Baseline,
    Center,
    /// Anchor sits on the top of the glyphs.
    Top,
}

impl VAlign {
    /// SVG `dominant-baseline`.
    pub fn svg_value(self) -> &'static str {
        match self {
            VAlign::Baseline => "auto",
            VAlign::Center => "central",
            VAlign::Top => "hanging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_stroke_keeps_color_and_width() {
        let s = Stroke::dashed(Color::RED, 0.8);
        assert_eq!(s, Stroke { color: Color::RED, width: 0.8, dash: Some("6 3") });
        assert_eq!(Stroke::solid(Color::RED, 0.8).dash, None);
    }
}
