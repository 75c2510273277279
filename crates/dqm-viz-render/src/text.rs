use crate::primitives::TextStyle;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Average advance per character as a fraction of the font size, for a
/// Helvetica-like sans face.
const REGULAR_ADVANCE: f64 = 0.55;
const BOLD_ADVANCE: f64 = 0.60;
const ASCENT: f64 = 0.76;
const DESCENT: f64 = 0.24;

/// Approximate text extent in points.
///
/// Figures are rasterized with whatever sans-serif face the host provides,
/// so layout only needs a width estimate good enough to place margins and
/// legend boxes.
pub fn measure_text(text: &str, style: &TextStyle) -> TextMetrics {
    let advance = if style.bold { BOLD_ADVANCE } else { REGULAR_ADVANCE };
    let width: f64 = text.chars().map(|c| char_weight(c) * advance * style.size).sum();
    TextMetrics {
        width,
        height: (ASCENT + DESCENT) * style.size,
        ascent: ASCENT * style.size,
    }
}

/// Relative width of a glyph against the average.
fn char_weight(c: char) -> f64 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.45,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '-' => 0.65,
        'm' | 'w' | 'M' | 'W' => 1.5,
        c if c.is_ascii_uppercase() => 1.2,
        _ => 1.0,
    }
}
