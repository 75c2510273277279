use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// ROOT `kRed`.
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// ROOT `kBlue`.
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Like [`parse_hex`](Self::parse_hex), black when malformed.
    pub fn hex(s: &str) -> Self {
        Self::parse_hex(s).unwrap_or(Self::BLACK)
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            self.to_hex()
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}, expected #RRGGBB")))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#1D4ED8");
        assert_eq!((c.r, c.g, c.b), (0x1D, 0x4E, 0xD8));
        assert!((c.a - 1.0).abs() < 1e-9);
        assert_eq!(Color::hex("ff0000"), Color::RED);
    }

    #[test]
    fn malformed_hex() {
        assert_eq!(Color::parse_hex("#12"), None);
        assert_eq!(Color::parse_hex("#zzzzzz"), None);
        assert_eq!(Color::hex("nope"), Color::BLACK);
    }

    #[test]
    fn svg_fill_opaque_and_alpha() {
        assert_eq!(Color::rgb(29, 78, 216).to_svg_fill(), "#1d4ed8");
        assert_eq!(Color::rgb(29, 78, 216).with_alpha(0.5).to_svg_fill(), "rgba(29,78,216,0.500)");
    }
}
