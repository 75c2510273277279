/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Space reserved around the pads, in points.
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Manual placement (for multi-panel layouts).
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// What is left of a `width` x `height` canvas after `margins`.
    pub fn inset(width: f64, height: f64, margins: Margins) -> crate::Result<Self> {
        let w = width - margins.left - margins.right;
        let h = height - margins.top - margins.bottom;
        if w <= 0.0 || h <= 0.0 {
            return Err(crate::RenderError::Layout(format!(
                "margins leave no room on a {width}x{height} canvas"
            )));
        }
        Ok(Self::manual(margins.left, margins.top, w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_subtracts_margins() {
        let m = Margins { left: 60.0, right: 20.0, top: 30.0, bottom: 40.0 };
        let a = PlotArea::inset(400.0, 300.0, m).unwrap();
        assert_eq!(a, PlotArea::manual(60.0, 30.0, 320.0, 230.0));
        assert_eq!(a.right(), 380.0);
        assert_eq!(a.bottom(), 260.0);
    }

    #[test]
    fn inset_too_small() {
        let m = Margins { left: 60.0, right: 60.0, top: 10.0, bottom: 10.0 };
        assert!(PlotArea::inset(100.0, 100.0, m).is_err());
    }
}
