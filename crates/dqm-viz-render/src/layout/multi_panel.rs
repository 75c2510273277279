use crate::layout::margins::PlotArea;

/// Main + Ratio panel layout.
///
/// The ratio panel takes `ratio_frac` of the available height; `gap = 0`
/// joins the two pads so they share the x axis line.
#[derive(Debug, Clone)]
pub struct MainRatioLayout {
    pub main: PlotArea,
    pub ratio: PlotArea,
}

impl MainRatioLayout {
    pub fn new(
        left: f64,
        top: f64,
        width: f64,
        total_height: f64,
        gap: f64,
        ratio_frac: f64,
    ) -> Self {
        let ratio_h = total_height * ratio_frac;
        let main_h = total_height - ratio_h - gap;

        Self {
            main: PlotArea::manual(left, top, width, main_h),
            ratio: PlotArea::manual(left, top + main_h + gap, width, ratio_h),
        }
    }

    /// Split a content area.
    pub fn split(area: PlotArea, gap: f64, ratio_frac: f64) -> Self {
        Self::new(area.left, area.top, area.width, area.height, gap, ratio_frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventy_thirty_without_gap() {
        let l = MainRatioLayout::new(50.0, 20.0, 400.0, 500.0, 0.0, 0.3);
        assert!((l.main.height - 350.0).abs() < 1e-9);
        assert!((l.ratio.height - 150.0).abs() < 1e-9);
        assert_eq!(l.main.bottom(), l.ratio.top);
        assert_eq!(l.main.width, l.ratio.width);
    }
}
