use crate::canvas::DEFAULT_FONT_FAMILY;
use crate::color::Color;

/// Figure settings; callers start from `default()` and override fields.
#[derive(Debug, Clone, Default)]
pub struct VizConfig {
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub colors: ColorsConfig,
    pub ratio: RatioConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        // 800 x 800 px at 100 dpi.
        Self { width: 576.0, height: 576.0 }
    }
}

#[derive(Debug, Clone)]
pub struct FontConfig {
    pub family: String,
    pub size: f64,
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.into(),
            size: 12.0,
            title_size: 14.0,
            label_size: 13.0,
            tick_size: 11.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 8.0,
            minor_tick_length: 4.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#9CA3AF"), alpha: 0.7 }
    }
}

#[derive(Debug, Clone)]
pub struct ColorsConfig {
    pub current: Color,
    pub reference: Color,
    pub ratio: Color,
    /// Outline width of the two overlaid histograms.
    pub line_width: f64,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self { current: Color::RED, reference: Color::BLUE, ratio: Color::BLACK, line_width: 3.0 }
    }
}

#[derive(Debug, Clone)]
pub struct RatioConfig {
    /// Fixed y range of the ratio pad.
    pub y_range: [f64; 2],
    /// Share of the figure height taken by the ratio pad.
    pub frac: f64,
    /// ROOT-style division code: primary + 100 * secondary.
    pub ndivisions: u32,
    pub marker_size: f64,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self { y_range: [0.0, 2.1], frac: 0.3, ndivisions: 505, marker_size: 2.5 }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 100 }
    }
}

impl VizConfig {
    /// Check values the layout cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        let err = |m: String| Err(crate::RenderError::Config(m));
        if !(self.figure.width > 0.0 && self.figure.height > 0.0) {
            return err(format!("figure size must be positive, got {}x{}", self.figure.width, self.figure.height));
        }
        if !(self.ratio.frac > 0.0 && self.ratio.frac < 1.0) {
            return err(format!("ratio.frac must lie in (0, 1), got {}", self.ratio.frac));
        }
        if self.ratio.y_range[0] >= self.ratio.y_range[1] {
            return err(format!("ratio.y_range must be increasing, got {:?}", self.ratio.y_range));
        }
        if self.output.dpi == 0 {
            return err("output.dpi must be positive".into());
        }
        Ok(())
    }
}
