/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Auto-scale linear axis with "nice number" ticks; limits are widened
    /// to the enclosing tick values.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);
        Self::with_step(nice_min, nice_max, step, 5)
    }

    /// Linear axis pinned to `[min, max]` with "nice number" ticks inside it.
    pub fn exact(min: f64, max: f64, target_ticks: usize) -> Self {
        if !(max > min) {
            return Self::auto_linear(min, max, target_ticks);
        }
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);
        Self::with_step(min, max, step, 5)
    }

    /// Linear axis pinned to `[min, max]` with ROOT-style divisions.
    ///
    /// `ndiv = primary + 100 * secondary`, so `505` means at most five
    /// primary intervals, each split into five secondary ones.
    pub fn with_divisions(min: f64, max: f64, ndiv: u32) -> Self {
        let primary = (ndiv % 100).max(1);
        let secondary = ((ndiv / 100) % 100).max(1);
        if !(max > min) {
            return Self::fixed(min, max);
        }
        let step = nice_step_up((max - min) / f64::from(primary));
        Self::with_step(min, max, step, secondary as usize)
    }

    /// Fixed axis with explicit limits (no tick auto-generation).
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Drop tick labels but keep the ticks (shared-x upper pads).
    pub fn without_tick_labels(mut self) -> Self {
        self.tick_labels.clear();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }

    fn with_step(min: f64, max: f64, step: f64, minor_div: usize) -> Self {
        let eps = step * 1e-6;
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let first = (min / step - 1e-9).ceil() as i64;
        let last = (max / step + 1e-9).floor() as i64;
        for k in first..=last {
            let v = k as f64 * step;
            ticks.push(v);
            labels.push(format_tick(v, step));
        }

        let minor_step = step / minor_div.max(1) as f64;
        let mut minor = Vec::new();
        if minor_div > 1 {
            let first = (min / minor_step - 1e-9).ceil() as i64;
            let last = (max / minor_step + 1e-9).floor() as i64;
            for k in first..=last {
                let mv = k as f64 * minor_step;
                if !ticks.iter().any(|t| (t - mv).abs() < eps.max(minor_step * 0.01)) {
                    minor.push(mv);
                }
            }
        }

        Self {
            min,
            max,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

/// Closest of 1, 2, 5 × 10^k.
fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

/// Smallest of 1, 2, 2.5, 5 × 10^k not below `rough`, so the number of
/// intervals never exceeds the requested count.
fn nice_step_up(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let base = 10.0_f64.powf(exp);
    let frac = rough / base;
    let nice_frac = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|&f| f >= frac * (1.0 - 1e-9))
        .unwrap_or(10.0);
    nice_frac * base
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{v:.decimals$}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn auto_linear_basic() {
        let ax = Axis::auto_linear(0.0, 10.0, 6);
        assert!(!ax.tick_positions.is_empty());
        assert!(ax.min <= 0.0);
        assert!(ax.max >= 10.0);
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 5);
        let px = ax.data_to_pixel(50.0, 0.0, 500.0);
        assert!((px - 250.0).abs() < 1.0);
    }

    #[test]
    fn exact_keeps_limits() {
        let ax = Axis::exact(0.5, 12.5, 6);
        assert_eq!((ax.min, ax.max), (0.5, 12.5));
        assert!(ax.tick_positions.iter().all(|&t| (0.5..=12.5).contains(&t)));
    }

    #[test]
    fn ratio_divisions_505() {
        let ax = Axis::with_divisions(0.0, 2.1, 505);
        assert_eq!(ax.tick_labels, vec!["0", "0.5", "1", "1.5", "2"]);
        assert_eq!((ax.min, ax.max), (0.0, 2.1));
        // Four secondary ticks per primary interval, plus 2.1 itself.
        assert_eq!(ax.minor_ticks.len(), 4 * 4 + 1);
        assert_relative_eq!(ax.minor_ticks[0], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step_up(0.42) - 0.5).abs() < 1e-9);
        assert!((nice_step_up(0.2) - 0.2).abs() < 1e-9);
        assert!((nice_step_up(2.2) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn tick_labels_have_no_negative_zero() {
        assert_eq!(format_tick(-1e-17, 0.5), "0");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }
}
