//! 1D histogram returned by [`RootFile::get_histogram`](crate::RootFile::get_histogram).

/// A 1D histogram read from a ROOT file.
///
/// Under- and overflow bins are dropped at read time; every method below
/// works on the in-range bins only, as ROOT's `Integral()` and
/// `KolmogorovTest()` do by default.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// Number of in-range bins.
    pub n_bins: usize,
    /// Lower edge of the first bin.
    pub x_min: f64,
    /// Upper edge of the last bin.
    pub x_max: f64,
    /// Bin edges, `n_bins + 1` values.
    pub bin_edges: Vec<f64>,
    /// Bin contents, `n_bins` values.
    pub bin_content: Vec<f64>,
    /// Per-bin sum of squared weights, when the file stored one.
    pub sumw2: Option<Vec<f64>>,
    /// Entries recorded in the file (`fEntries`).
    pub entries: f64,
}

impl Histogram {
    /// Sum of the in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Per-bin variance: sumw2 when stored, otherwise the bin content
    /// (Poisson errors on unweighted fills).
    pub fn variances(&self) -> Vec<f64> {
        match &self.sumw2 {
            Some(sw2) if sw2.len() == self.n_bins => sw2.clone(),
            _ => self.bin_content.iter().map(|c| c.abs()).collect(),
        }
    }

    /// Multiply every bin by `factor`.
    ///
    /// Variances are materialized first and scaled by `factor²`, so errors
    /// follow the contents the same way `TH1::Scale` does.
    pub fn scale(&mut self, factor: f64) {
        let mut sw2 = self.variances();
        for v in &mut sw2 {
            *v *= factor * factor;
        }
        for c in &mut self.bin_content {
            *c *= factor;
        }
        self.sumw2 = Some(sw2);
    }

    /// Same bin count, range and edges (within `1e-9` relative).
    pub fn same_binning(&self, other: &Histogram) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0);
        self.n_bins == other.n_bins
            && close(self.x_min, other.x_min)
            && close(self.x_max, other.x_max)
            && self.bin_edges.len() == other.bin_edges.len()
            && self.bin_edges.iter().zip(&other.bin_edges).all(|(&a, &b)| close(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(content: Vec<f64>) -> Histogram {
        let n = content.len();
        Histogram {
            name: "h".into(),
            title: String::new(),
            n_bins: n,
            x_min: 0.0,
            x_max: n as f64,
            bin_edges: (0..=n).map(|i| i as f64).collect(),
            bin_content: content,
            sumw2: None,
            entries: 0.0,
        }
    }

    #[test]
    fn variances_default_to_contents() {
        let h = hist(vec![4.0, 9.0]);
        assert_eq!(h.variances(), vec![4.0, 9.0]);
    }

    #[test]
    fn scale_tracks_errors() {
        let mut h = hist(vec![4.0, 16.0]);
        h.scale(0.5);
        assert_eq!(h.bin_content, vec![2.0, 8.0]);
        assert_eq!(h.sumw2, Some(vec![1.0, 4.0]));
        assert_eq!(h.integral(), 10.0);
    }

    #[test]
    fn binning_comparison() {
        let a = hist(vec![1.0, 2.0, 3.0]);
        assert!(a.same_binning(&hist(vec![0.0, 0.0, 0.0])));
        assert!(!a.same_binning(&hist(vec![1.0, 2.0])));
        let mut shifted = hist(vec![1.0, 2.0, 3.0]);
        shifted.x_max = 4.0;
        assert!(!a.same_binning(&shifted));
    }
}
