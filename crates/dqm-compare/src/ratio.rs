//! Bin-by-bin ratio of two histograms with propagated errors.

use dqm_root::Histogram;

use crate::error::{CompareError, Result};

/// `current / reference` per bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Ratio {
    pub values: Vec<f64>,
    pub errors: Vec<f64>,
}

/// Fail unless both histograms share bin count and axis range.
pub fn check_binning(h1: &Histogram, h2: &Histogram) -> Result<()> {
    if h1.same_binning(h2) {
        return Ok(());
    }
    Err(CompareError::IncompatibleBinning(format!(
        "{} bins on [{}, {}] vs {} bins on [{}, {}]",
        h1.n_bins, h1.x_min, h1.x_max, h2.n_bins, h2.x_min, h2.x_max
    )))
}

/// Divide `h1` by `h2` bin by bin.
///
/// Bins where `h2` is zero get ratio 0 and error 0. Elsewhere the errors of
/// both inputs are treated as uncorrelated:
/// `σ² = (σ1²·c2² + σ2²·c1²) / c2⁴`.
pub fn ratio(h1: &Histogram, h2: &Histogram) -> Result<Ratio> {
    check_binning(h1, h2)?;
    let (v1, v2) = (h1.variances(), h2.variances());

    let (values, errors) = h1
        .bin_content
        .iter()
        .zip(&h2.bin_content)
        .zip(v1.iter().zip(&v2))
        .map(|((&c1, &c2), (&e1sq, &e2sq))| {
            if c2 == 0.0 {
                return (0.0, 0.0);
            }
            let c2sq = c2 * c2;
            let err2 = (e1sq * c2sq + e2sq * c1 * c1) / (c2sq * c2sq);
            (c1 / c2, err2.sqrt())
        })
        .unzip();

    Ok(Ratio { values, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hist(content: Vec<f64>, sumw2: Option<Vec<f64>>) -> Histogram {
        let n = content.len();
        Histogram {
            name: "h".into(),
            title: String::new(),
            n_bins: n,
            x_min: 0.0,
            x_max: n as f64,
            bin_edges: (0..=n).map(|i| i as f64).collect(),
            bin_content: content,
            sumw2,
            entries: 0.0,
        }
    }

    #[test]
    fn divides_and_propagates() {
        let h1 = hist(vec![4.0, 9.0], Some(vec![4.0, 9.0]));
        let h2 = hist(vec![2.0, 3.0], Some(vec![1.0, 1.0]));
        let r = ratio(&h1, &h2).unwrap();
        assert_eq!(r.values, vec![2.0, 3.0]);
        // (4·4 + 1·16) / 16 = 2
        assert_relative_eq!(r.errors[0], 2.0f64.sqrt(), epsilon = 1e-12);
        // (9·9 + 1·81) / 81 = 2
        assert_relative_eq!(r.errors[1], 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn zero_denominator_gives_zero() {
        let h1 = hist(vec![1.0, 1.0], None);
        let h2 = hist(vec![0.0, 1.0], None);
        let r = ratio(&h1, &h2).unwrap();
        assert_eq!(r.values[0], 0.0);
        assert_eq!(r.errors[0], 0.0);
        assert_eq!(r.values[1], 1.0);
    }

    #[test]
    fn identical_inputs_give_unit_ratio() {
        let h = hist(vec![0.2, 0.5, 0.3], Some(vec![0.01, 0.02, 0.01]));
        let r = ratio(&h, &h).unwrap();
        assert!(r.values.iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn binning_mismatch() {
        let err = ratio(&hist(vec![1.0; 3], None), &hist(vec![1.0; 4], None)).unwrap_err();
        assert!(matches!(err, CompareError::IncompatibleBinning(_)));
        let mut shifted = hist(vec![1.0; 3], None);
        shifted.x_min = -1.0;
        assert!(ratio(&hist(vec![1.0; 3], None), &shifted).is_err());
    }
}
