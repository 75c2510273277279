//! Kolmogorov–Smirnov compatibility of two binned distributions.
//!
//! Follows `TH1::KolmogorovTest` with no options: in-range bins only,
//! effective entries `sum² / Σσ²` taken from the stored errors, and the
//! asymptotic Kolmogorov distribution for the probability.

use dqm_root::Histogram;

use crate::error::Result;
use crate::ratio::check_binning;

/// KS probability in `[0, 1]` that `h1` and `h2` share a parent distribution.
///
/// Inputs need not be normalized; the statistic uses cumulative fractions
/// and the effective entry counts are scale invariant. As in ROOT, an empty
/// histogram or zero errors on both sides scores 0.
pub fn kolmogorov_test(h1: &Histogram, h2: &Histogram) -> Result<f64> {
    check_binning(h1, h2)?;

    let sum1 = h1.integral();
    let sum2 = h2.integral();
    if sum1 == 0.0 || sum2 == 0.0 {
        tracing::warn!(
            current = %h1.name,
            current_integral = sum1,
            reference_integral = sum2,
            "empty histogram, KS probability set to 0"
        );
        return Ok(0.0);
    }

    let w1: f64 = h1.variances().iter().sum();
    let w2: f64 = h2.variances().iter().sum();
    let esum1 = (w1 > 0.0).then(|| sum1 * sum1 / w1);
    let esum2 = (w2 > 0.0).then(|| sum2 * sum2 / w2);

    let mut cum1 = 0.0;
    let mut cum2 = 0.0;
    let mut dfmax: f64 = 0.0;
    for (c1, c2) in h1.bin_content.iter().zip(&h2.bin_content) {
        cum1 += c1 / sum1;
        cum2 += c2 / sum2;
        dfmax = dfmax.max((cum1 - cum2).abs());
    }

    // A side with zero errors is treated as an exact function.
    let z = match (esum1, esum2) {
        (Some(e1), Some(e2)) => dfmax * (e1 * e2 / (e1 + e2)).sqrt(),
        (None, Some(e2)) => dfmax * e2.sqrt(),
        (Some(e1), None) => dfmax * e1.sqrt(),
        (None, None) => {
            tracing::warn!(current = %h1.name, "zero errors in both histograms, KS probability set to 0");
            return Ok(0.0);
        }
    };

    let prob = kolmogorov_prob(z);
    tracing::trace!(dfmax, z, prob, "kolmogorov test");
    Ok(prob)
}

/// Asymptotic Kolmogorov distribution `P(K > z)`.
///
/// Same piecewise evaluation as `TMath::KolmogorovProb`: 1 below 0.2, the
/// small-`z` series up to 0.755, the alternating tail sum up to 6.8116, and 0
/// beyond.
pub fn kolmogorov_prob(z: f64) -> f64 {
    const FJ: [f64; 4] = [-2.0, -8.0, -18.0, -32.0];
    const W: f64 = 2.506_628_27;
    const C1: f64 = -1.233_700_550_136_169_8;
    const C2: f64 = -11.103_304_951_225_528;
    const C3: f64 = -30.842_513_753_404_244;

    let u = z.abs();
    if u < 0.2 {
        1.0
    } else if u < 0.755 {
        let v = 1.0 / (u * u);
        1.0 - W * ((C1 * v).exp() + (C2 * v).exp() + (C3 * v).exp()) / u
    } else if u < 6.8116 {
        let v = u * u;
        let maxj = ((3.0 / u).round() as usize).clamp(1, FJ.len());
        let mut r = [0.0; 4];
        for (j, slot) in r.iter_mut().enumerate().take(maxj) {
            *slot = (FJ[j] * v).exp();
        }
        2.0 * (r[0] - r[1] + r[2] - r[3])
    } else {
        0.0
    }
}
