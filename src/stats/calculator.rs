//! Statistics Calculator Module
//! Quantile cutoffs, log transforms and the distribution summaries behind the
//! violin plot.

use crate::error::{Error, Result};
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Number of evaluation points of a kernel density curve.
pub const KDE_GRID_SIZE: usize = 100;

/// How many bandwidths the density curve extends past the data extremes.
pub const KDE_CUT: f64 = 2.0;

/// Whisker reach in multiples of the inter-quartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Box and whisker summary drawn inside a violin.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
}

impl ViolinSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = StatsCalculator::sorted(values);
        let n = sorted.len();

        let q1 = StatsCalculator::percentile(&sorted, 25.0);
        let median = StatsCalculator::percentile(&sorted, 50.0);
        let q3 = StatsCalculator::percentile(&sorted, 75.0);
        let reach = WHISKER_IQR * (q3 - q1);

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - reach)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + reach)
            .unwrap_or(q3);

        Some(Self {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
        })
    }
}

/// Gaussian kernel density estimate evaluated on a regular grid.
#[derive(Debug, Clone)]
pub struct KernelDensity {
    pub bandwidth: f64,
    /// Evaluation points, ascending.
    pub support: Vec<f64>,
    /// Density at each support point.
    pub density: Vec<f64>,
}

impl KernelDensity {
    /// Estimate with Scott's rule bandwidth, `n^(-1/5)` times the sample
    /// standard deviation.
    ///
    /// Returns `None` when fewer than two values are given or they have no
    /// spread, since no bandwidth can be derived.
    pub fn scott(values: &[f64]) -> Result<Option<Self>> {
        let n = values.len();
        if n < 2 {
            return Ok(None);
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            return Ok(None);
        }

        let std = values.iter().std_dev();
        let bandwidth = (n as f64).powf(-0.2) * std;
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Ok(None);
        }

        let kernel = Normal::new(0.0, 1.0).map_err(|e| Error::InvalidArgument {
            arg: "kernel",
            value: e.to_string(),
        })?;

        let lo = min - KDE_CUT * bandwidth;
        let hi = max + KDE_CUT * bandwidth;
        let step = (hi - lo) / (KDE_GRID_SIZE - 1) as f64;
        let support: Vec<f64> = (0..KDE_GRID_SIZE).map(|i| lo + i as f64 * step).collect();

        let norm = 1.0 / (n as f64 * bandwidth);
        let density = support
            .par_iter()
            .map(|&x| {
                values
                    .iter()
                    .map(|&v| kernel.pdf((x - v) / bandwidth))
                    .sum::<f64>()
                    * norm
            })
            .collect();

        Ok(Some(Self {
            bandwidth,
            support,
            density,
        }))
    }

    pub fn peak(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Copy and sort values ascending; NaN sorts last.
    pub fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        Self::sorted_quantile(sorted_values, p / 100.0)
    }

    /// Quantile `q` in `[0, 1]` of unsorted values.
    pub fn quantile(values: &[f64], q: f64) -> f64 {
        Self::sorted_quantile(&Self::sorted(values), q)
    }

    fn sorted_quantile(sorted_values: &[f64], q: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = q * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Score cutoff that lets at most a `percent` fraction of the null
    /// distribution through.
    pub fn efpr_cutoff(scores: &[f64], percent: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&percent) {
            return Err(Error::InvalidArgument {
                arg: "percent",
                value: percent.to_string(),
            });
        }
        if scores.is_empty() {
            return Err(Error::EmptyDistribution);
        }
        Ok(Self::quantile(scores, 1.0 - percent))
    }

    /// Number of scores strictly above the cutoff.
    pub fn count_above(scores: &[f64], cutoff: f64) -> usize {
        scores.iter().filter(|&&s| s > cutoff).count()
    }

    /// Round half away from zero to `digits` decimals.
    pub fn round_to(x: f64, digits: i32) -> f64 {
        let factor = 10f64.powi(digits);
        (x * factor).round() / factor
    }

    pub fn neg_log10(p: f64) -> f64 {
        -p.log10()
    }

    /// Shortest text that reads back as `x`, always with a decimal point or
    /// an exponent: `1.0`, `0.39`, `0.0001`, `1e-05`, `1.5e+16`, `nan`.
    pub fn format_number(x: f64) -> String {
        if x.is_nan() {
            return "nan".to_string();
        }
        if x.is_infinite() {
            return if x > 0.0 { "inf" } else { "-inf" }.to_string();
        }

        let magnitude = x.abs();
        if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
            let sci = format!("{x:e}");
            return match sci.split_once('e') {
                Some((mantissa, exp)) => {
                    let (sign, digits) = match exp.strip_prefix('-') {
                        Some(digits) => ('-', digits),
                        None => ('+', exp),
                    };
                    format!("{mantissa}e{sign}{digits:0>2}")
                }
                None => sci,
            };
        }

        let plain = format!("{x}");
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn percentile_interpolates_like_numpy() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_relative_eq!(StatsCalculator::percentile(&sorted, 90.0), 3.7, epsilon = 1e-12);
        assert_relative_eq!(StatsCalculator::percentile(&sorted, 0.0), 1.0);
        assert_relative_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn cutoff_is_upper_quantile() {
        let scores: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let cutoff = StatsCalculator::efpr_cutoff(&scores, 0.1).unwrap();
        assert_relative_eq!(cutoff, 18.1, epsilon = 1e-9);
        assert_eq!(StatsCalculator::count_above(&scores, cutoff), 2);
    }

    #[test]
    fn cutoff_ignores_input_order() {
        let scores = [0.3, -0.1, 0.9, 0.2, 0.5];
        let cutoff = StatsCalculator::efpr_cutoff(&scores, 0.25).unwrap();
        assert_relative_eq!(cutoff, 0.5);
    }

    #[test]
    fn zero_percent_cutoff_is_maximum() {
        let scores = [0.3, 0.7, 0.1];
        let cutoff = StatsCalculator::efpr_cutoff(&scores, 0.0).unwrap();
        assert_relative_eq!(cutoff, 0.7);
        assert_eq!(StatsCalculator::count_above(&scores, cutoff), 0);
    }

    #[test]
    fn cutoff_rejects_bad_input() {
        assert!(matches!(
            StatsCalculator::efpr_cutoff(&[0.1], 1.5),
            Err(Error::InvalidArgument { arg: "percent", .. })
        ));
        assert!(matches!(
            StatsCalculator::efpr_cutoff(&[], 0.01),
            Err(Error::EmptyDistribution)
        ));
    }

    #[test]
    fn rounding_and_log_transform() {
        assert_relative_eq!(StatsCalculator::round_to(0.456, 2), 0.46);
        assert_relative_eq!(StatsCalculator::round_to(-0.454, 2), -0.45);
        assert_relative_eq!(StatsCalculator::neg_log10(0.001), 3.0, epsilon = 1e-12);
        assert!(StatsCalculator::neg_log10(0.0).is_infinite());
    }

    #[test]
    fn numbers_format_like_scientific_tools() {
        assert_eq!(StatsCalculator::format_number(1.0), "1.0");
        assert_eq!(StatsCalculator::format_number(0.39), "0.39");
        assert_eq!(StatsCalculator::format_number(0.0001), "0.0001");
        assert_eq!(StatsCalculator::format_number(1e-5), "1e-05");
        assert_eq!(StatsCalculator::format_number(1.5e-7), "1.5e-07");
        assert_eq!(StatsCalculator::format_number(1e16), "1e+16");
        assert_eq!(StatsCalculator::format_number(-2.0), "-2.0");
        assert_eq!(StatsCalculator::format_number(0.0), "0.0");
        assert_eq!(StatsCalculator::format_number(f64::NAN), "nan");
        assert_eq!(StatsCalculator::format_number(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn violin_summary_whiskers_stop_at_data() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let s = ViolinSummary::from_values(&values).unwrap();
        assert_eq!(s.count, 6);
        assert_relative_eq!(s.q1, 2.25);
        assert_relative_eq!(s.median, 3.5);
        assert_relative_eq!(s.q3, 4.75);
        assert_relative_eq!(s.whisker_low, 1.0);
        assert_relative_eq!(s.whisker_high, 5.0);
        assert_relative_eq!(s.max, 100.0);
        assert!(ViolinSummary::from_values(&[]).is_none());
    }

    #[test]
    fn density_integrates_to_one() {
        let values = [0.1, 0.2, 0.25, 0.4, 0.5, 0.55, 0.7];
        let kde = KernelDensity::scott(&values).unwrap().unwrap();
        assert_eq!(kde.support.len(), KDE_GRID_SIZE);
        assert_eq!(kde.density.len(), KDE_GRID_SIZE);

        let step = kde.support[1] - kde.support[0];
        let area: f64 = kde.density.iter().sum::<f64>() * step;
        assert_relative_eq!(area, 1.0, epsilon = 0.05);
        assert!(kde.support[0] < 0.1 && kde.support[KDE_GRID_SIZE - 1] > 0.7);
        assert!(kde.peak() > 0.0);
    }

    #[test]
    fn density_needs_spread() {
        assert!(KernelDensity::scott(&[0.4]).unwrap().is_none());
        assert!(KernelDensity::scott(&[0.4, 0.4, 0.4]).unwrap().is_none());
    }
}
