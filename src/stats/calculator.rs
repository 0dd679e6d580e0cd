//! Statistics Calculator Module
//! Quartiles, correlations, bins and cumulative distributions used by the charts.

use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Five-number summary plus outliers for one box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Stateless helpers, same shape as the rest of the chart math.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Sort a copy of finite values ascending.
    pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Quartiles with whiskers at the furthest points inside 1.5 IQR.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        let sorted = Self::sorted_finite(values);
        if sorted.is_empty() {
            return None;
        }

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxSummary {
            count: sorted.len(),
            mean: sorted.iter().mean(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Sample standard deviation; zero for fewer than two values.
    pub fn std_dev(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        values.iter().std_dev()
    }

    /// Pearson correlation over rows where both values are present.
    pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys.iter())
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect();
        let n = pairs.len();
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
        let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
        for (x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        let denom = (var_x * var_y).sqrt();
        if denom == 0.0 {
            f64::NAN
        } else {
            (cov / denom).clamp(-1.0, 1.0)
        }
    }

    /// Full correlation matrix, rows computed in parallel.
    pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        (0..columns.len())
            .into_par_iter()
            .map(|i| {
                (0..columns.len())
                    .map(|j| Self::pearson(&columns[i], &columns[j]))
                    .collect()
            })
            .collect()
    }

    /// Equal-width bin edges using Sturges' rule.
    pub fn histogram_edges(values: &[f64]) -> Vec<f64> {
        let sorted = Self::sorted_finite(values);
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Vec::new();
        };
        if max - min <= f64::EPSILON {
            return vec![min - 0.5, min + 0.5];
        }

        let bins = ((sorted.len() as f64).log2().ceil() as usize + 1).max(1);
        let step = (max - min) / bins as f64;
        (0..=bins).map(|i| min + step * i as f64).collect()
    }

    /// Count values per bin; the last bin is closed on the right.
    pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
        if edges.len() < 2 {
            return Vec::new();
        }
        let bins = edges.len() - 1;
        let mut counts = vec![0usize; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            if v < edges[0] || v > edges[bins] {
                continue;
            }
            let idx = edges[1..].partition_point(|&edge| edge <= v).min(bins - 1);
            counts[idx] += 1;
        }
        counts
    }

    /// Step points of the empirical CDF: each sorted value with its cumulative fraction.
    pub fn ecdf(values: &[f64]) -> Vec<[f64; 2]> {
        let sorted = Self::sorted_finite(values);
        let n = sorted.len() as f64;
        sorted
            .iter()
            .enumerate()
            .map(|(i, &v)| [v, (i + 1) as f64 / n])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 0.0), 1.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn box_summary_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();
        assert_eq!(summary.count, 6);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.whisker_low, 1.0);
        assert_eq!(summary.whisker_high, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert!(StatsCalculator::box_summary(&[f64::NAN]).is_none());
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let xs = [Some(1.0), Some(2.0), Some(3.0), None];
        let ys = [Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
        assert!((StatsCalculator::pearson(&xs, &ys) - 1.0).abs() < 1e-12);

        let inverse = [Some(3.0), Some(2.0), Some(1.0), Some(0.0)];
        assert!((StatsCalculator::pearson(&xs, &inverse) + 1.0).abs() < 1e-12);

        let flat = [Some(1.0), Some(1.0), Some(1.0), Some(1.0)];
        assert!(StatsCalculator::pearson(&xs, &flat).is_nan());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let cols = vec![
            vec![Some(1.0), Some(2.0), Some(3.0), Some(5.0)],
            vec![Some(2.0), Some(1.0), Some(4.0), Some(3.0)],
            vec![Some(9.0), Some(7.0), Some(4.0), Some(1.0)],
        ];
        let m = StatsCalculator::correlation_matrix(&cols);
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert!((m[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((m[i][j] - m[j][i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn histogram_bins_cover_every_value() {
        let values: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let edges = StatsCalculator::histogram_edges(&values);
        // 16 values -> log2(16) + 1 = 5 bins
        assert_eq!(edges.len(), 6);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[5], 15.0);

        let counts = StatsCalculator::bin_counts(&values, &edges);
        assert_eq!(counts.iter().sum::<usize>(), 16);
        assert_eq!(counts[4], 4);
    }

    #[test]
    fn histogram_of_constant_values_has_one_bin() {
        let edges = StatsCalculator::histogram_edges(&[2.0, 2.0, 2.0]);
        assert_eq!(edges, vec![1.5, 2.5]);
        assert_eq!(StatsCalculator::bin_counts(&[2.0, 2.0, 2.0], &edges), vec![3]);
    }

    #[test]
    fn ecdf_ends_at_one() {
        let steps = StatsCalculator::ecdf(&[3.0, 1.0, 2.0, f64::NAN]);
        assert_eq!(steps, vec![[1.0, 1.0 / 3.0], [2.0, 2.0 / 3.0], [3.0, 1.0]]);
    }
}
