//! Kernel density estimation (Gaussian kernel, Scott's rule bandwidth).

use super::StatsCalculator;
use statrs::distribution::{Continuous, Normal};

/// Scott's rule factor `n^(-1/(d+4))` scaled by the sample spread.
fn scott_bandwidth(values: &[f64], dims: i32) -> f64 {
    let n = values.len() as f64;
    let spread = StatsCalculator::std_dev(values);
    let spread = if spread > 0.0 {
        spread
    } else {
        // Degenerate sample: fall back to a width relative to the magnitude.
        values.first().map(|v| v.abs() * 0.1).unwrap_or(0.0).max(0.5)
    };
    spread * n.powf(-1.0 / (dims as f64 + 4.0))
}

/// One-dimensional density estimate.
pub struct Kde1d {
    samples: Vec<f64>,
    bandwidth: f64,
    kernel: Normal,
}

impl Kde1d {
    /// `None` when there are no finite samples.
    pub fn new(values: &[f64]) -> Option<Self> {
        let samples: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if samples.is_empty() {
            return None;
        }
        let bandwidth = scott_bandwidth(&samples, 1);
        Some(Self {
            samples,
            bandwidth,
            kernel: Normal::new(0.0, 1.0).ok()?,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn density(&self, at: f64) -> f64 {
        let n = self.samples.len() as f64;
        self.samples
            .iter()
            .map(|s| self.kernel.pdf((at - s) / self.bandwidth))
            .sum::<f64>()
            / (n * self.bandwidth)
    }

    /// Evaluate on `steps` evenly spaced points spanning the samples plus
    /// three bandwidths on each side.
    pub fn curve(&self, steps: usize) -> Vec<[f64; 2]> {
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lo = min - 3.0 * self.bandwidth;
        let hi = max + 3.0 * self.bandwidth;
        let steps = steps.max(2);
        (0..steps)
            .map(|i| {
                let at = lo + (hi - lo) * i as f64 / (steps - 1) as f64;
                [at, self.density(at)]
            })
            .collect()
    }
}

/// Density sampled on a regular grid. `z[row][col]` pairs `ys[row]` with `xs[col]`.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

impl DensityGrid {
    pub fn max(&self) -> f64 {
        self.z
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Two-dimensional product-kernel estimate over paired samples.
pub fn kde_2d(points: &[[f64; 2]], resolution: usize) -> Option<DensityGrid> {
    let points: Vec<[f64; 2]> = points
        .iter()
        .copied()
        .filter(|p| p[0].is_finite() && p[1].is_finite())
        .collect();
    if points.is_empty() {
        return None;
    }

    let xs_raw: Vec<f64> = points.iter().map(|p| p[0]).collect();
    let ys_raw: Vec<f64> = points.iter().map(|p| p[1]).collect();
    let hx = scott_bandwidth(&xs_raw, 2);
    let hy = scott_bandwidth(&ys_raw, 2);
    let kernel = Normal::new(0.0, 1.0).ok()?;

    let axis = |raw: &[f64], h: f64| -> Vec<f64> {
        let min = raw.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * h;
        let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * h;
        let steps = resolution.max(2);
        (0..steps)
            .map(|i| min + (max - min) * i as f64 / (steps - 1) as f64)
            .collect()
    };
    let xs = axis(&xs_raw, hx);
    let ys = axis(&ys_raw, hy);

    let norm = points.len() as f64 * hx * hy;
    let z = ys
        .iter()
        .map(|&gy| {
            xs.iter()
                .map(|&gx| {
                    points
                        .iter()
                        .map(|p| kernel.pdf((gx - p[0]) / hx) * kernel.pdf((gy - p[1]) / hy))
                        .sum::<f64>()
                        / norm
                })
                .collect()
        })
        .collect();

    Some(DensityGrid { xs, ys, z })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kde_integrates_to_about_one() {
        let kde = Kde1d::new(&[1.0, 2.0, 2.5, 3.0, 7.0]).unwrap();
        let curve = kde.curve(400);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area was {area}");
    }

    #[test]
    fn kde_handles_constant_samples() {
        let kde = Kde1d::new(&[4.0, 4.0, 4.0]).unwrap();
        assert!(kde.bandwidth() > 0.0);
        assert!(kde.density(4.0) > kde.density(6.0));
        assert!(Kde1d::new(&[f64::NAN]).is_none());
    }

    #[test]
    fn kde_2d_peaks_near_the_cluster() {
        let points = [[0.0, 0.0], [0.1, -0.1], [-0.1, 0.1], [5.0, 5.0]];
        let grid = kde_2d(&points, 30).unwrap();
        assert_eq!(grid.xs.len(), 30);
        assert_eq!(grid.z.len(), 30);

        let (mut best, mut at) = (0.0, [0.0, 0.0]);
        for (r, row) in grid.z.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v > best {
                    best = v;
                    at = [grid.xs[c], grid.ys[r]];
                }
            }
        }
        assert_eq!(best, grid.max());
        assert!(at[0] < 2.5 && at[1] < 2.5);
    }
}
