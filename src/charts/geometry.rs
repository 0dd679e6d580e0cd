//! Chart Geometry
//! Layout helpers: contour tracing, squarified treemaps, radial sectors, 3-D projection.

use crate::stats::DensityGrid;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Max arc covered by one convex sector piece.
const SECTOR_STEP: f64 = TAU / 120.0;

/// Axis-aligned rectangle in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn corners(&self) -> Vec<[f64; 2]> {
        vec![
            [self.x, self.y],
            [self.x + self.w, self.y],
            [self.x + self.w, self.y + self.h],
            [self.x, self.y + self.h],
        ]
    }

    pub fn center(&self) -> [f64; 2] {
        [self.x + self.w / 2.0, self.y + self.h / 2.0]
    }
}

/// Marching-squares iso-line segments of `grid` at `level`.
pub fn contour_segments(grid: &DensityGrid, level: f64) -> Vec<[[f64; 2]; 2]> {
    // Edges: 0 bottom, 1 right, 2 top, 3 left.
    const CASES: [&[(usize, usize)]; 16] = [
        &[],
        &[(3, 0)],
        &[(0, 1)],
        &[(3, 1)],
        &[(1, 2)],
        &[(3, 0), (1, 2)],
        &[(0, 2)],
        &[(3, 2)],
        &[(2, 3)],
        &[(0, 2)],
        &[(0, 1), (2, 3)],
        &[(1, 2)],
        &[(1, 3)],
        &[(0, 1)],
        &[(0, 3)],
        &[],
    ];

    let interp = |pa: [f64; 2], za: f64, pb: [f64; 2], zb: f64| -> [f64; 2] {
        let t = if (zb - za).abs() < f64::EPSILON {
            0.5
        } else {
            ((level - za) / (zb - za)).clamp(0.0, 1.0)
        };
        [pa[0] + (pb[0] - pa[0]) * t, pa[1] + (pb[1] - pa[1]) * t]
    };

    let mut segments = Vec::new();
    for row in 0..grid.ys.len().saturating_sub(1) {
        for col in 0..grid.xs.len().saturating_sub(1) {
            let p00 = [grid.xs[col], grid.ys[row]];
            let p10 = [grid.xs[col + 1], grid.ys[row]];
            let p11 = [grid.xs[col + 1], grid.ys[row + 1]];
            let p01 = [grid.xs[col], grid.ys[row + 1]];
            let z00 = grid.z[row][col];
            let z10 = grid.z[row][col + 1];
            let z11 = grid.z[row + 1][col + 1];
            let z01 = grid.z[row + 1][col];

            let case = (z00 >= level) as usize
                | ((z10 >= level) as usize) << 1
                | ((z11 >= level) as usize) << 2
                | ((z01 >= level) as usize) << 3;

            let edge_point = |edge: usize| match edge {
                0 => interp(p00, z00, p10, z10),
                1 => interp(p10, z10, p11, z11),
                2 => interp(p01, z01, p11, z11),
                _ => interp(p00, z00, p01, z01),
            };

            for &(a, b) in CASES[case] {
                segments.push([edge_point(a), edge_point(b)]);
            }
        }
    }
    segments
}

fn worst_ratio(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = row.iter().copied().fold(f64::INFINITY, f64::min);
    let side2 = side * side;
    let sum2 = sum * sum;
    (side2 * max / sum2).max(sum2 / (side2 * min))
}

/// Squarified treemap layout. `values` should be positive and sorted descending;
/// the result keeps the input order.
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return Vec::new();
    }
    let scale = bounds.w * bounds.h / total;
    let areas: Vec<f64> = values.iter().map(|v| v * scale).collect();

    let mut out = Vec::with_capacity(areas.len());
    let mut free = bounds;
    let mut start = 0;
    while start < areas.len() {
        let side = free.w.min(free.h);
        let mut end = start + 1;
        let mut best = worst_ratio(&areas[start..end], side);
        while end < areas.len() {
            let next = worst_ratio(&areas[start..=end], side);
            if next > best {
                break;
            }
            best = next;
            end += 1;
        }

        let row = &areas[start..end];
        let row_sum: f64 = row.iter().sum();
        if free.w >= free.h {
            // Column along the left edge.
            let col_w = row_sum / free.h;
            let mut y = free.y;
            for &a in row {
                let h = a / col_w;
                out.push(Rect {
                    x: free.x,
                    y,
                    w: col_w,
                    h,
                });
                y += h;
            }
            free.x += col_w;
            free.w -= col_w;
        } else {
            // Row along the bottom edge.
            let row_h = row_sum / free.w;
            let mut x = free.x;
            for &a in row {
                let w = a / row_h;
                out.push(Rect {
                    x,
                    y: free.y,
                    w,
                    h: row_h,
                });
                x += w;
            }
            free.y += row_h;
            free.h -= row_h;
        }
        start = end;
    }
    out
}

/// Point on a circle. Angle zero is twelve o'clock, growing clockwise.
pub fn polar_point(radius: f64, angle: f64) -> [f64; 2] {
    let a = FRAC_PI_2 - angle;
    [radius * a.cos(), radius * a.sin()]
}

/// Angles from `start` to `end` in steps no wider than the sector step.
fn arc_angles(start: f64, end: f64) -> Vec<f64> {
    let steps = (((end - start) / SECTOR_STEP - 1e-9).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| start + (end - start) * i as f64 / steps as f64)
        .collect()
}

/// Ring sector between two radii, split into convex quads (triangles when `inner` is zero).
pub fn sector_pieces(inner: f64, outer: f64, start: f64, end: f64) -> Vec<Vec<[f64; 2]>> {
    let angles = arc_angles(start, end);
    angles
        .windows(2)
        .map(|w| {
            if inner <= 0.0 {
                vec![
                    [0.0, 0.0],
                    polar_point(outer, w[0]),
                    polar_point(outer, w[1]),
                ]
            } else {
                vec![
                    polar_point(inner, w[0]),
                    polar_point(outer, w[0]),
                    polar_point(outer, w[1]),
                    polar_point(inner, w[1]),
                ]
            }
        })
        .collect()
}

/// Closed outline of a ring sector.
pub fn sector_outline(inner: f64, outer: f64, start: f64, end: f64) -> Vec<[f64; 2]> {
    let angles = arc_angles(start, end);
    let mut path: Vec<[f64; 2]> = angles.iter().map(|&a| polar_point(outer, a)).collect();
    if inner <= 0.0 {
        path.push([0.0, 0.0]);
    } else {
        path.extend(angles.iter().rev().map(|&a| polar_point(inner, a)));
    }
    if let Some(&first) = path.first() {
        path.push(first);
    }
    path
}

/// Fixed orthographic camera for 3-D scatter plots.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub azimuth: f64,
    pub elevation: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            azimuth: 40f64.to_radians(),
            elevation: 25f64.to_radians(),
        }
    }
}

impl Projection {
    /// Project a point from the unit cube onto the screen plane.
    pub fn project(&self, p: [f64; 3]) -> [f64; 2] {
        let (u, v, w) = (p[0] - 0.5, p[1] - 0.5, p[2] - 0.5);
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        let sx = u * ca - v * sa;
        let depth = u * sa + v * ca;
        let sy = w * ce + depth * se;
        [sx, sy]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(r: &Rect) -> f64 {
        r.w * r.h
    }

    #[test]
    fn squarify_preserves_areas_and_bounds() {
        let bounds = Rect {
            x: 0.0,
            y: 0.0,
            w: 6.0,
            h: 4.0,
        };
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&values, bounds);
        assert_eq!(rects.len(), values.len());

        let total: f64 = values.iter().sum();
        for (r, v) in rects.iter().zip(values) {
            assert!((area(r) - v / total * 24.0).abs() < 1e-9);
            assert!(r.x >= -1e-9 && r.y >= -1e-9);
            assert!(r.x + r.w <= 6.0 + 1e-9 && r.y + r.h <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn squarify_ignores_empty_input() {
        let bounds = Rect {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
        };
        assert!(squarify(&[], bounds).is_empty());
        assert!(squarify(&[0.0], bounds).is_empty());
    }

    #[test]
    fn polar_zero_points_up() {
        let p = polar_point(1.0, 0.0);
        assert!(p[0].abs() < 1e-12 && (p[1] - 1.0).abs() < 1e-12);
        let q = polar_point(1.0, FRAC_PI_2);
        assert!((q[0] - 1.0).abs() < 1e-12 && q[1].abs() < 1e-12);
    }

    #[test]
    fn full_pie_is_split_into_small_pieces() {
        let pieces = sector_pieces(0.0, 1.0, 0.0, TAU);
        assert_eq!(pieces.len(), 120);
        assert!(pieces.iter().all(|p| p.len() == 3));

        let ring = sector_pieces(0.5, 1.0, 0.0, 0.05);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring[0].len(), 4);
    }

    #[test]
    fn contour_of_a_peak_is_closed_around_it() {
        let xs: Vec<f64> = (0..5).map(|v| v as f64).collect();
        let ys = xs.clone();
        let z = (0..5)
            .map(|r| {
                (0..5)
                    .map(|c| if r == 2 && c == 2 { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();
        let grid = DensityGrid { xs, ys, z };
        let segments = contour_segments(&grid, 0.5);
        assert_eq!(segments.len(), 4);
        for seg in segments {
            for p in seg {
                let d = ((p[0] - 2.0).powi(2) + (p[1] - 2.0).powi(2)).sqrt();
                assert!(d <= 0.5 + 1e-9);
            }
        }
    }

    #[test]
    fn projection_centres_the_cube() {
        let proj = Projection::default();
        assert_eq!(proj.project([0.5, 0.5, 0.5]), [0.0, 0.0]);
        let top = proj.project([0.5, 0.5, 1.0]);
        assert!(top[1] > 0.0);
    }
}
