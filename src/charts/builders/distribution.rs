//! Distribution charts: box, violin, strip and density contour.

use super::{distinct_positions, dodge, finish, numeric_column, slot_index, slot_width, title};
use crate::charts::axis::{AxisValues, ColorGroup, Coloring};
use crate::charts::figure::{
    palette, AreaMark, BoxStat, BoxesMark, Figure, Mark, PointsMark, Radius, Rgb, SegmentsMark,
};
use crate::charts::geometry::contour_segments;
use crate::charts::{ChartKind, DispatchError};
use crate::data::Dataset;
use crate::stats::{kde_2d, Kde1d, StatsCalculator};

const CONTOUR_LEVELS: usize = 8;
const CONTOUR_RESOLUTION: usize = 60;
const VIOLIN_STEPS: usize = 60;

/// Values of one color group at one x slot, with where to draw them.
struct Cell {
    center: f64,
    width: f64,
    values: Vec<f64>,
}

/// Split each color group's rows by x position, dodging groups inside a slot.
fn cells_by_group(
    xs: &AxisValues,
    ys: &[Option<f64>],
    groups: &[ColorGroup],
    rows: usize,
) -> Vec<Vec<Cell>> {
    let positions = distinct_positions(xs, 0..rows);
    let slot = slot_width(&positions);
    let count = groups.len();

    groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); positions.len()];
            for &r in &group.rows {
                let idx = xs.position(r).and_then(|p| slot_index(&positions, p));
                if let (Some(idx), Some(v)) = (idx, ys[r]) {
                    buckets[idx].push(v);
                }
            }
            positions
                .iter()
                .zip(buckets)
                .filter_map(|(&pos, values)| {
                    if values.is_empty() {
                        return None;
                    }
                    let (center, width) = if count == 1 {
                        (pos, slot * 0.5)
                    } else {
                        dodge(pos, slot, index, count)
                    };
                    Some(Cell {
                        center,
                        width,
                        values,
                    })
                })
                .collect()
        })
        .collect()
}

fn grouped_figure(
    kind: ChartKind,
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<(Figure, Vec<ColorGroup>, Vec<Vec<Cell>>), DispatchError> {
    let ys = numeric_column(dataset, y)?;
    let xs = AxisValues::from_column(dataset, x)?;
    let groups = Coloring::resolve(dataset, category)?.groups(dataset.height());
    let cells = cells_by_group(&xs, &ys, &groups, dataset.height());
    let fig = Figure::new(kind, title(kind, y, x, category))
        .with_axis_labels(x, y)
        .with_x_ticks(xs.ticks());
    Ok((fig, groups, cells))
}

fn box_stat(cell: &Cell, width: f64) -> Option<(BoxStat, Vec<f64>)> {
    let summary = StatsCalculator::box_summary(&cell.values)?;
    Some((
        BoxStat {
            position: cell.center,
            width,
            whisker_low: summary.whisker_low,
            q1: summary.q1,
            median: summary.median,
            q3: summary.q3,
            whisker_high: summary.whisker_high,
        },
        summary.outliers,
    ))
}

pub fn box_plot(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let (mut fig, groups, cells) = grouped_figure(ChartKind::BoxPlot, dataset, x, y, category)?;

    for (group, cells) in groups.into_iter().zip(cells) {
        let mut boxes = Vec::new();
        let mut outliers = Vec::new();
        for cell in &cells {
            if let Some((stat, outs)) = box_stat(cell, cell.width) {
                outliers.extend(outs.into_iter().map(|v| [cell.center, v]));
                boxes.push(stat);
            }
        }
        if boxes.is_empty() {
            continue;
        }
        fig.push(Mark::Boxes(BoxesMark {
            name: group.name,
            boxes,
            color: group.color,
        }));
        if !outliers.is_empty() {
            fig.push(Mark::Points(PointsMark {
                name: None,
                points: outliers,
                color: group.color,
                radius: Radius::Uniform(2.5),
            }));
        }
    }
    finish(fig)
}

/// Mirrored kernel density per cell with a narrow box inside.
pub fn violin(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let (mut fig, groups, cells) = grouped_figure(ChartKind::Violin, dataset, x, y, category)?;

    let curves: Vec<Vec<Vec<[f64; 2]>>> = cells
        .iter()
        .map(|group_cells| {
            group_cells
                .iter()
                .map(|cell| {
                    Kde1d::new(&cell.values)
                        .map(|kde| {
                            log::debug!(
                                "violin at {:.2}: {} samples, bandwidth {:.4}",
                                cell.center,
                                cell.values.len(),
                                kde.bandwidth()
                            );
                            kde.curve(VIOLIN_STEPS)
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    // Every violin shares one density scale.
    let peak = curves
        .iter()
        .flatten()
        .flatten()
        .map(|p| p[1])
        .fold(0.0_f64, f64::max);

    for ((group, cells), curves) in groups.into_iter().zip(cells).zip(curves) {
        let mut boxes = Vec::new();
        for (cell, curve) in cells.iter().zip(curves) {
            if curve.is_empty() || peak <= 0.0 {
                continue;
            }
            let half = |density: f64| density / peak * cell.width / 2.0;
            let pieces = curve
                .windows(2)
                .map(|w| {
                    let (a, b) = (w[0], w[1]);
                    vec![
                        [cell.center - half(a[1]), a[0]],
                        [cell.center + half(a[1]), a[0]],
                        [cell.center + half(b[1]), b[0]],
                        [cell.center - half(b[1]), b[0]],
                    ]
                })
                .collect();
            let mut outline: Vec<[f64; 2]> = curve
                .iter()
                .map(|p| [cell.center + half(p[1]), p[0]])
                .collect();
            outline.extend(curve.iter().rev().map(|p| [cell.center - half(p[1]), p[0]]));
            if let Some(&first) = outline.first() {
                outline.push(first);
            }

            fig.push(Mark::Area(AreaMark {
                name: group.name.clone(),
                pieces,
                fill: group.color,
                opacity: 0.4,
                outline: Some(outline),
                outline_color: group.color,
            }));
            if let Some((stat, _)) = box_stat(cell, cell.width * 0.15) {
                boxes.push(stat);
            }
        }
        if !boxes.is_empty() {
            fig.push(Mark::Boxes(BoxesMark {
                name: group.name,
                boxes,
                color: group.color,
            }));
        }
    }
    finish(fig)
}

/// Fractional part of `i * golden ratio`, a low-discrepancy jitter sequence.
fn jitter(i: usize) -> f64 {
    (i as f64 * 0.618_033_988_75).fract() - 0.5
}

/// Points per cell with deterministic horizontal jitter.
pub fn strip(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let (mut fig, groups, cells) = grouped_figure(ChartKind::Strip, dataset, x, y, category)?;

    for (group, cells) in groups.into_iter().zip(cells) {
        let points: Vec<[f64; 2]> = cells
            .iter()
            .flat_map(|cell| {
                cell.values
                    .iter()
                    .enumerate()
                    .map(move |(i, &v)| [cell.center + jitter(i) * cell.width, v])
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        fig.push(Mark::Points(PointsMark {
            name: group.name,
            points,
            color: group.color,
            radius: Radius::Uniform(3.0),
        }));
    }
    finish(fig)
}

/// Iso-density lines of a 2-D kernel estimate.
pub fn density_contour(dataset: &Dataset, x: &str, y: &str) -> Result<Figure, DispatchError> {
    let xs = numeric_column(dataset, x)?;
    let ys = numeric_column(dataset, y)?;
    let points: Vec<[f64; 2]> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(a, b)| Some([(*a)?, (*b)?]))
        .collect();

    let mut fig = Figure::new(
        ChartKind::DensityContour,
        title(ChartKind::DensityContour, y, x, None),
    )
    .with_axis_labels(x, y);

    let Some(grid) = kde_2d(&points, CONTOUR_RESOLUTION) else {
        return finish(fig);
    };
    let peak = grid.max();
    let light = Rgb(198, 219, 239);
    for level in 1..=CONTOUR_LEVELS {
        let t = level as f64 / (CONTOUR_LEVELS + 1) as f64;
        let segments = contour_segments(&grid, peak * t);
        if segments.is_empty() {
            continue;
        }
        fig.push(Mark::Segments(SegmentsMark {
            name: None,
            segments,
            color: light.lerp(palette(0), t).lerp(Rgb(8, 48, 107), (t - 0.5).max(0.0)),
            width: 1.5,
        }));
    }
    finish(fig)
}
