//! Cartesian charts: line, bar, histogram, scatter, bubble, funnel, ECDF, area.

use super::{
    distinct_positions, dodge, finish, numeric_column, slot_index, slot_width, sum_by_key, title,
};
use crate::charts::axis::{categorize, category_ticks, AxisValues, Coloring};
use crate::charts::figure::{
    palette, AreaMark, Bar, BarsMark, Figure, LabelMark, LineMark, Mark, Orientation,
    PointsMark, Radius, Rgb,
};
use crate::charts::{ChartKind, DispatchError};
use crate::data::Dataset;
use crate::stats::StatsCalculator;

const POINT_RADIUS: f32 = 3.5;
const MAX_BUBBLE_RADIUS: f32 = 20.0;
const MIN_BUBBLE_RADIUS: f32 = 1.5;

/// `[x, y]` for every row in `rows` where both cells are present.
fn paired(xs: &AxisValues, ys: &AxisValues, rows: &[usize]) -> Vec<[f64; 2]> {
    rows.iter()
        .filter_map(|&r| Some([xs.position(r)?, ys.position(r)?]))
        .collect()
}

fn xy_figure(
    kind: ChartKind,
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<(Figure, AxisValues, AxisValues, Coloring), DispatchError> {
    let xs = AxisValues::from_column(dataset, x)?;
    let ys = AxisValues::from_column(dataset, y)?;
    let coloring = Coloring::resolve(dataset, category)?;
    let fig = Figure::new(kind, title(kind, y, x, category))
        .with_axis_labels(x, y)
        .with_x_ticks(xs.ticks())
        .with_y_ticks(ys.ticks());
    Ok((fig, xs, ys, coloring))
}

pub fn line(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let (mut fig, xs, ys, coloring) = xy_figure(ChartKind::Line, dataset, x, y, category)?;
    for group in coloring.groups(dataset.height()) {
        let points = paired(&xs, &ys, &group.rows);
        if points.is_empty() {
            continue;
        }
        fig.push(Mark::Line(LineMark {
            name: group.name,
            points,
            color: group.color,
            width: 2.0,
        }));
    }
    finish(fig)
}

pub fn scatter(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let (mut fig, xs, ys, coloring) = xy_figure(ChartKind::Scatter, dataset, x, y, category)?;
    for group in coloring.groups(dataset.height()) {
        let points = paired(&xs, &ys, &group.rows);
        if points.is_empty() {
            continue;
        }
        fig.push(Mark::Points(PointsMark {
            name: group.name,
            points,
            color: group.color,
            radius: Radius::Uniform(POINT_RADIUS),
        }));
    }
    finish(fig)
}

/// Scatter whose marker area grows with `y`.
pub fn bubble(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let sizes = numeric_column(dataset, y)?;
    let (mut fig, xs, ys, coloring) = xy_figure(ChartKind::Bubble, dataset, x, y, category)?;
    let max_size = sizes
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max);

    for group in coloring.groups(dataset.height()) {
        let mut points = Vec::new();
        let mut radii = Vec::new();
        for &row in &group.rows {
            let (Some(px), Some(py), Some(size)) =
                (xs.position(row), ys.position(row), sizes[row])
            else {
                continue;
            };
            let scaled = if max_size > 0.0 {
                (size.max(0.0) / max_size).sqrt() as f32 * MAX_BUBBLE_RADIUS
            } else {
                0.0
            };
            points.push([px, py]);
            radii.push(scaled.max(MIN_BUBBLE_RADIUS));
        }
        if points.is_empty() {
            continue;
        }
        fig.push(Mark::Points(PointsMark {
            name: group.name,
            points,
            color: group.color,
            radius: Radius::PerPoint(radii),
        }));
    }
    finish(fig)
}

/// Bars summed per (x, category), categories side by side within each x slot.
pub fn bar(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let heights = numeric_column(dataset, y)?;
    let (mut fig, xs, _, coloring) = xy_figure(ChartKind::Bar, dataset, x, y, category)?;
    fig.y_ticks = None;

    let slot = slot_width(&distinct_positions(&xs, 0..dataset.height()));
    let groups = coloring.groups(dataset.height());
    let count = groups.len();

    for (index, group) in groups.into_iter().enumerate() {
        let sums = sum_by_key(
            group
                .rows
                .iter()
                .filter_map(|&r| Some((xs.position(r)?.to_bits(), heights[r]?))),
        );
        let bars: Vec<Bar> = sums
            .into_iter()
            .map(|(bits, total)| {
                let (position, width) = dodge(f64::from_bits(bits), slot, index, count);
                Bar {
                    position,
                    length: total,
                    base: 0.0,
                    width,
                }
            })
            .collect();
        if bars.is_empty() {
            continue;
        }
        fig.push(Mark::Bars(BarsMark {
            name: group.name,
            bars,
            color: group.color,
            orientation: Orientation::Vertical,
        }));
    }
    finish(fig)
}

/// Counts per bin (numeric x) or per value (text x), stacked across categories.
pub fn histogram(
    dataset: &Dataset,
    x: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let coloring = Coloring::resolve(dataset, category)?;
    let title = match category {
        Some(c) => format!("{}: {} by {}", ChartKind::Histogram, x, c),
        None => format!("{}: {}", ChartKind::Histogram, x),
    };
    let mut fig = Figure::new(ChartKind::Histogram, title).with_axis_labels(x, "count");
    let groups = coloring.groups(dataset.height());

    if dataset.is_numeric(x) {
        let values = numeric_column(dataset, x)?;
        let all: Vec<f64> = values.iter().flatten().copied().collect();
        let edges = StatsCalculator::histogram_edges(&all);
        let mut stacked = vec![0.0; edges.len().saturating_sub(1)];

        for group in groups {
            let group_values: Vec<f64> = group.rows.iter().filter_map(|&r| values[r]).collect();
            let counts = StatsCalculator::bin_counts(&group_values, &edges);
            let bars: Vec<Bar> = counts
                .iter()
                .enumerate()
                .filter(|(_, &c)| c > 0)
                .map(|(i, &c)| {
                    let bar = Bar {
                        position: (edges[i] + edges[i + 1]) / 2.0,
                        length: c as f64,
                        base: stacked[i],
                        width: edges[i + 1] - edges[i],
                    };
                    stacked[i] += c as f64;
                    bar
                })
                .collect();
            if bars.is_empty() {
                continue;
            }
            fig.push(Mark::Bars(BarsMark {
                name: group.name,
                bars,
                color: group.color,
                orientation: Orientation::Vertical,
            }));
        }
    } else {
        let (names, codes) = categorize(&dataset.labels(x)?);
        fig.x_ticks = Some(category_ticks(&names));
        let mut stacked = vec![0.0; names.len()];

        for group in groups {
            let mut counts = vec![0usize; names.len()];
            for &row in &group.rows {
                if let Some(code) = codes[row] {
                    counts[code] += 1;
                }
            }
            let bars: Vec<Bar> = counts
                .iter()
                .enumerate()
                .filter(|(_, &c)| c > 0)
                .map(|(i, &c)| {
                    let bar = Bar {
                        position: i as f64,
                        length: c as f64,
                        base: stacked[i],
                        width: 0.8,
                    };
                    stacked[i] += c as f64;
                    bar
                })
                .collect();
            if bars.is_empty() {
                continue;
            }
            fig.push(Mark::Bars(BarsMark {
                name: group.name,
                bars,
                color: group.color,
                orientation: Orientation::Vertical,
            }));
        }
    }
    finish(fig)
}

/// Empirical CDF of a numeric column, drawn as a step line.
pub fn ecdf(dataset: &Dataset, x: &str) -> Result<Figure, DispatchError> {
    let values: Vec<f64> = numeric_column(dataset, x)?.into_iter().flatten().collect();
    let steps = StatsCalculator::ecdf(&values);

    let mut fig = Figure::new(ChartKind::Ecdf, format!("{}: {}", ChartKind::Ecdf, x))
        .with_axis_labels(x, "probability");
    if let Some(first) = steps.first() {
        let mut points = vec![[first[0], 0.0]];
        let mut previous = 0.0;
        for step in &steps {
            points.push([step[0], previous]);
            points.push(*step);
            previous = step[1];
        }
        fig.push(Mark::Line(LineMark {
            name: None,
            points,
            color: palette(0),
            width: 2.0,
        }));
    }
    finish(fig)
}

/// Horizontal bars centered on zero: `x` gives the length, `y` the stage.
pub fn funnel(dataset: &Dataset, x: &str, y: &str) -> Result<Figure, DispatchError> {
    let lengths = numeric_column(dataset, x)?;
    let stages = dataset.labels(y)?;
    let totals = sum_by_key(
        stages
            .into_iter()
            .zip(lengths)
            .filter_map(|(stage, len)| Some((stage?, len?))),
    );

    let count = totals.len();
    // First stage on top.
    let position = |i: usize| (count - 1 - i) as f64;
    let ticks = totals
        .iter()
        .enumerate()
        .map(|(i, (stage, _))| crate::charts::figure::Tick {
            position: position(i),
            label: stage.clone(),
        })
        .collect();

    let mut fig = Figure::new(
        ChartKind::Funnel,
        format!("{}: {} by {}", ChartKind::Funnel, x, y),
    )
    .with_axis_labels(x, y)
    .with_y_ticks(Some(ticks));

    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, (_, len))| Bar {
            position: position(i),
            length: *len,
            base: -len / 2.0,
            width: 0.8,
        })
        .collect();
    if !bars.is_empty() {
        fig.push(Mark::Bars(BarsMark {
            name: None,
            bars,
            color: palette(0),
            orientation: Orientation::Horizontal,
        }));
    }
    for (i, (_, len)) in totals.iter().enumerate() {
        fig.push(Mark::Label(LabelMark {
            position: [0.0, position(i)],
            text: format_value(*len),
            color: Rgb::WHITE,
        }));
    }
    finish(fig)
}

/// Areas stacked per category over the union of x positions.
pub fn area(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let heights = numeric_column(dataset, y)?;
    let (mut fig, xs, _, coloring) = xy_figure(ChartKind::Area, dataset, x, y, category)?;
    fig.y_ticks = None;

    let positions = distinct_positions(&xs, 0..dataset.height());
    let mut lower = vec![0.0; positions.len()];

    for group in coloring.groups(dataset.height()) {
        let mut upper = lower.clone();
        let mut any = false;
        for &row in &group.rows {
            let (Some(px), Some(h)) = (xs.position(row), heights[row]) else {
                continue;
            };
            if let Some(idx) = slot_index(&positions, px) {
                upper[idx] += h;
                any = true;
            }
        }
        if !any {
            continue;
        }

        let pieces = positions
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                vec![
                    [w[0], lower[i]],
                    [w[1], lower[i + 1]],
                    [w[1], upper[i + 1]],
                    [w[0], upper[i]],
                ]
            })
            .collect();
        let outline = positions
            .iter()
            .zip(upper.iter())
            .map(|(&px, &py)| [px, py])
            .collect();

        fig.push(Mark::Area(AreaMark {
            name: group.name,
            pieces,
            fill: group.color,
            opacity: 0.5,
            outline: Some(outline),
            outline_color: group.color,
        }));
        lower = upper;
    }
    finish(fig)
}

/// Compact number for value labels.
pub(crate) fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sales() -> Dataset {
        let df = df!(
            "month" => ["jan", "feb", "jan", "feb", "mar"],
            "units" => [3.0, 4.0, 1.0, 2.0, 5.0],
            "store" => ["north", "north", "south", "south", "north"]
        )
        .unwrap();
        Dataset::new(df, "sales.csv")
    }

    fn bars_of(fig: &Figure) -> Vec<&BarsMark> {
        fig.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Bars(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn line_has_one_series_per_category() {
        let fig = line(&sales(), "month", "units", Some("store")).unwrap();
        assert_eq!(fig.marks.len(), 2);
        assert_eq!(fig.legend().len(), 2);
        assert_eq!(fig.x_ticks.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn bar_sums_and_dodges() {
        let fig = bar(&sales(), "month", "units", None).unwrap();
        let bars = bars_of(&fig);
        assert_eq!(bars.len(), 1);
        let lengths: Vec<f64> = bars[0].bars.iter().map(|b| b.length).collect();
        assert_eq!(lengths, vec![4.0, 6.0, 5.0]);

        let grouped = bar(&sales(), "month", "units", Some("store")).unwrap();
        let grouped = bars_of(&grouped);
        assert_eq!(grouped.len(), 2);
        assert!(grouped[0].bars[0].position < grouped[1].bars[0].position);
    }

    #[test]
    fn bar_needs_numeric_heights() {
        assert_eq!(
            bar(&sales(), "units", "store", None),
            Err(DispatchError::NonNumericColumn("store".into()))
        );
    }

    #[test]
    fn histogram_stacks_categories() {
        let fig = histogram(&sales(), "month", Some("store")).unwrap();
        let bars = bars_of(&fig);
        assert_eq!(bars.len(), 2);
        // "jan" has one north and one south row: south stacks on north.
        let south_jan = &bars[1].bars[0];
        assert_eq!(south_jan.base, 1.0);
        assert_eq!(south_jan.length, 1.0);
    }

    #[test]
    fn numeric_histogram_counts_every_row() {
        let fig = histogram(&sales(), "units", None).unwrap();
        let total: f64 = bars_of(&fig)[0].bars.iter().map(|b| b.length).sum();
        assert_eq!(total, 5.0);
    }

    #[test]
    fn bubble_radius_tracks_size() {
        let fig = bubble(&sales(), "month", "units", None).unwrap();
        let Mark::Points(points) = &fig.marks[0] else {
            panic!("expected points");
        };
        // units == 5 is the largest bubble.
        assert_eq!(points.radius.at(4), MAX_BUBBLE_RADIUS);
        assert!(points.radius.at(2) < points.radius.at(1));
    }

    #[test]
    fn ecdf_steps_reach_one() {
        let fig = ecdf(&sales(), "units").unwrap();
        let Mark::Line(line) = &fig.marks[0] else {
            panic!("expected line");
        };
        assert_eq!(line.points.first(), Some(&[1.0, 0.0]));
        assert_eq!(line.points.last(), Some(&[5.0, 1.0]));
    }

    #[test]
    fn funnel_puts_first_stage_on_top() {
        let fig = funnel(&sales(), "units", "month").unwrap();
        let ticks = fig.y_ticks.as_ref().unwrap();
        assert_eq!(ticks[0].label, "jan");
        assert_eq!(ticks[0].position, 2.0);
        let bars = bars_of(&fig);
        assert_eq!(bars[0].orientation, Orientation::Horizontal);
        assert_eq!(bars[0].bars[0].base, -2.0);
    }

    #[test]
    fn funnel_merges_repeated_stages() {
        let fig = funnel(&sales(), "units", "month").unwrap();
        let bars = &bars_of(&fig)[0].bars;
        let lengths: Vec<f64> = bars.iter().map(|b| b.length).collect();
        assert_eq!(lengths, vec![4.0, 6.0, 5.0]);
        assert_eq!(fig.y_ticks.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn area_stacks_on_previous_category() {
        let fig = area(&sales(), "month", "units", Some("store")).unwrap();
        let areas: Vec<&AreaMark> = fig
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Area(a) => Some(a),
                _ => None,
            })
            .collect();
        assert_eq!(areas.len(), 2);
        let top = areas[1].outline.as_ref().unwrap();
        // positions: jan=0, feb=1, mar=2; north 3,4,5 + south 1,2,0
        assert_eq!(top, &vec![[0.0, 4.0], [1.0, 6.0], [2.0, 5.0]]);
    }

    #[test]
    fn format_value_drops_integer_fraction() {
        assert_eq!(format_value(12.0), "12");
        assert_eq!(format_value(1.234), "1.23");
    }
}
