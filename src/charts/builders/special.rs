//! Correlation heatmap, radar and 3-D scatter.

use super::{finish, numeric_column};
use crate::charts::axis::{categorize, AxisValues, Coloring};
use crate::charts::figure::{
    coolwarm, palette, AreaMark, Figure, LabelMark, LineMark, Mark, PointsMark, Radius, Rgb,
    SegmentsMark, Tick,
};
use crate::charts::geometry::{polar_point, Projection};
use crate::charts::{ChartKind, DispatchError};
use crate::data::Dataset;
use crate::stats::StatsCalculator;
use std::f64::consts::TAU;

/// Coefficients above this magnitude get white annotations.
const DARK_CELL: f64 = 0.6;
const RADAR_RINGS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];
const CIRCLE_STEPS: usize = 96;

/// Pearson correlation of every numeric column, first column on the top row.
pub fn heatmap(dataset: &Dataset) -> Result<Figure, DispatchError> {
    let names = dataset.numeric_columns();
    if names.is_empty() {
        return Err(DispatchError::NoNumericColumns);
    }
    let columns = names
        .iter()
        .map(|name| numeric_column(dataset, name))
        .collect::<Result<Vec<_>, _>>()?;
    let matrix = StatsCalculator::correlation_matrix(&columns);
    let n = names.len();
    let row_y = |i: usize| (n - 1 - i) as f64;

    let y_ticks = names
        .iter()
        .enumerate()
        .map(|(i, name)| Tick {
            position: row_y(i),
            label: name.clone(),
        })
        .collect();
    let x_ticks = names
        .iter()
        .enumerate()
        .map(|(j, name)| Tick {
            position: j as f64,
            label: name.clone(),
        })
        .collect();

    let mut fig = Figure::new(ChartKind::Heatmap, "Heatmap: correlation of numeric columns")
        .with_x_ticks(Some(x_ticks))
        .with_y_ticks(Some(y_ticks));

    let mut labels = Vec::new();
    for (i, row) in matrix.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let (cx, cy) = (j as f64, row_y(i));
            fig.push(Mark::Area(AreaMark {
                name: None,
                pieces: vec![vec![
                    [cx - 0.5, cy - 0.5],
                    [cx + 0.5, cy - 0.5],
                    [cx + 0.5, cy + 0.5],
                    [cx - 0.5, cy + 0.5],
                ]],
                fill: coolwarm(value),
                opacity: 1.0,
                outline: None,
                outline_color: Rgb::WHITE,
            }));
            let text = if value.is_nan() {
                "n/a".to_string()
            } else {
                format!("{:.2}", value)
            };
            labels.push(Mark::Label(LabelMark {
                position: [cx, cy],
                text,
                color: if value.abs() > DARK_CELL {
                    Rgb::WHITE
                } else {
                    Rgb::TEXT
                },
            }));
        }
    }
    fig.marks.extend(labels);
    finish(fig)
}

fn circle(radius: f64) -> Vec<[f64; 2]> {
    (0..=CIRCLE_STEPS)
        .map(|i| polar_point(radius, TAU * i as f64 / CIRCLE_STEPS as f64))
        .collect()
}

/// Polar line of `r` against `theta`, closed back to its first point.
pub fn radar(dataset: &Dataset, theta: &str, r: &str) -> Result<Figure, DispatchError> {
    let radii = numeric_column(dataset, r)?;

    // Numeric angles are degrees; text angles are spread evenly around the circle.
    let (angles, spokes): (Vec<Option<f64>>, Vec<(f64, String)>) = if dataset.is_numeric(theta) {
        let degrees = numeric_column(dataset, theta)?;
        let spokes = (0..8)
            .map(|i| {
                let deg = i as f64 * 45.0;
                (deg.to_radians(), format!("{}°", deg))
            })
            .collect();
        (
            degrees.into_iter().map(|d| d.map(f64::to_radians)).collect(),
            spokes,
        )
    } else {
        let (names, codes) = categorize(&dataset.labels(theta)?);
        let step = TAU / names.len().max(1) as f64;
        let spokes = names
            .iter()
            .enumerate()
            .map(|(i, name)| (i as f64 * step, name.clone()))
            .collect();
        (
            codes.into_iter().map(|c| c.map(|c| c as f64 * step)).collect(),
            spokes,
        )
    };

    let samples: Vec<(f64, f64)> = angles
        .iter()
        .zip(radii.iter())
        .filter_map(|(a, v)| Some(((*a)?, v.unwrap_or(f64::NAN))))
        .filter(|(_, v)| v.is_finite())
        .collect();
    if samples.is_empty() {
        return Err(DispatchError::NoPlottableRows);
    }
    let max_r = samples.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let scale = if max_r > 0.0 { max_r } else { 1.0 };

    let mut fig = Figure::new(ChartKind::Radar, format!("Radar Chart: {} by {}", r, theta)).canvas();

    fig.push(Mark::Segments(SegmentsMark {
        name: None,
        segments: spokes
            .iter()
            .map(|(angle, _)| [[0.0, 0.0], polar_point(1.0, *angle)])
            .collect(),
        color: Rgb::GRID,
        width: 0.5,
    }));
    for ring in RADAR_RINGS {
        fig.push(Mark::Line(LineMark {
            name: None,
            points: circle(ring),
            color: Rgb::GRID,
            width: 0.5,
        }));
    }

    let mut points: Vec<[f64; 2]> = samples
        .iter()
        .map(|(angle, v)| polar_point(v.max(0.0) / scale, *angle))
        .collect();
    fig.push(Mark::Points(PointsMark {
        name: None,
        points: points.clone(),
        color: palette(0),
        radius: Radius::Uniform(3.0),
    }));
    if let Some(&first) = points.first() {
        points.push(first);
    }
    fig.push(Mark::Line(LineMark {
        name: Some(r.to_string()),
        points,
        color: palette(0),
        width: 2.0,
    }));

    for (angle, text) in spokes {
        fig.push(Mark::Label(LabelMark {
            position: polar_point(1.12, angle),
            text,
            color: Rgb::TEXT,
        }));
    }
    for ring in RADAR_RINGS {
        fig.push(Mark::Label(LabelMark {
            position: polar_point(ring, TAU / 32.0),
            text: super::cartesian::format_value(scale * ring),
            color: Rgb::GRID,
        }));
    }
    Ok(fig)
}

/// Positions scaled to the unit interval; a flat axis sits in the middle.
fn unit_positions(axis: &AxisValues, rows: usize) -> Vec<Option<f64>> {
    let positions: Vec<Option<f64>> = (0..rows).map(|r| axis.position(r)).collect();
    let lo = positions.iter().flatten().copied().fold(f64::INFINITY, f64::min);
    let hi = positions.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    positions
        .into_iter()
        .map(|p| {
            p.map(|v| {
                if span > f64::EPSILON {
                    (v - lo) / span
                } else {
                    0.5
                }
            })
        })
        .collect()
}

const CUBE_EDGES: [([f64; 3], [f64; 3]); 12] = [
    ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 1.0]),
    ([0.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
    ([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
    ([0.0, 0.0, 1.0], [0.0, 1.0, 1.0]),
    ([1.0, 0.0, 1.0], [1.0, 1.0, 1.0]),
    ([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([1.0, 0.0, 0.0], [1.0, 0.0, 1.0]),
    ([0.0, 1.0, 0.0], [0.0, 1.0, 1.0]),
    ([1.0, 1.0, 0.0], [1.0, 1.0, 1.0]),
];

/// Points in a projected unit cube. The depth axis is the dataset's third column.
pub fn scatter3d(
    dataset: &Dataset,
    x: &str,
    y: &str,
    category: Option<&str>,
) -> Result<Figure, DispatchError> {
    let z = dataset
        .column_at(2)
        .ok_or(DispatchError::MissingThirdColumn)?;
    let rows = dataset.height();
    let xs = unit_positions(&AxisValues::from_column(dataset, x)?, rows);
    let ys = unit_positions(&AxisValues::from_column(dataset, y)?, rows);
    let zs = unit_positions(&AxisValues::from_column(dataset, &z)?, rows);
    let coloring = Coloring::resolve(dataset, category)?;
    let projection = Projection::default();

    let mut fig = Figure::new(
        ChartKind::Scatter3d,
        format!("3D Scatter: {}, {}, {}", x, y, z),
    )
    .canvas();
    fig.push(Mark::Segments(SegmentsMark {
        name: None,
        segments: CUBE_EDGES
            .iter()
            .map(|(a, b)| [projection.project(*a), projection.project(*b)])
            .collect(),
        color: Rgb::GRID,
        width: 1.0,
    }));

    let mut plotted = false;
    for group in coloring.groups(rows) {
        let points: Vec<[f64; 2]> = group
            .rows
            .iter()
            .filter_map(|&r| Some(projection.project([xs[r]?, ys[r]?, zs[r]?])))
            .collect();
        if points.is_empty() {
            continue;
        }
        plotted = true;
        fig.push(Mark::Points(PointsMark {
            name: group.name,
            points,
            color: group.color,
            radius: Radius::Uniform(3.0),
        }));
    }
    if !plotted {
        return Err(DispatchError::NoPlottableRows);
    }

    for (at, text) in [
        ([0.5, -0.15, 0.0], x),
        ([1.15, 0.5, 0.0], y),
        ([0.0, -0.1, 1.1], z.as_str()),
    ] {
        fig.push(Mark::Label(LabelMark {
            position: projection.project(at),
            text: text.to_string(),
            color: Rgb::TEXT,
        }));
    }
    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::Frame;
    use polars::prelude::*;

    fn measurements() -> Dataset {
        let df = df!(
            "a" => [1.0, 2.0, 3.0, 4.0],
            "b" => [2.0, 4.0, 6.0, 8.0],
            "c" => [4.0, 3.0, 2.0, 1.0],
            "group" => ["x", "y", "x", "y"]
        )
        .unwrap();
        Dataset::new(df, "m.csv")
    }

    fn labels(fig: &Figure) -> Vec<&LabelMark> {
        fig.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Label(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn heatmap_annotates_every_cell() {
        let fig = heatmap(&measurements()).unwrap();
        let cells = fig.marks.iter().filter(|m| matches!(m, Mark::Area(_))).count();
        assert_eq!(cells, 9);

        let text = labels(&fig);
        // Top-left cell is a against itself.
        assert_eq!(text[0].text, "1.00");
        assert_eq!(text[0].position, [0.0, 2.0]);
        assert_eq!(text[2].text, "-1.00");
        assert_eq!(text[2].color, Rgb::WHITE);
        assert_eq!(fig.y_ticks.as_ref().unwrap()[0].label, "a");
    }

    #[test]
    fn heatmap_needs_numeric_columns() {
        let df = df!("t" => ["a", "b"]).unwrap();
        let ds = Dataset::new(df, "t.csv");
        assert_eq!(heatmap(&ds), Err(DispatchError::NoNumericColumns));
    }

    #[test]
    fn radar_closes_the_loop() {
        let fig = radar(&measurements(), "group", "a").unwrap();
        assert_eq!(fig.frame, Frame::Canvas);
        let line = fig
            .marks
            .iter()
            .find_map(|m| match m {
                Mark::Line(l) if l.name.is_some() => Some(l),
                _ => None,
            })
            .unwrap();
        assert_eq!(line.points.len(), 5);
        assert_eq!(line.points.first(), line.points.last());
        // The largest radius touches the outer ring.
        let outer = line.points[3];
        assert!(((outer[0].powi(2) + outer[1].powi(2)).sqrt() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn radar_reads_numeric_angles_as_degrees() {
        let df = df!("deg" => [0.0, 90.0], "v" => [1.0, 1.0]).unwrap();
        let fig = radar(&Dataset::new(df, "d.csv"), "deg", "v").unwrap();
        let Some(Mark::Points(points)) = fig.marks.iter().find(|m| matches!(m, Mark::Points(_)))
        else {
            panic!("expected points");
        };
        assert!((points.points[1][0] - 1.0).abs() < 1e-9);
        assert!(points.points[1][1].abs() < 1e-9);
    }

    #[test]
    fn scatter3d_uses_third_column_as_depth() {
        let fig = scatter3d(&measurements(), "a", "b", Some("group")).unwrap();
        assert_eq!(fig.title, "3D Scatter: a, b, c");
        let names: Vec<String> = fig.legend().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn scatter3d_needs_three_columns() {
        let df = df!("a" => [1.0, 2.0], "b" => [3.0, 4.0]).unwrap();
        let ds = Dataset::new(df, "two.csv");
        assert_eq!(
            scatter3d(&ds, "a", "b", None),
            Err(DispatchError::MissingThirdColumn)
        );
    }
}
