//! Part-of-whole charts: pie, treemap and sunburst.

use super::cartesian::format_value;
use super::{finish, numeric_column, sum_by_key};
use crate::charts::figure::{palette, AreaMark, Figure, LabelMark, Mark, Rgb};
use crate::charts::geometry::{polar_point, sector_outline, sector_pieces, squarify, Rect};
use crate::charts::{ChartKind, DispatchError};
use crate::data::Dataset;
use std::f64::consts::TAU;

/// Smallest arc, in radians, that still gets a text label.
const MIN_LABELLED_ARC: f64 = 0.15;
const TREEMAP_BOUNDS: Rect = Rect {
    x: 0.0,
    y: 0.0,
    w: 16.0,
    h: 10.0,
};

fn sort_descending<K>(sums: &mut [(K, f64)]) {
    sums.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
}

/// Per-name totals of `values`, positive totals only, largest first.
fn positive_totals(
    dataset: &Dataset,
    names: &str,
    values: &str,
) -> Result<Vec<(String, f64)>, DispatchError> {
    let amounts = numeric_column(dataset, values)?;
    let labels = dataset.labels(names)?;
    let mut totals = sum_by_key(
        labels
            .into_iter()
            .zip(amounts)
            .filter_map(|(label, amount)| Some((label?, amount?))),
    );
    totals.retain(|(_, total)| *total > 0.0);
    sort_descending(&mut totals);
    Ok(totals)
}

fn sector(name: Option<String>, inner: f64, outer: f64, start: f64, end: f64, fill: Rgb) -> Mark {
    Mark::Area(AreaMark {
        name,
        pieces: sector_pieces(inner, outer, start, end),
        fill,
        opacity: 1.0,
        outline: Some(sector_outline(inner, outer, start, end)),
        outline_color: Rgb::WHITE,
    })
}

pub fn pie(dataset: &Dataset, names: &str, values: &str) -> Result<Figure, DispatchError> {
    let totals = positive_totals(dataset, names, values)?;
    let grand: f64 = totals.iter().map(|(_, v)| v).sum();
    let mut fig = Figure::new(ChartKind::Pie, format!("Pie Chart: {} by {}", values, names)).canvas();

    let mut labels = Vec::new();
    let mut start = 0.0;
    for (i, (name, total)) in totals.into_iter().enumerate() {
        let end = start + total / grand * TAU;
        fig.push(sector(Some(name), 0.0, 1.0, start, end, palette(i)));
        if end - start >= MIN_LABELLED_ARC {
            labels.push(Mark::Label(LabelMark {
                position: polar_point(0.65, (start + end) / 2.0),
                text: format!("{:.1}%", total / grand * 100.0),
                color: Rgb::WHITE,
            }));
        }
        start = end;
    }
    // Labels go last so they draw over every slice.
    fig.marks.extend(labels);
    finish(fig)
}

pub fn treemap(dataset: &Dataset, path: &str, values: &str) -> Result<Figure, DispatchError> {
    let totals = positive_totals(dataset, path, values)?;
    let amounts: Vec<f64> = totals.iter().map(|(_, v)| *v).collect();
    let rects = squarify(&amounts, TREEMAP_BOUNDS);
    let mut fig = Figure::new(ChartKind::TreeMap, format!("TreeMap: {} by {}", values, path)).canvas();

    let mut labels = Vec::new();
    for (i, ((name, total), rect)) in totals.into_iter().zip(rects).enumerate() {
        let mut outline = rect.corners();
        outline.push([rect.x, rect.y]);
        labels.push(Mark::Label(LabelMark {
            position: rect.center(),
            text: format!("{} ({})", name, format_value(total)),
            color: Rgb::WHITE,
        }));
        fig.push(Mark::Area(AreaMark {
            name: Some(name),
            pieces: vec![rect.corners()],
            fill: palette(i),
            opacity: 1.0,
            outline: Some(outline),
            outline_color: Rgb::WHITE,
        }));
    }
    fig.marks.extend(labels);
    finish(fig)
}

/// Inner ring per `parent`; with a `child` column an outer ring splits each parent.
pub fn sunburst(
    dataset: &Dataset,
    parent: &str,
    child: Option<&str>,
    values: &str,
) -> Result<Figure, DispatchError> {
    let title = match child {
        Some(c) => format!("Sunburst Chart: {} by {} / {}", values, parent, c),
        None => format!("Sunburst Chart: {} by {}", values, parent),
    };
    let mut fig = Figure::new(ChartKind::Sunburst, title).canvas();

    let children = match child {
        Some(c) => {
            let amounts = numeric_column(dataset, values)?;
            let outer = dataset.labels(c)?;
            let inner = dataset.labels(parent)?;
            let pairs = inner
                .into_iter()
                .zip(outer)
                .zip(amounts)
                .filter_map(|((p, c), v)| Some(((p?, c?), v?)));
            let mut sums = sum_by_key(pairs);
            sums.retain(|(_, total)| *total > 0.0);
            sort_descending(&mut sums);
            Some(sums)
        }
        None => None,
    };
    // With a child ring each parent spans exactly its drawn children.
    let parents = match &children {
        Some(sums) => {
            let mut totals = sum_by_key(sums.iter().map(|((p, _), v)| (p.clone(), *v)));
            sort_descending(&mut totals);
            totals
        }
        None => positive_totals(dataset, parent, values)?,
    };
    let grand: f64 = parents.iter().map(|(_, v)| v).sum();
    let inner_outer = if children.is_some() { 0.65 } else { 1.0 };

    let mut labels = Vec::new();
    let mut label = |text: &str, radius: f64, start: f64, end: f64| {
        if end - start >= MIN_LABELLED_ARC {
            labels.push(Mark::Label(LabelMark {
                position: polar_point(radius, (start + end) / 2.0),
                text: text.to_string(),
                color: Rgb::WHITE,
            }));
        }
    };

    let mut start = 0.0;
    for (i, (name, total)) in parents.iter().enumerate() {
        let end = start + total / grand * TAU;
        let color = palette(i);
        fig.push(sector(Some(name.clone()), 0.3, inner_outer, start, end, color));
        label(name, (0.3 + inner_outer) / 2.0, start, end);

        if let Some(children) = &children {
            let mut child_start = start;
            let shade = color.lerp(Rgb::WHITE, 0.35);
            for ((_, child_name), amount) in children.iter().filter(|((p, _), _)| p == name) {
                let child_end = child_start + amount / grand * TAU;
                fig.push(sector(None, 0.65, 1.0, child_start, child_end, shade));
                label(child_name, 0.825, child_start, child_end);
                child_start = child_end;
            }
        }
        start = end;
    }
    fig.marks.extend(labels);
    finish(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::Frame;
    use polars::prelude::*;

    fn fruit() -> Dataset {
        let df = df!(
            "fruit" => ["apple", "pear", "apple", "fig", "kiwi"],
            "qty" => [3.0, 2.0, 4.0, 1.0, -1.0],
            "shop" => ["a", "b", "b", "a", "a"]
        )
        .unwrap();
        Dataset::new(df, "fruit.csv")
    }

    fn areas(fig: &Figure) -> Vec<&AreaMark> {
        fig.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Area(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn pie_sums_sorts_and_drops_non_positive() {
        let fig = pie(&fruit(), "fruit", "qty").unwrap();
        assert_eq!(fig.frame, Frame::Canvas);
        let names: Vec<String> = fig.legend().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["apple", "pear", "fig"]);

        let first_label = fig.marks.iter().find_map(|m| match m {
            Mark::Label(l) => Some(l.text.clone()),
            _ => None,
        });
        assert_eq!(first_label.as_deref(), Some("70.0%"));
    }

    #[test]
    fn pie_values_must_be_numeric() {
        assert_eq!(
            pie(&fruit(), "fruit", "shop"),
            Err(DispatchError::NonNumericColumn("shop".into()))
        );
    }

    #[test]
    fn treemap_areas_follow_values() {
        let fig = treemap(&fruit(), "fruit", "qty").unwrap();
        let rects = areas(&fig);
        assert_eq!(rects.len(), 3);
        let first = &rects[0].pieces[0];
        let w = first[1][0] - first[0][0];
        let h = first[2][1] - first[1][1];
        assert!((w * h - 112.0).abs() < 1e-9);
    }

    #[test]
    fn sunburst_nests_children_inside_parents() {
        let fig = sunburst(&fruit(), "fruit", Some("shop"), "qty").unwrap();
        assert_eq!(areas(&fig).len(), 7);
        assert_eq!(fig.legend().len(), 3);
    }

    fn sweep(area: &AreaMark) -> f64 {
        area.pieces.len() as f64 * TAU / 120.0
    }

    #[test]
    fn negative_children_do_not_overflow_the_parent() {
        let df = df!(
            "p" => ["a", "a", "b"],
            "v" => [3.0, -2.0, 1.0],
            "c" => ["x", "y", "z"]
        )
        .unwrap();
        let fig = sunburst(&Dataset::new(df, "mixed.csv"), "p", Some("c"), "v").unwrap();
        let (parents, children): (Vec<&AreaMark>, Vec<&AreaMark>) =
            areas(&fig).into_iter().partition(|a| a.name.is_some());
        assert_eq!(parents.len(), 2);
        assert_eq!(children.len(), 2);
        let parent_sweep: f64 = parents.iter().map(|a| sweep(a)).sum();
        let child_sweep: f64 = children.iter().map(|a| sweep(a)).sum();
        assert!((parent_sweep - TAU).abs() < 0.1);
        assert!((child_sweep - TAU).abs() < 0.1);
        // "a" keeps only x = 3 of the 4 total.
        assert!((sweep(parents[0]) - TAU * 0.75).abs() < 0.1);
    }

    #[test]
    fn sunburst_without_child_is_one_ring() {
        let fig = sunburst(&fruit(), "fruit", None, "qty").unwrap();
        let rings = areas(&fig);
        assert_eq!(rings.len(), 3);
        assert!(rings.iter().all(|a| a.name.is_some()));
    }

    #[test]
    fn nothing_positive_is_an_error() {
        let df = df!("k" => ["a"], "v" => [-2.0]).unwrap();
        let ds = Dataset::new(df, "neg.csv");
        assert_eq!(pie(&ds, "k", "v"), Err(DispatchError::NoPlottableRows));
    }
}
