//! Chart builders
//! One construction routine per chart kind, each turning bound columns into a Figure.

mod cartesian;
mod composition;
mod distribution;
mod special;

pub use cartesian::{area, bar, bubble, ecdf, funnel, histogram, line, scatter};
pub use composition::{pie, sunburst, treemap};
pub use distribution::{box_plot, density_contour, strip, violin};
pub use special::{heatmap, radar, scatter3d};

use super::axis::AxisValues;
use super::figure::{Figure, Mark};
use super::DispatchError;
use crate::data::{Dataset, DatasetError};
use std::collections::HashMap;
use std::hash::Hash;

/// Numeric column or a `NonNumericColumn` error naming it.
fn numeric_column(dataset: &Dataset, name: &str) -> Result<Vec<Option<f64>>, DispatchError> {
    dataset.numeric(name).map_err(|e| match e {
        DatasetError::NonNumeric(col) => DispatchError::NonNumericColumn(col),
        other => other.into(),
    })
}

/// Reject figures that ended up without any data marks.
fn finish(fig: Figure) -> Result<Figure, DispatchError> {
    let has_data = fig.marks.iter().any(|m| !matches!(m, Mark::Label(_)));
    if has_data {
        Ok(fig)
    } else {
        Err(DispatchError::NoPlottableRows)
    }
}

/// Sum values per key, keeping keys in first-appearance order.
fn sum_by_key<K: Eq + Hash + Clone>(pairs: impl IntoIterator<Item = (K, f64)>) -> Vec<(K, f64)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut sums: Vec<(K, f64)> = Vec::new();
    for (key, value) in pairs {
        match index.get(&key) {
            Some(&i) => sums[i].1 += value,
            None => {
                index.insert(key.clone(), sums.len());
                sums.push((key, value));
            }
        }
    }
    sums
}

/// Index of `value` in sorted, deduplicated `positions`.
fn slot_index(positions: &[f64], value: f64) -> Option<usize> {
    let i = positions.partition_point(|&p| p < value);
    (positions.get(i) == Some(&value)).then_some(i)
}

/// Sorted distinct axis positions over `rows`.
fn distinct_positions(axis: &AxisValues, rows: impl IntoIterator<Item = usize>) -> Vec<f64> {
    let mut positions: Vec<f64> = rows.into_iter().filter_map(|r| axis.position(r)).collect();
    positions.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    positions.dedup();
    positions
}

/// Width available to one x slot: the smallest gap between neighbours.
fn slot_width(positions: &[f64]) -> f64 {
    let gap = positions
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .fold(f64::INFINITY, f64::min);
    if gap.is_finite() {
        gap
    } else {
        1.0
    }
}

/// Center of member `index` of `count` side-by-side members inside a slot.
fn dodge(center: f64, slot: f64, index: usize, count: usize) -> (f64, f64) {
    let count = count.max(1);
    let member = slot * 0.8 / count as f64;
    let start = center - slot * 0.4;
    (start + member * (index as f64 + 0.5), member)
}

/// `"{kind}: {y} vs {x}"`, with the category appended when one is chosen.
fn title(kind: super::ChartKind, y: &str, x: &str, category: Option<&str>) -> String {
    match category {
        Some(c) => format!("{}: {} vs {} by {}", kind, y, x, c),
        None => format!("{}: {} vs {}", kind, y, x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_keep_first_appearance_order() {
        let sums = sum_by_key(vec![("b", 1.0), ("a", 2.0), ("b", 3.0)]);
        assert_eq!(sums, vec![("b", 4.0), ("a", 2.0)]);
    }

    #[test]
    fn slot_index_finds_exact_positions_only() {
        let positions = [-1.0, 0.0, 2.5, 7.0];
        assert_eq!(slot_index(&positions, 2.5), Some(2));
        assert_eq!(slot_index(&positions, -1.0), Some(0));
        assert_eq!(slot_index(&positions, 3.0), None);
        assert_eq!(slot_index(&positions, f64::NAN), None);
    }

    #[test]
    fn sums_scale_to_many_distinct_keys() {
        let pairs = (0..50_000).map(|i| (format!("k{}", i % 20_000), 1.0));
        let sums = sum_by_key(pairs);
        assert_eq!(sums.len(), 20_000);
        assert_eq!(sums[0], ("k0".to_string(), 3.0));
        assert_eq!(sums[19_999], ("k19999".to_string(), 2.0));
    }

    #[test]
    fn slot_width_uses_smallest_gap() {
        assert_eq!(slot_width(&[0.0, 2.0, 2.5, 10.0]), 0.5);
        assert_eq!(slot_width(&[3.0]), 1.0);
        assert_eq!(slot_width(&[]), 1.0);
    }

    #[test]
    fn dodge_splits_slot_evenly() {
        let (first, width) = dodge(0.0, 1.0, 0, 2);
        let (second, _) = dodge(0.0, 1.0, 1, 2);
        assert!((width - 0.4).abs() < 1e-12);
        assert!((first + 0.2).abs() < 1e-12);
        assert!((second - 0.2).abs() < 1e-12);
    }
}
