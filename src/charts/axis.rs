//! Column roles
//! Maps dataset columns onto plot coordinates and color groups.

use super::figure::{palette, Rgb, Tick};
use crate::data::{Dataset, DatasetError};
use std::collections::HashMap;

/// Distinct labels in first-appearance order, with each row's index into them.
pub fn categorize(labels: &[Option<String>]) -> (Vec<String>, Vec<Option<usize>>) {
    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let codes = labels
        .iter()
        .map(|label| {
            let label = label.as_deref()?;
            let idx = *index.entry(label).or_insert_with(|| {
                names.push(label.to_string());
                names.len() - 1
            });
            Some(idx)
        })
        .collect();
    (names, codes)
}

/// Ticks at integer positions for categorical labels.
pub fn category_ticks(names: &[String]) -> Vec<Tick> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Tick {
            position: i as f64,
            label: name.clone(),
        })
        .collect()
}

/// A column placed on a positional axis. Text columns become categories.
#[derive(Debug, Clone)]
pub enum AxisValues {
    Numeric(Vec<Option<f64>>),
    Categorical {
        names: Vec<String>,
        codes: Vec<Option<usize>>,
    },
}

impl AxisValues {
    pub fn from_column(dataset: &Dataset, column: &str) -> Result<Self, DatasetError> {
        if dataset.is_numeric(column) {
            return Ok(AxisValues::Numeric(dataset.numeric(column)?));
        }
        let (names, codes) = categorize(&dataset.labels(column)?);
        Ok(AxisValues::Categorical { names, codes })
    }

    /// Plot coordinate of a row, `None` when the cell is missing.
    pub fn position(&self, row: usize) -> Option<f64> {
        match self {
            AxisValues::Numeric(values) => values.get(row).copied().flatten(),
            AxisValues::Categorical { codes, .. } => {
                codes.get(row).copied().flatten().map(|c| c as f64)
            }
        }
    }

    pub fn ticks(&self) -> Option<Vec<Tick>> {
        match self {
            AxisValues::Numeric(_) => None,
            AxisValues::Categorical { names, .. } => Some(category_ticks(names)),
        }
    }
}

/// Rows sharing one color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    /// Legend entry; `None` when no category column was chosen.
    pub name: Option<String>,
    pub color: Rgb,
    pub rows: Vec<usize>,
}

/// How rows are split into colored series.
#[derive(Debug, Clone, PartialEq)]
pub enum Coloring {
    /// No category chosen: every row in one uncolored series.
    Single,
    /// One series per distinct value of the category column.
    ByColumn {
        names: Vec<String>,
        codes: Vec<Option<usize>>,
    },
}

impl Coloring {
    pub fn resolve(dataset: &Dataset, category: Option<&str>) -> Result<Self, DatasetError> {
        match category {
            None => Ok(Coloring::Single),
            Some(column) => {
                let (names, codes) = categorize(&dataset.labels(column)?);
                Ok(Coloring::ByColumn { names, codes })
            }
        }
    }

    /// Split `0..rows` into color groups. Rows with a missing category are left out.
    pub fn groups(&self, rows: usize) -> Vec<ColorGroup> {
        match self {
            Coloring::Single => vec![ColorGroup {
                name: None,
                color: palette(0),
                rows: (0..rows).collect(),
            }],
            Coloring::ByColumn { names, codes } => {
                let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
                for row in 0..rows {
                    if let Some(idx) = codes.get(row).copied().flatten() {
                        buckets[idx].push(row);
                    }
                }
                names
                    .iter()
                    .zip(buckets)
                    .enumerate()
                    .map(|(idx, (name, rows))| ColorGroup {
                        name: Some(name.clone()),
                        color: palette(idx),
                        rows,
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn dataset() -> Dataset {
        let df = df!(
            "x" => [1.0, 2.0, 3.0, 4.0],
            "kind" => [Some("b"), Some("a"), None, Some("b")]
        )
        .unwrap();
        Dataset::new(df, "t.csv")
    }

    #[test]
    fn categorize_keeps_first_appearance_order() {
        let labels = vec![
            Some("b".to_string()),
            Some("a".to_string()),
            None,
            Some("b".to_string()),
        ];
        let (names, codes) = categorize(&labels);
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(codes, vec![Some(0), Some(1), None, Some(0)]);
    }

    #[test]
    fn high_cardinality_groups_partition_rows() {
        let labels: Vec<Option<String>> = (0..30_000)
            .map(|i| (i % 7 != 0).then(|| format!("id{}", i % 10_000)))
            .collect();
        let (names, codes) = categorize(&labels);
        assert_eq!(names[0], "id1");
        let coloring = Coloring::ByColumn { names, codes };
        let groups = coloring.groups(labels.len());
        let grouped: usize = groups.iter().map(|g| g.rows.len()).sum();
        assert_eq!(grouped, labels.iter().filter(|l| l.is_some()).count());
        assert!(groups.iter().all(|g| g.rows.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn text_axis_becomes_categorical() {
        let ds = dataset();
        let axis = AxisValues::from_column(&ds, "kind").unwrap();
        assert!(matches!(axis, AxisValues::Categorical { .. }));
        assert_eq!(axis.position(1), Some(1.0));
        assert_eq!(axis.position(2), None);
        assert_eq!(axis.ticks().unwrap()[0].label, "b");

        let numeric = AxisValues::from_column(&ds, "x").unwrap();
        assert_eq!(numeric.position(3), Some(4.0));
        assert!(numeric.ticks().is_none());
    }

    #[test]
    fn no_category_is_one_unnamed_group() {
        let ds = dataset();
        let coloring = Coloring::resolve(&ds, None).unwrap();
        assert_eq!(coloring, Coloring::Single);
        let groups = coloring.groups(ds.height());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, None);
        assert_eq!(groups[0].rows, vec![0, 1, 2, 3]);
    }

    #[test]
    fn category_splits_rows_and_skips_missing() {
        let ds = dataset();
        let coloring = Coloring::resolve(&ds, Some("kind")).unwrap();
        let groups = coloring.groups(ds.height());
        assert_eq!(groups[0].name.as_deref(), Some("b"));
        assert_eq!(groups[0].rows, vec![0, 3]);
        assert_eq!(groups[1].rows, vec![1]);
        assert_ne!(groups[0].color, groups[1].color);
    }
}
