//! Dataset handle
//! Read-only view over a loaded DataFrame with the column accessors the charts need.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),
    #[error("Column '{0}' is not numeric")]
    NonNumeric(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Check whether a dtype holds plain numbers.
fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// In-memory tabular dataset for one session. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    source: String,
}

impl Dataset {
    pub fn new(df: DataFrame, source: impl Into<String>) -> Self {
        Self {
            df,
            source: source.into(),
        }
    }

    /// Name of the file the data came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0 || self.df.width() == 0
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Column name at a position, counting from zero.
    pub fn column_at(&self, index: usize) -> Option<String> {
        self.df
            .get_columns()
            .get(index)
            .map(|col| col.name().to_string())
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.df
            .column(name)
            .map(|col| is_numeric_dtype(col.dtype()))
            .unwrap_or(false)
    }

    /// Names of all numeric columns, in file order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    fn column(&self, name: &str) -> Result<&Column, DatasetError> {
        self.df
            .column(name)
            .map_err(|_| DatasetError::UnknownColumn(name.to_string()))
    }

    /// Values of a numeric column as f64. Nulls and non-finite values become `None`.
    pub fn numeric(&self, name: &str) -> Result<Vec<Option<f64>>, DatasetError> {
        let col = self.column(name)?;
        if !is_numeric_dtype(col.dtype()) {
            return Err(DatasetError::NonNumeric(name.to_string()));
        }
        let values = col.cast(&DataType::Float64)?;
        let values = values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Ok(values)
    }

    /// Values of any column rendered as text. Nulls become `None`.
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>, DatasetError> {
        let col = self.column(name)?;
        let text = col.cast(&DataType::String)?;
        let labels = text
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(labels)
    }

    /// First `n` rows as display strings, one inner vector per row.
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        let head = self.df.head(Some(n));
        (0..head.height())
            .map(|row| {
                head.get_columns()
                    .iter()
                    .map(|col| match col.get(row) {
                        Ok(AnyValue::Null) | Err(_) => String::new(),
                        Ok(val) => val.to_string().trim_matches('"').to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let df = df!(
            "city" => ["Oslo", "Lima", "Pune"],
            "temp" => [Some(3.5), None, Some(31.0)],
            "rank" => [1i64, 2, 3]
        )
        .unwrap();
        Dataset::new(df, "sample.csv")
    }

    #[test]
    fn reports_shape_and_names() {
        let ds = sample();
        assert_eq!(ds.height(), 3);
        assert_eq!(ds.width(), 3);
        assert_eq!(ds.column_names(), vec!["city", "temp", "rank"]);
        assert_eq!(ds.column_at(2).as_deref(), Some("rank"));
        assert_eq!(ds.column_at(3), None);
        assert!(ds.has_column("temp"));
        assert!(!ds.has_column("humidity"));
    }

    #[test]
    fn numeric_columns_skip_text() {
        let ds = sample();
        assert_eq!(ds.numeric_columns(), vec!["temp", "rank"]);
        assert!(ds.is_numeric("rank"));
        assert!(!ds.is_numeric("city"));
    }

    #[test]
    fn numeric_values_keep_nulls_as_none() {
        let ds = sample();
        assert_eq!(ds.numeric("temp").unwrap(), vec![Some(3.5), None, Some(31.0)]);
        assert_eq!(ds.numeric("rank").unwrap(), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn numeric_rejects_text_and_unknown_columns() {
        let ds = sample();
        assert!(matches!(ds.numeric("city"), Err(DatasetError::NonNumeric(_))));
        assert!(matches!(
            ds.numeric("nope"),
            Err(DatasetError::UnknownColumn(_))
        ));
    }

    #[test]
    fn labels_render_any_column_as_text() {
        let ds = sample();
        assert_eq!(
            ds.labels("city").unwrap(),
            vec![Some("Oslo".to_string()), Some("Lima".to_string()), Some("Pune".to_string())]
        );
        assert_eq!(ds.labels("rank").unwrap()[1].as_deref(), Some("2"));
    }

    #[test]
    fn preview_limits_rows() {
        let ds = sample();
        let rows = ds.preview(2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Oslo");
        assert_eq!(rows[1][1], "");
    }
}
