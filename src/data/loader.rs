//! CSV Data Loader Module
//! Turns a user-supplied CSV file into a Dataset using Polars.

use super::Dataset;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file has no columns")]
    NoColumns,
}

/// Parses delimited text into a Dataset.
pub struct DataLoader {
    infer_schema_rows: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl DataLoader {
    pub fn new(infer_schema_rows: usize) -> Self {
        Self { infer_schema_rows }
    }

    /// Load an optional upload. `Ok(None)` means nothing was supplied.
    pub fn load(&self, file_path: Option<&Path>) -> Result<Option<Dataset>, LoaderError> {
        match file_path {
            Some(path) => self.load_csv(path).map(Some),
            None => Ok(None),
        }
    }

    /// Load a CSV file from disk.
    pub fn load_csv(&self, file_path: &Path) -> Result<Dataset, LoaderError> {
        let bytes = std::fs::read(file_path)?;
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());
        self.load_csv_bytes(&name, bytes)
    }

    /// Parse CSV content that is already in memory (drag-and-drop, tests).
    pub fn load_csv_bytes(&self, name: &str, bytes: Vec<u8>) -> Result<Dataset, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_rows))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        if df.width() == 0 {
            return Err(LoaderError::NoColumns);
        }

        log::info!(
            "loaded '{}': {} rows, {} columns",
            name,
            df.height(),
            df.width()
        );
        Ok(Dataset::new(df, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn absent_file_is_no_dataset() {
        let loader = DataLoader::default();
        assert!(loader.load(None).unwrap().is_none());
    }

    #[test]
    fn loads_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,score,group").unwrap();
        writeln!(file, "ann,1.5,a").unwrap();
        writeln!(file, "bob,2.5,b").unwrap();

        let ds = DataLoader::default()
            .load(Some(file.path()))
            .unwrap()
            .expect("dataset");
        assert_eq!(ds.column_names(), vec!["name", "score", "group"]);
        assert_eq!(ds.height(), 2);
        assert!(ds.is_numeric("score"));
        assert!(ds.source().ends_with(".csv"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DataLoader::default().load(Some(&dir.path().join("gone.csv")));
        assert!(matches!(result, Err(LoaderError::Io(_))));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result =
            DataLoader::default().load_csv_bytes("bad.csv", b"a,b\n1,2\n3,4,5,6\n".to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = DataLoader::default().load_csv_bytes("empty.csv", Vec::new());
        assert!(result.is_err());
    }
}
