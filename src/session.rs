//! Session state
//! The loaded dataset, the selector values and the last output of one user session.
//! Kept free of UI types so the trigger rules can be tested directly.

use crate::charts::{ChartDispatcher, Figure, Selection};
use crate::data::{DataLoader, Dataset, LoaderError};
use std::path::Path;

/// Shown while no dataset is loaded.
pub const UPLOAD_PROMPT: &str = "Please upload a dataset to proceed.";

/// What the chart area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// No dataset yet: the upload prompt.
    Prompt,
    /// Dataset loaded, nothing rendered since.
    Idle,
    Chart(Figure),
    Error(String),
}

pub struct Session {
    loader: DataLoader,
    dataset: Option<Dataset>,
    selection: Option<Selection>,
    output: Output,
}

impl Session {
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader,
            dataset: None,
            selection: None,
            output: Output::Prompt,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Selector values to edit. Editing never re-renders.
    pub fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Last rendered figure, if the output is a chart.
    pub fn figure(&self) -> Option<&Figure> {
        match &self.output {
            Output::Chart(fig) => Some(fig),
            _ => None,
        }
    }

    /// Load an optional upload. `Ok(false)` means nothing was supplied and
    /// the session is unchanged.
    pub fn load_path(&mut self, path: Option<&Path>) -> Result<bool, LoaderError> {
        match self.loader.load(path).transpose() {
            None => {
                log::debug!("No file supplied");
                Ok(false)
            }
            Some(result) => self.install(result).map(|()| true),
        }
    }

    pub fn load_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<bool, LoaderError> {
        let result = self.loader.load_csv_bytes(name, bytes);
        self.install(result).map(|()| true)
    }

    /// Replace the dataset and reset selectors, or report the load failure.
    /// A failed load keeps the previous dataset.
    fn install(&mut self, result: Result<Dataset, LoaderError>) -> Result<(), LoaderError> {
        match result {
            Ok(dataset) => {
                self.selection = Some(Selection::for_columns(&dataset.column_names()));
                self.dataset = Some(dataset);
                self.output = Output::Idle;
                Ok(())
            }
            Err(e) => {
                log::error!("Load failed: {}", e);
                self.output = Output::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Render the current selection. The only path into the dispatcher.
    pub fn trigger(&mut self) -> &Output {
        let (Some(dataset), Some(selection)) = (&self.dataset, &self.selection) else {
            self.output = Output::Prompt;
            return &self.output;
        };
        let rendered = ChartDispatcher::render_label(
            dataset,
            selection.kind.label(),
            &selection.x,
            &selection.y,
            selection.category.as_deref(),
        );
        self.output = match rendered {
            Ok(fig) => Output::Chart(fig),
            Err(e) => Output::Error(e.to_string()),
        };
        &self.output
    }
}
