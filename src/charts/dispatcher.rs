//! Chart Dispatcher
//! Maps a chart request onto its construction routine.

use super::builders;
use super::figure::Figure;
use super::kind::{ChartKind, ChartRequest};
use crate::data::{Dataset, DatasetError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Label outside the supported set; carries the rejected label.
    #[error("Invalid Graph Type")]
    InvalidGraphType(String),
    #[error("The dataset has no rows to plot")]
    EmptyDataset,
    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),
    #[error("Column '{0}' must be numeric for this chart")]
    NonNumericColumn(String),
    #[error("3D Scatter needs a third column in the dataset")]
    MissingThirdColumn,
    #[error("Heatmap needs at least one numeric column")]
    NoNumericColumns,
    #[error("No rows with values to plot")]
    NoPlottableRows,
    #[error("Data error: {0}")]
    Data(String),
}

impl From<DatasetError> for DispatchError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::UnknownColumn(col) => DispatchError::UnknownColumn(col),
            DatasetError::NonNumeric(col) => DispatchError::NonNumericColumn(col),
            DatasetError::Polars(e) => DispatchError::Data(e.to_string()),
        }
    }
}

pub struct ChartDispatcher;

impl ChartDispatcher {
    /// Build the figure for `request`. Fails without side effects.
    pub fn render(dataset: &Dataset, request: &ChartRequest) -> Result<Figure, DispatchError> {
        let kind = request.kind();
        if dataset.is_empty() {
            log::warn!("{}: dataset '{}' is empty", kind, dataset.source());
            return Err(DispatchError::EmptyDataset);
        }
        if let Some(missing) = request.columns().into_iter().find(|c| !dataset.has_column(c)) {
            log::warn!("{}: unknown column '{}'", kind, missing);
            return Err(DispatchError::UnknownColumn(missing.to_string()));
        }

        log::info!("Rendering {} from '{}'", kind, dataset.source());
        let result = match request {
            ChartRequest::Line { x, y, category } => {
                builders::line(dataset, x, y, category.as_deref())
            }
            ChartRequest::Bar { x, y, category } => builders::bar(dataset, x, y, category.as_deref()),
            ChartRequest::Histogram { x, category } => {
                builders::histogram(dataset, x, category.as_deref())
            }
            ChartRequest::BoxPlot { x, y, category } => {
                builders::box_plot(dataset, x, y, category.as_deref())
            }
            ChartRequest::Scatter { x, y, category } => {
                builders::scatter(dataset, x, y, category.as_deref())
            }
            ChartRequest::Pie { names, values } => builders::pie(dataset, names, values),
            ChartRequest::Heatmap => builders::heatmap(dataset),
            ChartRequest::Violin { x, y, category } => {
                builders::violin(dataset, x, y, category.as_deref())
            }
            ChartRequest::DensityContour { x, y } => builders::density_contour(dataset, x, y),
            ChartRequest::Bubble { x, y, category } => {
                builders::bubble(dataset, x, y, category.as_deref())
            }
            ChartRequest::Funnel { x, y } => builders::funnel(dataset, x, y),
            ChartRequest::Radar { theta, r } => builders::radar(dataset, theta, r),
            ChartRequest::TreeMap { path, values } => builders::treemap(dataset, path, values),
            ChartRequest::Sunburst {
                parent,
                child,
                values,
            } => builders::sunburst(dataset, parent, child.as_deref(), values),
            ChartRequest::Strip { x, y, category } => {
                builders::strip(dataset, x, y, category.as_deref())
            }
            ChartRequest::Ecdf { x } => builders::ecdf(dataset, x),
            ChartRequest::Scatter3d { x, y, category } => {
                builders::scatter3d(dataset, x, y, category.as_deref())
            }
            ChartRequest::Area { x, y, category } => {
                builders::area(dataset, x, y, category.as_deref())
            }
        };

        match &result {
            Ok(fig) => log::debug!("{}: {} marks", kind, fig.marks.len()),
            Err(e) => log::warn!("{} failed: {}", kind, e),
        }
        result
    }

    /// Resolve a display label and the raw selector values, then render.
    pub fn render_label(
        dataset: &Dataset,
        label: &str,
        x: &str,
        y: &str,
        category: Option<&str>,
    ) -> Result<Figure, DispatchError> {
        let Some(kind) = ChartKind::from_label(label) else {
            log::warn!("Unsupported chart label '{}'", label);
            return Err(DispatchError::InvalidGraphType(label.to_string()));
        };
        Self::render(dataset, &ChartRequest::from_selection(kind, x, y, category))
    }
}
