//! Chart kinds and requests
//! The closed set of supported charts, and the column bindings each one uses.

use std::fmt;

/// Supported chart types, in the order the selector lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Histogram,
    BoxPlot,
    Scatter,
    Pie,
    Heatmap,
    Violin,
    DensityContour,
    Bubble,
    Funnel,
    Radar,
    TreeMap,
    Sunburst,
    Strip,
    Ecdf,
    Scatter3d,
    Area,
}

impl ChartKind {
    pub const ALL: [ChartKind; 18] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Scatter,
        ChartKind::Pie,
        ChartKind::Heatmap,
        ChartKind::Violin,
        ChartKind::DensityContour,
        ChartKind::Bubble,
        ChartKind::Funnel,
        ChartKind::Radar,
        ChartKind::TreeMap,
        ChartKind::Sunburst,
        ChartKind::Strip,
        ChartKind::Ecdf,
        ChartKind::Scatter3d,
        ChartKind::Area,
    ];

    /// Label shown in the chart type selector.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Violin => "Violin Plot",
            ChartKind::DensityContour => "Density Contour",
            ChartKind::Bubble => "Bubble Chart",
            ChartKind::Funnel => "Funnel Chart",
            ChartKind::Radar => "Radar Chart",
            ChartKind::TreeMap => "TreeMap",
            ChartKind::Sunburst => "Sunburst Chart",
            ChartKind::Strip => "Strip Plot",
            ChartKind::Ecdf => "ECDF",
            ChartKind::Scatter3d => "3D Scatter",
            ChartKind::Area => "Area Chart",
        }
    }

    /// Parse a selector label. Anything outside the closed set is `None`.
    pub fn from_label(label: &str) -> Option<ChartKind> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    pub fn uses_x(self) -> bool {
        !matches!(self, ChartKind::Heatmap)
    }

    pub fn uses_y(self) -> bool {
        !matches!(
            self,
            ChartKind::Heatmap | ChartKind::Histogram | ChartKind::Ecdf
        )
    }

    pub fn uses_category(self) -> bool {
        matches!(
            self,
            ChartKind::Line
                | ChartKind::Bar
                | ChartKind::Histogram
                | ChartKind::BoxPlot
                | ChartKind::Scatter
                | ChartKind::Violin
                | ChartKind::Bubble
                | ChartKind::Sunburst
                | ChartKind::Strip
                | ChartKind::Scatter3d
                | ChartKind::Area
        )
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current state of the selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
    pub category: Option<String>,
}

impl Selection {
    /// Default selection for a freshly loaded column list.
    pub fn for_columns(columns: &[String]) -> Self {
        let first = columns.first().cloned().unwrap_or_default();
        let second = columns.get(1).cloned().unwrap_or_else(|| first.clone());
        Self {
            kind: ChartKind::Line,
            x: first,
            y: second,
            category: None,
        }
    }
}

/// One chart construction, carrying only the columns that chart reads.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartRequest {
    Line { x: String, y: String, category: Option<String> },
    Bar { x: String, y: String, category: Option<String> },
    Histogram { x: String, category: Option<String> },
    BoxPlot { x: String, y: String, category: Option<String> },
    Scatter { x: String, y: String, category: Option<String> },
    Pie { names: String, values: String },
    Heatmap,
    Violin { x: String, y: String, category: Option<String> },
    DensityContour { x: String, y: String },
    /// Marker size follows `y`.
    Bubble { x: String, y: String, category: Option<String> },
    /// `x` holds the bar lengths, `y` the stage names.
    Funnel { x: String, y: String },
    Radar { theta: String, r: String },
    TreeMap { path: String, values: String },
    /// Inner ring by `parent`; outer ring by `child` when one is chosen.
    Sunburst { parent: String, child: Option<String>, values: String },
    Strip { x: String, y: String, category: Option<String> },
    Ecdf { x: String },
    /// The z axis is the dataset's third column by position.
    Scatter3d { x: String, y: String, category: Option<String> },
    Area { x: String, y: String, category: Option<String> },
}

impl ChartRequest {
    /// Bind selector values to the chart's column roles.
    pub fn from_selection(kind: ChartKind, x: &str, y: &str, category: Option<&str>) -> Self {
        let x = x.to_string();
        let y = y.to_string();
        let category = category.map(str::to_string);
        match kind {
            ChartKind::Line => ChartRequest::Line { x, y, category },
            ChartKind::Bar => ChartRequest::Bar { x, y, category },
            ChartKind::Histogram => ChartRequest::Histogram { x, category },
            ChartKind::BoxPlot => ChartRequest::BoxPlot { x, y, category },
            ChartKind::Scatter => ChartRequest::Scatter { x, y, category },
            ChartKind::Pie => ChartRequest::Pie {
                names: x,
                values: y,
            },
            ChartKind::Heatmap => ChartRequest::Heatmap,
            ChartKind::Violin => ChartRequest::Violin { x, y, category },
            ChartKind::DensityContour => ChartRequest::DensityContour { x, y },
            ChartKind::Bubble => ChartRequest::Bubble { x, y, category },
            ChartKind::Funnel => ChartRequest::Funnel { x, y },
            ChartKind::Radar => ChartRequest::Radar { theta: x, r: y },
            ChartKind::TreeMap => ChartRequest::TreeMap {
                path: x,
                values: y,
            },
            ChartKind::Sunburst => ChartRequest::Sunburst {
                parent: x,
                child: category,
                values: y,
            },
            ChartKind::Strip => ChartRequest::Strip { x, y, category },
            ChartKind::Ecdf => ChartRequest::Ecdf { x },
            ChartKind::Scatter3d => ChartRequest::Scatter3d { x, y, category },
            ChartKind::Area => ChartRequest::Area { x, y, category },
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartRequest::Line { .. } => ChartKind::Line,
            ChartRequest::Bar { .. } => ChartKind::Bar,
            ChartRequest::Histogram { .. } => ChartKind::Histogram,
            ChartRequest::BoxPlot { .. } => ChartKind::BoxPlot,
            ChartRequest::Scatter { .. } => ChartKind::Scatter,
            ChartRequest::Pie { .. } => ChartKind::Pie,
            ChartRequest::Heatmap => ChartKind::Heatmap,
            ChartRequest::Violin { .. } => ChartKind::Violin,
            ChartRequest::DensityContour { .. } => ChartKind::DensityContour,
            ChartRequest::Bubble { .. } => ChartKind::Bubble,
            ChartRequest::Funnel { .. } => ChartKind::Funnel,
            ChartRequest::Radar { .. } => ChartKind::Radar,
            ChartRequest::TreeMap { .. } => ChartKind::TreeMap,
            ChartRequest::Sunburst { .. } => ChartKind::Sunburst,
            ChartRequest::Strip { .. } => ChartKind::Strip,
            ChartRequest::Ecdf { .. } => ChartKind::Ecdf,
            ChartRequest::Scatter3d { .. } => ChartKind::Scatter3d,
            ChartRequest::Area { .. } => ChartKind::Area,
        }
    }

    /// Every column name this request reads.
    pub fn columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = Vec::new();
        match self {
            ChartRequest::Line { x, y, category }
            | ChartRequest::Bar { x, y, category }
            | ChartRequest::BoxPlot { x, y, category }
            | ChartRequest::Scatter { x, y, category }
            | ChartRequest::Violin { x, y, category }
            | ChartRequest::Bubble { x, y, category }
            | ChartRequest::Strip { x, y, category }
            | ChartRequest::Scatter3d { x, y, category }
            | ChartRequest::Area { x, y, category } => {
                cols.push(x);
                cols.push(y);
                cols.extend(category.as_deref());
            }
            ChartRequest::Histogram { x, category } => {
                cols.push(x);
                cols.extend(category.as_deref());
            }
            ChartRequest::Pie { names, values } => {
                cols.push(names);
                cols.push(values);
            }
            ChartRequest::Heatmap => {}
            ChartRequest::DensityContour { x, y } | ChartRequest::Funnel { x, y } => {
                cols.push(x);
                cols.push(y);
            }
            ChartRequest::Radar { theta, r } => {
                cols.push(theta);
                cols.push(r);
            }
            ChartRequest::TreeMap { path, values } => {
                cols.push(path);
                cols.push(values);
            }
            ChartRequest::Sunburst {
                parent,
                child,
                values,
            } => {
                cols.push(parent);
                cols.extend(child.as_deref());
                cols.push(values);
            }
            ChartRequest::Ecdf { x } => cols.push(x),
        }
        cols
    }
}
