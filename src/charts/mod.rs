//! Charts module - chart selection, construction and rendering

mod axis;
mod builders;
mod dispatcher;
pub mod figure;
mod geometry;
mod kind;
mod plotter;
mod renderer;

pub use dispatcher::{ChartDispatcher, DispatchError};
pub use figure::Figure;
pub use kind::{ChartKind, Selection};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
