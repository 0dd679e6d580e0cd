//! Stats module - chart statistics

mod calculator;
mod density;

pub use calculator::StatsCalculator;
pub use density::{kde_2d, DensityGrid, Kde1d};
