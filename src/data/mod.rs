//! Data module - CSV loading and column access

mod dataset;
mod loader;

pub use dataset::{Dataset, DatasetError};
pub use loader::{DataLoader, LoaderError};
