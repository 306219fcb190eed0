//! Data module - CSV loading, reference joins and regional aggregation

pub mod columns;
mod aggregator;
mod loader;
mod merger;

pub use aggregator::{compute_referendum_result_by_regions, AggregateError};
pub use loader::{DataLoader, LoaderError, ReferendumTables};
pub use merger::{
    merge_referendum_and_areas, merge_regions_and_departments, normalize_department_code,
    MergeError,
};
