//! Referendum Map - regional referendum results & choropleth rendering
//!
//! Loads referendum results with region/department reference tables, joins
//! them, aggregates vote counts by region and draws the share of "Choice A"
//! among expressed ballots on a map.

pub mod charts;
pub mod config;
pub mod data;
pub mod geography;
pub mod gui;
pub mod pipeline;

pub use config::PipelineConfig;
pub use pipeline::{run, PipelineError, PipelineOutput};
