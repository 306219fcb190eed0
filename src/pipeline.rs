//! Pipeline - load, merge, aggregate and map in one pass.

use crate::charts::{
    plot_referendum_map, MapError, MapResult, MapStyle, RenderError, StaticMapRenderer,
};
use crate::config::PipelineConfig;
use crate::data::{
    compute_referendum_result_by_regions, merge_referendum_and_areas,
    merge_regions_and_departments, AggregateError, DataLoader, LoaderError, MergeError,
};
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// One row per region: code, name and the summed vote counts.
    pub region_results: DataFrame,
    pub map: MapResult,
}

/// Run every stage with the configured inputs.
///
/// Optional outputs (results CSV, PNG map) are written only once every stage
/// succeeded. Displaying the map window is left to the caller.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
    let tables = DataLoader::load_data(&config.input)?;

    let regions_and_departments =
        merge_regions_and_departments(&tables.regions, &tables.departments)?;
    let referendum_and_areas =
        merge_referendum_and_areas(&tables.referendum, &regions_and_departments)?;
    let region_results = compute_referendum_result_by_regions(&referendum_and_areas)?;

    let map = plot_referendum_map(&region_results, &config.input)?;

    if let Some(path) = &config.output.results_csv {
        map.write_csv(path)?;
    }
    if let Some(path) = &config.output.map_png {
        StaticMapRenderer::render_png(
            &map,
            path,
            config.output.width,
            config.output.height,
            &MapStyle::default(),
        )?;
    }

    info!(regions = region_results.height(), "pipeline complete");
    Ok(PipelineOutput {
        region_results,
        map,
    })
}
