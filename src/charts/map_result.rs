//! Map Result Module
//! Joins regional results with region outlines and computes the Choice A ratio.

use crate::charts::ColorScale;
use crate::config::InputConfig;
use crate::data::columns::{
    ABSTENTIONS, CHOICE_A, CHOICE_B, CODE, CODE_REG, HAS_GEOMETRY, NAME_REG, NULL, RATIO,
    REGISTERED, VOTE_COLUMNS,
};
use crate::geography::{load_region_geometries, GeometryError, MapProjection, RegionGeometry};
use geo::MultiPolygon;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

const GEOMETRY_INDEX: &str = "geometry_index";

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// One region of the map: aggregated counts, ratio and outline.
#[derive(Debug, Clone)]
pub struct RegionMapEntry {
    pub code: String,
    pub name: String,
    pub registered: i64,
    pub abstentions: i64,
    pub null: i64,
    pub choice_a: i64,
    pub choice_b: i64,
    /// `None` when no ballot was expressed.
    pub ratio: Option<f64>,
    pub geometry: Option<MultiPolygon<f64>>,
}

/// Regional results joined with their geometry.
///
/// `table` holds the result columns plus `ratio` (NaN when undefined) and
/// `has_geometry`; `regions` holds the same rows with their outlines.
#[derive(Debug, Clone)]
pub struct MapResult {
    pub table: DataFrame,
    pub regions: Vec<RegionMapEntry>,
}

/// Load region outlines and join them to the regional results.
pub fn plot_referendum_map(
    referendum_result_by_regions: &DataFrame,
    input: &InputConfig,
) -> Result<MapResult, MapError> {
    let geometries = load_region_geometries(&input.geometry, &input.geometry_code_property)?;
    build_map_result(referendum_result_by_regions, geometries)
}

/// Left join regional results to `geometries` on region code and add `ratio`.
///
/// Every region of the results is kept; regions without an outline get no
/// geometry. Outlines for unknown regions are ignored.
pub fn build_map_result(
    referendum_result_by_regions: &DataFrame,
    geometries: Vec<RegionGeometry>,
) -> Result<MapResult, MapError> {
    let codes: Vec<&str> = geometries.iter().map(|g| g.code.as_str()).collect();
    let indices: Vec<u32> = (0..geometries.len() as u32).collect();
    let geometry_table = DataFrame::new(vec![
        Column::new(CODE.into(), codes),
        Column::new(GEOMETRY_INDEX.into(), indices),
    ])?;

    let ratio = col(CHOICE_A).cast(DataType::Float64)
        / (col(CHOICE_A) + col(CHOICE_B)).cast(DataType::Float64);

    let mut columns = vec![col(CODE_REG), col(NAME_REG)];
    columns.extend(VOTE_COLUMNS.iter().map(|c| col(*c).cast(DataType::Int64)));
    columns.push(ratio.alias(RATIO));
    columns.push(col(GEOMETRY_INDEX).is_not_null().alias(HAS_GEOMETRY));
    columns.push(col(GEOMETRY_INDEX));

    let joined = referendum_result_by_regions
        .clone()
        .lazy()
        .join(
            geometry_table.lazy(),
            [col(CODE_REG)],
            [col(CODE)],
            JoinArgs::new(JoinType::Left),
        )
        .select(columns)
        .sort([CODE_REG], Default::default())
        .collect()?;

    let mut geometries: Vec<Option<MultiPolygon<f64>>> =
        geometries.into_iter().map(|g| Some(g.geometry)).collect();
    let regions = extract_entries(&joined, &mut geometries)?;

    let missing: Vec<&str> = regions
        .iter()
        .filter(|r| r.geometry.is_none())
        .map(|r| r.code.as_str())
        .collect();
    if !missing.is_empty() {
        warn!(regions = ?missing, "regions without geometry");
    }
    info!(regions = regions.len(), "computed Choice A ratio by region");

    Ok(MapResult {
        table: joined.drop(GEOMETRY_INDEX)?,
        regions,
    })
}

fn extract_entries(
    joined: &DataFrame,
    geometries: &mut [Option<MultiPolygon<f64>>],
) -> Result<Vec<RegionMapEntry>, MapError> {
    let codes = joined.column(CODE_REG)?.str()?;
    let names = joined.column(NAME_REG)?.str()?;
    let registered = joined.column(REGISTERED)?.i64()?;
    let abstentions = joined.column(ABSTENTIONS)?.i64()?;
    let null = joined.column(NULL)?.i64()?;
    let choice_a = joined.column(CHOICE_A)?.i64()?;
    let choice_b = joined.column(CHOICE_B)?.i64()?;
    let ratios = joined.column(RATIO)?.f64()?;
    let index = joined.column(GEOMETRY_INDEX)?.u32()?;

    let mut entries = Vec::with_capacity(joined.height());
    for i in 0..joined.height() {
        // Each outline is matched by at most one region, so it can be moved out.
        let geometry = index
            .get(i)
            .and_then(|idx| geometries.get_mut(idx as usize))
            .and_then(Option::take);

        entries.push(RegionMapEntry {
            code: codes.get(i).unwrap_or_default().to_string(),
            name: names.get(i).unwrap_or_default().to_string(),
            registered: registered.get(i).unwrap_or(0),
            abstentions: abstentions.get(i).unwrap_or(0),
            null: null.get(i).unwrap_or(0),
            choice_a: choice_a.get(i).unwrap_or(0),
            choice_b: choice_b.get(i).unwrap_or(0),
            ratio: ratios.get(i).filter(|r| r.is_finite()),
            geometry,
        });
    }

    Ok(entries)
}

impl MapResult {
    /// Colour scale spanning the defined ratios.
    pub fn color_scale(&self) -> ColorScale {
        ColorScale::from_values(self.regions.iter().map(|r| r.ratio))
    }

    /// Projection fitted to every region outline.
    pub fn projection(&self) -> Option<MapProjection> {
        MapProjection::fit(self.regions.iter().filter_map(|r| r.geometry.as_ref()))
    }

    pub fn region(&self, code: &str) -> Option<&RegionMapEntry> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// Write the tabular part (no geometry) as CSV.
    pub fn write_csv(&self, path: &Path) -> Result<(), MapError> {
        let mut file = File::create(path).map_err(|source| MapError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        let mut table = self.table.clone();
        CsvWriter::new(&mut file).finish(&mut table)?;
        info!(path = ?path, "wrote regional results");
        Ok(())
    }
}
