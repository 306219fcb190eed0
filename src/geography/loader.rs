//! Region geometry loading from GeoJSON.

use geo::MultiPolygon;
use geojson::GeoJson;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Failed to open GeoJSON file {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
    #[error("GeoJSON must be a FeatureCollection")]
    NotACollection,
    #[error("Failed to convert geometry of region '{code}': {message}")]
    Conversion { code: String, message: String },
}

/// A region outline keyed by region code.
#[derive(Debug, Clone)]
pub struct RegionGeometry {
    pub code: String,
    pub geometry: MultiPolygon<f64>,
}

/// Load region outlines from a GeoJSON file.
///
/// `code_property` names the feature property holding the region code; it may
/// be a JSON string or number. Features without a code or without a
/// (multi)polygon are skipped. When a code appears twice the first feature wins.
pub fn load_region_geometries(
    path: &Path,
    code_property: &str,
) -> Result<Vec<RegionGeometry>, GeometryError> {
    let file = File::open(path).map_err(|source| GeometryError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson = GeoJson::from_reader(BufReader::new(file)).map_err(geojson::Error::from)?;

    let regions = region_geometries_from_geojson(geojson, code_property)?;
    info!(regions = regions.len(), path = ?path, "loaded region geometries");
    Ok(regions)
}

pub fn region_geometries_from_geojson(
    geojson: GeoJson,
    code_property: &str,
) -> Result<Vec<RegionGeometry>, GeometryError> {
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(GeometryError::NotACollection),
    };

    let mut seen = HashSet::new();
    let mut regions = Vec::new();
    let mut skipped = 0usize;

    for feature in collection.features {
        let code = match feature
            .properties
            .as_ref()
            .and_then(|props| props.get(code_property))
        {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };
        let converted: geo::Geometry<f64> =
            geometry
                .value
                .try_into()
                .map_err(|e: geojson::Error| GeometryError::Conversion {
                    code: code.clone(),
                    message: e.to_string(),
                })?;

        let geometry = match converted {
            geo::Geometry::MultiPolygon(mp) => mp,
            geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
            _ => {
                skipped += 1;
                continue;
            }
        };

        if !seen.insert(code.clone()) {
            warn!(code = %code, "duplicate region geometry ignored");
            continue;
        }

        regions.push(RegionGeometry { code, geometry });
    }

    if skipped > 0 {
        warn!(
            skipped,
            code_property,
            "features without a region code or polygon geometry skipped"
        );
    }
    Ok(regions)
}
