//! Geography module - region outlines and map projection

mod loader;
mod projection;

pub use loader::{
    load_region_geometries, region_geometries_from_geojson, GeometryError, RegionGeometry,
};
pub use projection::MapProjection;
