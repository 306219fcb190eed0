//! Charts module - regional map result and choropleth rendering

mod colormap;
mod map_result;
mod renderer;

pub use colormap::{ColorScale, MISSING_COLOR};
pub use map_result::{build_map_result, plot_referendum_map, MapError, MapResult, RegionMapEntry};
pub use renderer::{MapStyle, RenderError, StaticMapRenderer};
