//! GUI module - interactive map window

mod app;
mod map_view;
mod results_panel;

pub use app::{show_map, MapViewerApp, ViewerError};
pub use map_view::MapView;
pub use results_panel::{ResultsPanel, ResultsPanelAction};
