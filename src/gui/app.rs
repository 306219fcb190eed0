//! Referendum Map Main Application
//! Main window with results panel and map view.

use crate::charts::{MapResult, MapStyle, StaticMapRenderer};
use crate::gui::{MapView, ResultsPanel, ResultsPanelAction};
use egui::SidePanel;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Map window failed: {0}")]
    Eframe(String),
}

/// Main application window.
pub struct MapViewerApp {
    map: MapResult,
    map_view: MapView,
    results_panel: ResultsPanel,
    export_size: (u32, u32),
}

impl MapViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, map: MapResult, export_size: (u32, u32)) -> Self {
        Self {
            map_view: MapView::new(&map),
            map,
            results_panel: ResultsPanel::new(),
            export_size,
        }
    }

    /// Handle PNG export - render the map to the chosen file and open it
    fn handle_export_png(&mut self) {
        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("referendum_map.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let (width, height) = self.export_size;
        let style = MapStyle::default();
        match StaticMapRenderer::render_png(&self.map, &output_path, width, height, &style) {
            Ok(()) => {
                self.results_panel
                    .set_status(&format!("Exported {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    warn!(error = %e, "could not open exported map");
                }
            }
            Err(e) => {
                self.results_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for MapViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Results
        SidePanel::left("results_panel")
            .min_width(380.0)
            .max_width(480.0)
            .show(ctx, |ui| {
                let action = self.results_panel.show(ui, &self.map, self.map_view.scale());

                match action {
                    ResultsPanelAction::ExportPng => self.handle_export_png(),
                    ResultsPanelAction::None => {}
                }
            });

        // Central panel - Map
        egui::CentralPanel::default().show(ctx, |ui| {
            self.map_view
                .show(ui, &self.map, self.results_panel.hovered.as_deref());
        });
    }
}

/// Open the map window and block until it is closed.
pub fn show_map(map: MapResult, export_size: (u32, u32)) -> Result<(), ViewerError> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Referendum Map"),
        ..Default::default()
    };

    info!(regions = map.regions.len(), "opening map window");
    eframe::run_native(
        "Referendum Map",
        options,
        Box::new(move |cc| Ok(Box::new(MapViewerApp::new(cc, map, export_size)))),
    )
    .map_err(|e| ViewerError::Eframe(e.to_string()))
}
