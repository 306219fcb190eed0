//! Map View Widget
//! Interactive choropleth drawn with egui_plot polygons.

use crate::charts::{ColorScale, MapResult};
use crate::geography::MapProjection;
use egui::{Color32, RichText, Stroke};
use egui_plot::{Plot, PlotPoints, Polygon};

const OUTLINE: Color32 = Color32::from_rgb(60, 60, 60);

pub fn to_color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Central panel showing the regions coloured by ratio.
pub struct MapView {
    projection: Option<MapProjection>,
    scale: ColorScale,
}

impl MapView {
    pub fn new(map: &MapResult) -> Self {
        Self {
            projection: map.projection(),
            scale: map.color_scale(),
        }
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Draw the map; `highlight` outlines one region more thickly.
    pub fn show(&self, ui: &mut egui::Ui, map: &MapResult, highlight: Option<&str>) {
        let Some(projection) = &self.projection else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Geometry").size(20.0));
            });
            return;
        };

        Plot::new("referendum_map")
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_scroll(false)
            .show_x(false)
            .show_y(false)
            .show(ui, |plot_ui| {
                for region in &map.regions {
                    let Some(geometry) = &region.geometry else {
                        continue;
                    };
                    let fill = to_color32(self.scale.color(region.ratio));
                    let stroke = if highlight == Some(region.code.as_str()) {
                        Stroke::new(3.0, Color32::WHITE)
                    } else {
                        Stroke::new(1.0, OUTLINE)
                    };

                    for ring in projection.project_rings(geometry) {
                        let points = PlotPoints::from_iter(ring.into_iter().map(|(x, y)| [x, y]));
                        plot_ui.polygon(
                            Polygon::new(points)
                                .fill_color(fill)
                                .stroke(stroke)
                                .name(&region.name),
                        );
                    }
                }
            });
    }
}
