//! Results Panel Widget
//! Left side panel listing regional results, colour legend and export button.

use crate::charts::{ColorScale, MapResult, MISSING_COLOR};
use crate::gui::map_view::to_color32;
use egui::{Color32, RichText, ScrollArea, Sense};

/// Left side panel with the regional results table.
pub struct ResultsPanel {
    /// Region code under the pointer, highlighted on the map.
    pub hovered: Option<String>,
    pub status: String,
}

impl Default for ResultsPanel {
    fn default() -> Self {
        Self {
            hovered: None,
            status: "Ready".to_string(),
        }
    }
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the results panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        map: &MapResult,
        scale: &ColorScale,
    ) -> ResultsPanelAction {
        let mut action = ResultsPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🗳 Referendum Map")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Choice A share of expressed ballots")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Legend =====
        ui.label(RichText::new("🎨 Scale").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{:.1}%", scale.min * 100.0)).size(11.0));
            for step in 0..=10 {
                swatch(ui, to_color32(ColorScale::ramp(step as f64 / 10.0)));
            }
            ui.label(RichText::new(format!("{:.1}%", scale.max * 100.0)).size(11.0));
        });
        ui.horizontal(|ui| {
            swatch(ui, to_color32(MISSING_COLOR));
            ui.label(RichText::new("no expressed ballot").size(11.0).color(Color32::GRAY));
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Results Table =====
        ui.label(RichText::new("📋 Results by Region").size(14.0).strong());
        ui.add_space(5.0);

        let mut hovered = None;
        ScrollArea::vertical().max_height(ui.available_height() - 90.0).show(ui, |ui| {
            egui::Grid::new("results_table")
                .striped(true)
                .min_col_width(40.0)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("");
                    ui.label(RichText::new("Region").strong().size(11.0));
                    ui.label(RichText::new("Registered").strong().size(11.0));
                    ui.label(RichText::new("Choice A").strong().size(11.0));
                    ui.label(RichText::new("Choice B").strong().size(11.0));
                    ui.label(RichText::new("Ratio").strong().size(11.0));
                    ui.end_row();

                    for region in &map.regions {
                        swatch(ui, to_color32(scale.color(region.ratio)));
                        let name_color = if region.geometry.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        };
                        let name =
                            ui.label(RichText::new(&region.name).size(11.0).color(name_color));
                        if name.hovered() {
                            hovered = Some(region.code.clone());
                        }
                        ui.label(RichText::new(region.registered.to_string()).size(11.0));
                        ui.label(RichText::new(region.choice_a.to_string()).size(11.0));
                        ui.label(RichText::new(region.choice_b.to_string()).size(11.0));
                        let ratio = region
                            .ratio
                            .map(|r| format!("{:.1}%", r * 100.0))
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(RichText::new(ratio).size(11.0));
                        ui.end_row();
                    }
                });
        });
        self.hovered = hovered;

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ResultsPanelAction::ExportPng;
            }
        });

        ui.add_space(5.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

fn swatch(ui: &mut egui::Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
}

/// Actions triggered by the results panel
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsPanelAction {
    None,
    ExportPng,
}
