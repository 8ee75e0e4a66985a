//! Dashboard Main Application
//! Main window with the filter panel and the chart viewer.

use crate::config::DashboardConfig;
use crate::dashboard::render;
use crate::data::{DataLoader, FilterOptions};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::ppt::PptGenerator;
use egui::{Color32, RichText, SidePanel};
use log::{error, info};
use polars::prelude::*;
use std::sync::Arc;

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    table: Option<Arc<DataFrame>>,
    /// Set when the source could not be loaded; nothing else is shown then.
    load_error: Option<String>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            config,
            table: None,
            load_error: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.load();
        app
    }

    /// Load the source file and run the first pass with every value selected.
    fn load(&mut self) {
        match DataLoader::load_from(&self.config.source_path) {
            Ok(table) => {
                self.control_panel
                    .set_options(FilterOptions::from_table(&table));
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    table.height(),
                    table.width()
                ));
                self.table = Some(table);
                self.recompute();
            }
            Err(e) => {
                error!("{}", e);
                self.load_error = Some(e.to_string());
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Full filter -> aggregate pass for the current selection.
    fn recompute(&mut self) {
        let Some(table) = &self.table else {
            return;
        };

        match render(table, &self.control_panel.selection, &self.config) {
            Ok(view) => {
                self.chart_viewer.set_view(view);
                self.control_panel.exports_enabled = true;
            }
            Err(e) => {
                error!("Recomputation failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
                self.control_panel.exports_enabled = false;
            }
        }
    }

    /// Handle PPT export - render charts to memory and write the report
    fn handle_export_ppt(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PowerPoint", &["pptx"])
            .set_file_name("giknowledge_dashboard.pptx")
            .save_file()
        else {
            return;
        };

        match PptGenerator::export_dashboard(view, &self.config, &output_path) {
            Ok(slides) => {
                self.control_panel
                    .set_status(&format!("PPT exported: {} slides", slides));
                if let Err(e) = open::that(&output_path) {
                    info!("Could not open {}: {}", output_path.display(), e);
                }
            }
            Err(e) => {
                error!("PPT export failed: {:#}", e);
                self.control_panel.set_status(&format!("PPT error: {}", e));
            }
        }
    }

    fn handle_export_json(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("giknowledge_dashboard.json")
            .save_file()
        else {
            return;
        };

        match view.export_json(&output_path) {
            Ok(()) => {
                info!("JSON exported: {}", output_path.display());
                self.control_panel
                    .set_status(&format!("JSON exported: {}", output_path.display()));
            }
            Err(e) => {
                error!("JSON export failed: {:#}", e);
                self.control_panel.set_status(&format!("JSON error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - filters
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::FiltersChanged => self.recompute(),
                        ControlPanelAction::ExportPpt => self.handle_export_ppt(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - title and charts
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(RichText::new(&self.config.title).size(26.0).strong());
            ui.label(RichText::new(&self.config.caption).color(Color32::GRAY));
            ui.add_space(10.0);

            if let Some(error) = &self.load_error {
                ui.label(
                    RichText::new(format!("⚠ {}", error))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                return;
            }

            self.chart_viewer.show(ui);
        });
    }
}
