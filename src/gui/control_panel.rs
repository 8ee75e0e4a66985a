//! Control Panel Widget
//! Left side panel with the filter controls, export buttons and status line.

use crate::data::{FilterOptions, FilterSelection};
use egui::{Color32, RichText, ScrollArea};
use std::collections::HashSet;

/// Left side control panel with the two multi-select filters.
pub struct ControlPanel {
    pub options: FilterOptions,
    pub selection: FilterSelection,
    pub status: String,
    pub exports_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            status: "Ready".to_string(),
            exports_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the available options and select all of them.
    pub fn set_options(&mut self, options: FilterOptions) {
        self.selection = FilterSelection::all(&options);
        self.options = options;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.add_space(5.0);
        ui.label(RichText::new("🔎 Filter Data").size(18.0).strong());
        ui.add_space(10.0);

        if multiselect(
            ui,
            "Jenjang Pendidikan",
            &self.options.jenjang,
            &mut self.selection.jenjang,
        ) {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(10.0);

        if multiselect(
            ui,
            "Jenis Kelamin",
            &self.options.gender,
            &mut self.selection.gender,
        ) {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.label(RichText::new("📄 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(self.exports_enabled, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Export PPT").clicked() {
                    action = ControlPanelAction::ExportPpt;
                }
                if ui.button("Export JSON").clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if is_error_status(&self.status) {
            Color32::from_rgb(220, 53, 69)
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

/// Checkbox list over `options`; returns true when the selection changed.
fn multiselect(
    ui: &mut egui::Ui,
    label: &str,
    options: &[String],
    selected: &mut HashSet<String>,
) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label(RichText::new(label).size(14.0).strong());
        ui.label(
            RichText::new(format!("{}/{}", selected.len(), options.len()))
                .size(11.0)
                .color(Color32::GRAY),
        );
    });

    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(5.0)
        .show(ui, |ui| {
            ScrollArea::vertical()
                .id_salt(label)
                .max_height(160.0)
                .show(ui, |ui| {
                    for option in options {
                        let mut checked = selected.contains(option);
                        if ui.checkbox(&mut checked, option.as_str()).changed() {
                            set_selected(selected, option, checked);
                            changed = true;
                        }
                    }
                });
        });

    ui.add_space(5.0);
    ui.horizontal(|ui| {
        if ui.small_button("Select All").clicked() {
            selected.extend(options.iter().cloned());
            changed = true;
        }
        if ui.small_button("Clear All").clicked() {
            selected.clear();
            changed = true;
        }
    });

    changed
}

fn is_error_status(status: &str) -> bool {
    status.to_lowercase().contains("error")
}

fn set_selected(selected: &mut HashSet<String>, option: &str, on: bool) {
    if on {
        selected.insert(option.to_string());
    } else {
        selected.remove(option);
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FiltersChanged,
    ExportPpt,
    ExportJson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_options_selects_everything() {
        let mut panel = ControlPanel::new();
        panel.set_options(FilterOptions {
            jenjang: vec!["S1".to_string(), "S2".to_string()],
            gender: vec!["Perempuan".to_string()],
        });

        assert_eq!(panel.selection.jenjang.len(), 2);
        assert!(panel.selection.gender.contains("Perempuan"));
    }

    #[test]
    fn test_error_status_detection() {
        assert!(is_error_status("Error: Data file not found"));
        assert!(is_error_status("PPT error: disk full"));
        assert!(is_error_status("JSON error: permission denied"));
        assert!(!is_error_status("PPT exported: 2 slides"));
    }

    #[test]
    fn test_set_selected() {
        let mut selected = HashSet::new();
        set_selected(&mut selected, "S1", true);
        set_selected(&mut selected, "S1", true);
        assert_eq!(selected.len(), 1);
        set_selected(&mut selected, "S1", false);
        assert!(selected.is_empty());
    }
}
