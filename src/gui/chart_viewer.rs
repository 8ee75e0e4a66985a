//! Chart Viewer Widget
//! Central panel with the two dashboard tabs and their chart cards.

use crate::charts::{ChartData, ChartPlotter};
use crate::dashboard::{DashboardTab, DashboardView};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
/// Plot height of half-width cards (first row of each tab).
const HALF_CARD_HEIGHT: f32 = 300.0;
/// Plot height of full-width cards.
const FULL_CARD_HEIGHT: f32 = 320.0;

/// Tabbed chart display. The first two charts of a tab share a row, the
/// rest span the full width.
pub struct ChartViewer {
    pub view: Option<DashboardView>,
    pub active_tab: DashboardTab,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            view: None,
            active_tab: DashboardTab::Registrants,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    /// Draw tabs, summary and charts of the active tab
    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tab in DashboardTab::ALL {
                ui.selectable_value(
                    &mut self.active_tab,
                    tab,
                    RichText::new(tab.label()).size(15.0),
                );
            }
        });
        ui.separator();

        let Some(view) = &self.view else {
            ui.label(RichText::new("No data loaded").color(Color32::GRAY));
            return;
        };

        ScrollArea::vertical().show(ui, |ui| {
            ui.heading(self.active_tab.heading());
            ui.label(
                RichText::new(format!(
                    "{} of {} rows match the current filters",
                    view.filtered_rows, view.total_rows
                ))
                .size(12.0)
                .color(Color32::GRAY),
            );
            ui.add_space(CHART_SPACING);

            let charts = view.charts(self.active_tab);
            let (row, rest) = charts.split_at(charts.len().min(2));

            ui.columns(2, |columns| {
                for (column, chart) in columns.iter_mut().zip(row) {
                    Self::draw_card(column, chart, HALF_CARD_HEIGHT);
                }
            });

            for chart in rest {
                ui.add_space(CHART_SPACING);
                Self::draw_card(ui, chart, FULL_CARD_HEIGHT);
            }
        });
    }

    fn draw_card(ui: &mut egui::Ui, chart: &ChartData, height: f32) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ChartPlotter::draw_chart(ui, chart, height);
            });
    }
}
