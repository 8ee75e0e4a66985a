//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::data::DataProcessor;
use crate::stats::{total, CategoryCount, DateCount};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};
use std::f64::consts::TAU;

/// Color palette for categories
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(99, 110, 250),  // Blue
    Color32::from_rgb(239, 85, 59),   // Red
    Color32::from_rgb(0, 204, 150),   // Green
    Color32::from_rgb(171, 99, 250),  // Purple
    Color32::from_rgb(255, 161, 90),  // Orange
    Color32::from_rgb(25, 211, 243),  // Cyan
    Color32::from_rgb(255, 102, 146), // Pink
    Color32::from_rgb(182, 232, 128), // Lime
    Color32::from_rgb(255, 151, 255), // Magenta
    Color32::from_rgb(254, 203, 82),  // Yellow
];

/// Segments used to approximate a full circle in pie charts.
const PIE_SEGMENTS: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
    /// Line with a marker on every point.
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSeries {
    Categories(Vec<CategoryCount>),
    Dates(Vec<DateCount>),
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartSeries::Categories(c) => c.is_empty(),
            ChartSeries::Dates(d) => d.is_empty(),
        }
    }
}

/// Data and labels of a single chart card.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub series: ChartSeries,
    /// Extra line shown under the chart.
    pub note: Option<String>,
}

impl ChartData {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ChartKind,
        series: ChartSeries,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            x_label: String::new(),
            y_label: String::new(),
            series,
            note: None,
        }
    }

    pub fn with_axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

/// Pie slices as (start, end) angles in radians, clockwise from 12 o'clock.
pub fn pie_angles(counts: &[CategoryCount]) -> Vec<(f64, f64)> {
    let sum = total(counts) as f64;
    if sum == 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    counts
        .iter()
        .map(|c| {
            let end = start + TAU * c.count as f64 / sum;
            let slice = (start, end);
            start = end;
            slice
        })
        .collect()
}

/// Share of `count` in `sum`, as shown on pie labels.
pub fn percentage(count: usize, sum: usize) -> f64 {
    if sum == 0 {
        0.0
    } else {
        100.0 * count as f64 / sum as f64
    }
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the n-th category.
    pub fn get_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw a chart card: title, plot (or placeholder) and note.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, height: f32) {
        ui.label(RichText::new(&chart.title).size(15.0).strong());
        ui.add_space(4.0);

        if chart.series.is_empty() {
            Self::draw_empty(ui, height);
        } else {
            match (&chart.series, chart.kind) {
                (ChartSeries::Categories(counts), ChartKind::Pie) => {
                    Self::draw_pie_chart(ui, &chart.id, counts, height)
                }
                (ChartSeries::Categories(counts), _) => {
                    Self::draw_bar_chart(ui, chart, counts, height)
                }
                (ChartSeries::Dates(points), _) => Self::draw_line_chart(ui, chart, points, height),
            }
        }

        if let Some(note) = &chart.note {
            ui.label(RichText::new(note).size(11.0).color(Color32::GRAY));
        }
    }

    fn draw_empty(ui: &mut egui::Ui, height: f32) {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data").color(Color32::GRAY));
            });
        });
    }

    /// Pie chart built from filled polygons, one per category.
    pub fn draw_pie_chart(ui: &mut egui::Ui, id: &str, counts: &[CategoryCount], height: f32) {
        let sum = total(counts);
        let angles = pie_angles(counts);

        Plot::new(format!("pie_{}", id))
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (idx, (c, &(start, end))) in counts.iter().zip(angles.iter()).enumerate() {
                    let steps = (((end - start) / TAU) * PIE_SEGMENTS).ceil().max(1.0) as usize;
                    let mut points: Vec<[f64; 2]> = Vec::with_capacity(steps + 2);
                    points.push([0.0, 0.0]);
                    for i in 0..=steps {
                        let angle = start + (end - start) * i as f64 / steps as f64;
                        points.push([angle.sin(), angle.cos()]);
                    }

                    let color = Self::get_color(idx);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(points))
                            .fill_color(color)
                            .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                            .name(format!(
                                "{} ({:.1}%)",
                                c.category,
                                percentage(c.count, sum)
                            )),
                    );
                }
            });
    }

    /// Vertical bar chart, categories in the given order.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        chart: &ChartData,
        counts: &[CategoryCount],
        height: f32,
    ) {
        let labels: Vec<String> = counts.iter().map(|c| c.category.clone()).collect();
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.count as f64)
                    .name(&c.category)
                    .width(0.6)
                    .fill(PALETTE[0])
            })
            .collect();

        Plot::new(format!("bar_{}", chart.id))
            .height(height)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v.fract() != 0.0 || v < 0.0 {
                    return String::new();
                }
                labels.get(v as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(PALETTE[0]));
            });
    }

    /// Line chart over dates with a marker on every point.
    pub fn draw_line_chart(ui: &mut egui::Ui, chart: &ChartData, points: &[DateCount], height: f32) {
        let xy: Vec<[f64; 2]> = points
            .iter()
            .map(|p| {
                [
                    DataProcessor::date_to_days(p.date) as f64,
                    p.count as f64,
                ]
            })
            .collect();

        Plot::new(format!("line_{}", chart.id))
            .height(height)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| {
                let v = mark.value;
                if v.fract() != 0.0 {
                    return String::new();
                }
                DataProcessor::days_to_date(v as i32)
                    .map(|d| d.format("%d %b").to_string())
                    .unwrap_or_default()
            })
            .label_formatter(|_name, value| {
                let date = DataProcessor::days_to_date(value.x.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                format!("{}\n{:.0}", date, value.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .color(PALETTE[0])
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .radius(4.0)
                        .color(PALETTE[0]),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: &[usize]) -> Vec<CategoryCount> {
        values
            .iter()
            .enumerate()
            .map(|(i, &count)| CategoryCount {
                category: format!("c{}", i),
                count,
            })
            .collect()
    }

    #[test]
    fn test_pie_angles_cover_circle() {
        let angles = pie_angles(&counts(&[1, 1, 2]));
        assert_eq!(angles.len(), 3);
        assert_eq!(angles[0].0, 0.0);
        assert!((angles[0].1 - TAU / 4.0).abs() < 1e-9);
        assert!((angles[2].1 - TAU).abs() < 1e-9);
        for pair in angles.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_pie_angles_empty() {
        assert!(pie_angles(&[]).is_empty());
        assert!(pie_angles(&counts(&[0, 0])).is_empty());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(ChartPlotter::get_color(0), ChartPlotter::get_color(PALETTE.len()));
    }
}
