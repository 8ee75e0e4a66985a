//! Dashboard pipeline
//! One pass from the loaded table and the current filter selection to
//! everything the two dashboard tabs display.

use crate::charts::{ChartData, ChartKind, ChartSeries};
use crate::config::DashboardConfig;
use crate::data::{
    filter_rows, DataProcessor, FilterSelection, ProcessorError, COL_EDUCATION, COL_GENDER,
    COL_INSTITUTION, COL_REGISTRATION_DATE,
};
use crate::stats::{Aggregator, CategoryCount, DateCount};
use anyhow::Context;
use log::debug;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

/// The two tabs of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DashboardTab {
    Registrants,
    Participants,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 2] = [DashboardTab::Registrants, DashboardTab::Participants];

    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::Registrants => "📥 Dashboard Pendaftar",
            DashboardTab::Participants => "👥 Dashboard Peserta",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            DashboardTab::Registrants => "📥 Dashboard Data Pendaftar",
            DashboardTab::Participants => "👥 Dashboard Data Peserta",
        }
    }
}

/// Aggregates behind the "Pendaftar" tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrantsView {
    pub gender: Vec<CategoryCount>,
    pub education: Vec<CategoryCount>,
    pub top_institutions: Vec<CategoryCount>,
    pub daily_registrations: Vec<DateCount>,
    /// Filtered rows left out of `daily_registrations` for lack of a date.
    pub undated: usize,
}

/// Aggregates behind the "Peserta" tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParticipantsView {
    pub gender: Vec<CategoryCount>,
    pub education: Vec<CategoryCount>,
    pub top_institutions: Vec<CategoryCount>,
}

/// Everything one recomputation pass produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub top_n: usize,
    pub registrants: RegistrantsView,
    pub participants: ParticipantsView,
}

/// Preprocess, filter and aggregate `table` for the current selection.
///
/// Nothing is carried over from earlier passes.
pub fn render(
    table: &DataFrame,
    selection: &FilterSelection,
    config: &DashboardConfig,
) -> Result<DashboardView, ProcessorError> {
    let normalized = DataProcessor::normalize(table)?;
    let view = filter_rows(&normalized, selection)?;

    debug!(
        "Recomputed dashboard: {} jenjang / {} gender selected, {} of {} rows",
        selection.jenjang.len(),
        selection.gender.len(),
        view.height(),
        normalized.height()
    );

    let registrants = RegistrantsView {
        gender: Aggregator::count_by_category(&view, COL_GENDER),
        education: Aggregator::count_by_category_ranked(&view, COL_EDUCATION),
        top_institutions: Aggregator::top_n(&view, COL_INSTITUTION, config.top_n),
        daily_registrations: Aggregator::count_by_date(&view, COL_REGISTRATION_DATE),
        undated: Aggregator::count_missing(&view, COL_REGISTRATION_DATE),
    };

    let participants = ParticipantsView {
        gender: registrants.gender.clone(),
        education: registrants.education.clone(),
        top_institutions: registrants.top_institutions.clone(),
    };

    Ok(DashboardView {
        total_rows: normalized.height(),
        filtered_rows: view.height(),
        top_n: config.top_n,
        registrants,
        participants,
    })
}

impl DashboardView {
    /// Charts of one tab, in display order.
    pub fn charts(&self, tab: DashboardTab) -> Vec<ChartData> {
        match tab {
            DashboardTab::Registrants => {
                let r = &self.registrants;
                let undated_note = (r.undated > 0).then(|| {
                    format!("{} pendaftar tanpa tanggal tidak ditampilkan", r.undated)
                });
                vec![
                    ChartData::new(
                        "pendaftar_gender",
                        "Distribusi Jenis Kelamin Pendaftar",
                        ChartKind::Pie,
                        ChartSeries::Categories(r.gender.clone()),
                    ),
                    ChartData::new(
                        "pendaftar_jenjang",
                        "Jenjang Pendidikan Pendaftar",
                        ChartKind::Bar,
                        ChartSeries::Categories(r.education.clone()),
                    )
                    .with_axes("Jenjang", "Jumlah"),
                    ChartData::new(
                        "pendaftar_univ",
                        format!("Top {} Asal Universitas Pendaftar", self.top_n),
                        ChartKind::Bar,
                        ChartSeries::Categories(r.top_institutions.clone()),
                    )
                    .with_axes("Universitas", "Jumlah"),
                    ChartData::new(
                        "pendaftar_trend",
                        "Kapan Waktu Pendaftaran Paling Ramai?",
                        ChartKind::Line,
                        ChartSeries::Dates(r.daily_registrations.clone()),
                    )
                    .with_axes("Tanggal Pendaftaran", "Jumlah Pendaftar")
                    .with_note(undated_note),
                ]
            }
            DashboardTab::Participants => {
                let p = &self.participants;
                vec![
                    ChartData::new(
                        "peserta_gender",
                        "Distribusi Jenis Kelamin Peserta",
                        ChartKind::Pie,
                        ChartSeries::Categories(p.gender.clone()),
                    ),
                    ChartData::new(
                        "peserta_jenjang",
                        "Jenjang Pendidikan Peserta",
                        ChartKind::Bar,
                        ChartSeries::Categories(p.education.clone()),
                    )
                    .with_axes("Jenjang", "Jumlah"),
                    ChartData::new(
                        "peserta_univ",
                        "Asal Universitas Peserta",
                        ChartKind::Bar,
                        ChartSeries::Categories(p.top_institutions.clone()),
                    )
                    .with_axes("Universitas", "Jumlah"),
                ]
            }
        }
    }

    /// Pretty-printed JSON snapshot of the view.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn export_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json().context("Failed to serialize dashboard")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FilterOptions, COL_TIMESTAMP};

    fn table() -> DataFrame {
        df! {
            COL_TIMESTAMP => [
                Some("2025-01-15 10:00:00"),
                Some("2025-01-15 12:00:00"),
                Some("not-a-date"),
                Some("2025-01-16 09:30:00"),
            ],
            COL_GENDER => [Some("F"), Some("F"), Some("M"), Some("M")],
            COL_EDUCATION => [Some("S1"), Some("S2"), Some("S1"), None],
            COL_INSTITUTION => [Some("UI"), Some("ITB"), Some("UI"), Some("UGM")],
        }
        .unwrap()
    }

    #[test]
    fn test_render_full_selection() {
        let df = table();
        let selection = FilterSelection::all(&FilterOptions::from_table(&df));
        let view = render(&df, &selection, &DashboardConfig::default()).unwrap();

        assert_eq!(view.total_rows, 4);
        // the row without a jenjang never matches
        assert_eq!(view.filtered_rows, 3);
        assert_eq!(view.registrants.education[0].category, "S1");
        assert_eq!(view.registrants.education[0].count, 2);
        assert_eq!(view.registrants.undated, 1);
        assert_eq!(view.registrants.daily_registrations.len(), 1);
        assert_eq!(view.registrants.daily_registrations[0].count, 2);
        assert_eq!(view.participants.top_institutions, view.registrants.top_institutions);
    }

    #[test]
    fn test_render_empty_selection() {
        let df = table();
        let view = render(&df, &FilterSelection::default(), &DashboardConfig::default()).unwrap();

        assert_eq!(view.filtered_rows, 0);
        assert!(view.registrants.gender.is_empty());
        assert!(view.registrants.education.is_empty());
        assert!(view.registrants.top_institutions.is_empty());
        assert!(view.registrants.daily_registrations.is_empty());
        assert_eq!(view.registrants.undated, 0);
    }

    #[test]
    fn test_chart_layout_per_tab() {
        let df = table();
        let selection = FilterSelection::all(&FilterOptions::from_table(&df));
        let view = render(&df, &selection, &DashboardConfig::default()).unwrap();

        let registrants = view.charts(DashboardTab::Registrants);
        let kinds: Vec<ChartKind> = registrants.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ChartKind::Pie, ChartKind::Bar, ChartKind::Bar, ChartKind::Line]
        );
        assert_eq!(registrants[2].title, "Top 10 Asal Universitas Pendaftar");
        assert!(registrants[3].note.is_some());

        assert_eq!(view.charts(DashboardTab::Participants).len(), 3);
    }

    #[test]
    fn test_json_snapshot() {
        let df = table();
        let selection = FilterSelection::new(["S2"], ["F"]);
        let view = render(&df, &selection, &DashboardConfig::default()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["filtered_rows"], 1);
        assert_eq!(json["registrants"]["top_institutions"][0]["category"], "ITB");
        assert_eq!(
            json["registrants"]["daily_registrations"][0]["date"],
            "2025-01-15"
        );
    }
}
