//! Dashboard settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed relative path of the registrant spreadsheet.
pub const DEFAULT_SOURCE_PATH: &str = "MASTER DATA - GIKNOWLEDGE BUILDING 2025.xlsx";

/// Number of institutions shown in the ranking charts.
pub const DEFAULT_TOP_N: usize = 10;

/// Static settings of the dashboard. There is no config file: the
/// spreadsheet is the only input, so everything here is a built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub source_path: PathBuf,
    pub top_n: usize,
    pub title: String,
    pub caption: String,
    /// Size of each chart image in exported reports (pixels).
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            top_n: DEFAULT_TOP_N,
            title: "📊 Dashboard GIKnowledge Building 2025".to_string(),
            caption: "Tugas 1 – Pembangunan Dashboard Interaktif".to_string(),
            export_width: 1200,
            export_height: 800,
        }
    }
}
