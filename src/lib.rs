//! GIKnowledge Building 2025 Dashboard
//!
//! Loads the registrant spreadsheet, applies the education-level and gender
//! filters and aggregates the filtered rows into the charts of the
//! "Pendaftar" and "Peserta" views.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;
pub mod ppt;
pub mod stats;

pub use config::DashboardConfig;
pub use dashboard::{render, DashboardView};
