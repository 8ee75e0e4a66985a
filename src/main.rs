//! GIKnowledge Building 2025 Dashboard
//!
//! Desktop dashboard over the registrant spreadsheet.

use eframe::egui;
use giknowledge_dashboard::gui::DashboardApp;
use giknowledge_dashboard::DashboardConfig;

fn main() -> eframe::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = DashboardConfig::default();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Dashboard GIKnowledge Building 2025"),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard GIKnowledge Building 2025",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
