//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{percentage, pie_angles, ChartData, ChartKind, ChartPlotter, ChartSeries};
pub use renderer::{ChartRenderer, RenderError};
