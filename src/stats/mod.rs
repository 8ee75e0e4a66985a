//! Stats module - aggregations behind the dashboard charts

mod aggregator;

pub use aggregator::{total, Aggregator, CategoryCount, DateCount};
