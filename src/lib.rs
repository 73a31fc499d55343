pub mod charts;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod report;

pub use error::{DashboardError, DashboardResult};
pub use metrics::compute_metrics;
pub use models::{ChartSpec, Column, MetricCard, SleepRecord};
