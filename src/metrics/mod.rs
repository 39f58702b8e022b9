pub mod types;

pub use types::{MetricsManager, RequestMetrics};
