//! Pipeline module - outlier filtering, metrics and per-category aggregation

pub mod analysis;
pub mod category;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod outlier;

pub use analysis::*;
pub use category::*;
pub use dataset::*;
pub use error::MetricError;
pub use loader::*;
pub use metrics::*;
pub use outlier::*;
