//! Report module - console summaries and JSON export of analysis results

pub mod metrics_export;
pub mod summary;

pub use metrics_export::*;
pub use summary::*;
