//! Observability for the Ansiversa data-access layer.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::Metrics;
