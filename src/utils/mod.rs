//! Utility module: errors, logging, metrics.

pub mod errors;
pub mod logging;
pub mod metrics;

pub use errors::{PackError, Result};
pub use logging::{init_logging, log_error, log_info, log_warn};
pub use metrics::MetricsRegistry;
