pub mod error;
pub mod measurement;
pub mod metrics;
pub mod types;

pub use metrics::{CssFont, FontSpec, TextMetrics};
