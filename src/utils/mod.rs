pub mod constants;
pub mod filename;
pub mod progress;
pub mod stats;

pub use constants::*;
pub use filename::{generate_default_hourly_filename, generate_default_severity_filename};
pub use progress::ProgressReporter;
