use chrono::{Datelike, Local};
use std::path::PathBuf;

fn dated_output_path(stem: &str, extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("{}-{:02}{:02}{:02}.{}", stem, year, month, day, extension);
    PathBuf::from("output").join(filename)
}

/// Generate default hourly table filename with format: climate-hourly-{YYMMDD}.parquet
pub fn generate_default_hourly_filename() -> PathBuf {
    dated_output_path("climate-hourly", "parquet")
}

/// Generate default severity ranking filename with format: climate-severity-{YYMMDD}.parquet
pub fn generate_default_severity_filename() -> PathBuf {
    dated_output_path("climate-severity", "parquet")
}
