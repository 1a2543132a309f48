use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per (region, date) statistics before severity scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRegionalAggregate {
    pub region: String,
    pub date: NaiveDate,
    pub daily_temp_range: Option<f64>,
    pub precip_total: f64,
    pub hours_with_precip: usize,
    pub wind_direction_mode: Option<String>,
    pub avg_wind_speed: Option<f64>,
    pub precipitation_intensity: f64,
}

/// Scored regional day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalDailySummary {
    pub region: String,
    pub date: NaiveDate,
    pub daily_temp_range: Option<f64>,
    pub precipitation_intensity: f64,
    pub wind_direction_mode: Option<String>,
    pub regional_severity_index: Option<f64>,
}

impl RegionalDailySummary {
    /// External view of the summary with the date dropped
    pub fn to_row(&self) -> SeverityRow {
        SeverityRow {
            region: self.region.clone(),
            daily_temp_range: self.daily_temp_range,
            precipitation_intensity: self.precipitation_intensity,
            wind_direction_mode: self.wind_direction_mode.clone(),
            regional_severity_index: self.regional_severity_index,
        }
    }
}

/// The five-column ranking handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityRow {
    pub region: String,
    pub daily_temp_range: Option<f64>,
    pub precipitation_intensity: f64,
    pub wind_direction_mode: Option<String>,
    pub regional_severity_index: Option<f64>,
}

impl SeverityRow {
    pub const COLUMNS: [&'static str; 5] = [
        "region",
        "daily_temp_range",
        "precipitation_intensity",
        "wind_direction_mode",
        "regional_severity_index",
    ];

    /// Cell values in column order, numbers at two decimals
    pub fn cells(&self) -> [String; 5] {
        [
            self.region.clone(),
            format_2dp(self.daily_temp_range),
            format_2dp(Some(self.precipitation_intensity)),
            self.wind_direction_mode
                .clone()
                .unwrap_or_else(|| "NaN".to_string()),
            format_2dp(self.regional_severity_index),
        ]
    }
}

/// Two-decimal rendering with `NaN` for missing values
pub fn format_2dp(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "NaN".to_string(),
    }
}
