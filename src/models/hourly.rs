use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::WeatherCondition;

/// One station's aggregated readings for one calendar hour.
///
/// Gap hours (no underlying readings) are materialized too: their
/// `reading_count` is zero, `precipitation` is `0.0` and every other
/// measured field is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub station_id: String,
    /// Start of the hour bin
    pub timestamp: NaiveDateTime,
    pub reading_count: usize,

    pub region: Option<String>,
    pub elevation: Option<f64>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,

    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub precipitation: f64,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<String>,

    pub feels_like: Option<f64>,
    pub heat_index: Option<f64>,
    pub weather_condition: Option<WeatherCondition>,

    pub temperature_trend: Option<f64>,
    pub pressure_change_rate: Option<f64>,
    pub temperature_anomaly: bool,
}

impl HourlyRecord {
    /// An hour with no readings for `station_id`
    pub fn gap(station_id: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            station_id: station_id.to_string(),
            timestamp,
            reading_count: 0,
            region: None,
            elevation: None,
            month: None,
            day: None,
            hour: None,
            temperature: None,
            humidity: None,
            pressure: None,
            precipitation: 0.0,
            wind_speed: None,
            wind_direction: None,
            feels_like: None,
            heat_index: None,
            weather_condition: None,
            temperature_trend: None,
            pressure_change_rate: None,
            temperature_anomaly: false,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.reading_count == 0
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_record() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        let record = HourlyRecord::gap("ST-9", ts);

        assert!(record.is_gap());
        assert_eq!(record.precipitation, 0.0);
        assert!(record.temperature.is_none());
        assert!(record.region.is_none());
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
