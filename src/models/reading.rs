use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::WeatherCondition;

/// A single canonical observation from one station.
///
/// Only `timestamp` is guaranteed; every measured field may be absent and
/// absence is carried through the pipeline rather than replaced with zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Reading {
    pub station_id: Option<String>,
    pub region: Option<String>,
    pub elevation: Option<f64>,
    pub timestamp: NaiveDateTime,

    // Timestamp components kept for passthrough into the hourly table
    pub month: u32,
    pub day: u32,
    pub hour: u32,

    pub temperature: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: Option<f64>,

    pub pressure: Option<f64>,

    #[validate(range(min = 0.0))]
    pub precipitation: Option<f64>,

    #[validate(range(min = 0.0))]
    pub wind_speed: Option<f64>,

    pub wind_direction: Option<String>,
}

impl Reading {
    pub fn builder(station_id: &str, timestamp: NaiveDateTime) -> ReadingBuilder {
        ReadingBuilder::new(station_id, timestamp)
    }

    /// True when every measured field is absent
    pub fn is_empty_observation(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.pressure.is_none()
            && self.precipitation.is_none()
            && self.wind_speed.is_none()
            && self.wind_direction.is_none()
    }
}

/// A reading with its per-reading derived metrics attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedReading {
    pub reading: Reading,
    pub feels_like: Option<f64>,
    pub heat_index: Option<f64>,
    pub weather_condition: WeatherCondition,
}

pub struct ReadingBuilder {
    reading: Reading,
}

impl ReadingBuilder {
    pub fn new(station_id: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            reading: Reading {
                station_id: Some(station_id.to_string()),
                region: None,
                elevation: None,
                timestamp,
                month: timestamp.month(),
                day: timestamp.day(),
                hour: timestamp.hour(),
                temperature: None,
                humidity: None,
                pressure: None,
                precipitation: None,
                wind_speed: None,
                wind_direction: None,
            },
        }
    }

    pub fn region(mut self, region: &str) -> Self {
        self.reading.region = Some(region.to_string());
        self
    }

    pub fn elevation(mut self, elevation: f64) -> Self {
        self.reading.elevation = Some(elevation);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.reading.temperature = Some(temperature);
        self
    }

    pub fn humidity(mut self, humidity: f64) -> Self {
        self.reading.humidity = Some(humidity);
        self
    }

    pub fn pressure(mut self, pressure: f64) -> Self {
        self.reading.pressure = Some(pressure);
        self
    }

    pub fn precipitation(mut self, precipitation: f64) -> Self {
        self.reading.precipitation = Some(precipitation);
        self
    }

    pub fn wind(mut self, speed: f64, direction: &str) -> Self {
        self.reading.wind_speed = Some(speed);
        self.reading.wind_direction = Some(direction.to_string());
        self
    }

    pub fn wind_speed(mut self, speed: f64) -> Self {
        self.reading.wind_speed = Some(speed);
        self
    }

    pub fn build(self) -> Reading {
        self.reading
    }
}
