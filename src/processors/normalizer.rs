use crate::error::{ProcessingError, Result};
use crate::models::Reading;
use crate::utils::constants::{
    FIELD_ELEVATION, FIELD_HUMIDITY, FIELD_PRECIPITATION, FIELD_PRESSURE, FIELD_REGION,
    FIELD_STATION_ID, FIELD_TEMPERATURE, FIELD_TIMESTAMP, FIELD_WIND_DIRECTION, FIELD_WIND_SPEED,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;
use tracing::{debug, info};

/// One raw observation: field name to loosely-typed value.
pub type RawObservation = serde_json::Map<String, Value>;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parse a timestamp in any of the accepted layouts.
///
/// Offsets in RFC 3339 input are dropped and the wall-clock time is kept.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub struct ReadingNormalizer;

impl ReadingNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Convert raw observations into readings sorted by time.
    ///
    /// The sort is stable, so readings sharing a timestamp keep input order.
    pub fn normalize(&self, observations: &[RawObservation]) -> Result<Vec<Reading>> {
        if observations.is_empty() {
            return Err(ProcessingError::EmptyInput);
        }

        let mut readings = observations
            .iter()
            .enumerate()
            .map(|(index, observation)| self.normalize_observation(index, observation))
            .collect::<Result<Vec<_>>>()?;

        readings.sort_by_key(|r| r.timestamp);

        let empty = readings.iter().filter(|r| r.is_empty_observation()).count();
        if empty > 0 {
            debug!("{} readings carry no measurements", empty);
        }

        info!("Normalized {} readings", readings.len());
        Ok(readings)
    }

    fn normalize_observation(&self, index: usize, observation: &RawObservation) -> Result<Reading> {
        let timestamp = match observation.get(FIELD_TIMESTAMP) {
            Some(Value::String(text)) => {
                parse_timestamp(text).ok_or_else(|| ProcessingError::MalformedInput {
                    index,
                    reason: format!("unparseable timestamp '{}'", text),
                })?
            }
            Some(other) => {
                return Err(ProcessingError::MalformedInput {
                    index,
                    reason: format!("timestamp must be text, got {}", other),
                })
            }
            None => {
                return Err(ProcessingError::MalformedInput {
                    index,
                    reason: "missing timestamp".to_string(),
                })
            }
        };

        Ok(Reading {
            station_id: text_field(observation, FIELD_STATION_ID),
            region: text_field(observation, FIELD_REGION),
            elevation: numeric_field(index, observation, FIELD_ELEVATION),
            timestamp,
            month: timestamp.month(),
            day: timestamp.day(),
            hour: timestamp.hour(),
            temperature: numeric_field(index, observation, FIELD_TEMPERATURE),
            humidity: numeric_field(index, observation, FIELD_HUMIDITY),
            pressure: numeric_field(index, observation, FIELD_PRESSURE),
            precipitation: numeric_field(index, observation, FIELD_PRECIPITATION),
            wind_speed: numeric_field(index, observation, FIELD_WIND_SPEED),
            wind_direction: text_field(observation, FIELD_WIND_DIRECTION),
        })
    }
}

impl Default for ReadingNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn numeric_field(index: usize, observation: &RawObservation, field: &str) -> Option<f64> {
    let value = match observation.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => return None,
        _ => None,
    };

    if value.is_none() {
        debug!("Observation {}: '{}' is not numeric, treating as missing", index, field);
    }

    // "inf" and "NaN" parse as f64 but are not measurements
    value.filter(|v| v.is_finite())
}

fn text_field(observation: &RawObservation, field: &str) -> Option<String> {
    match observation.get(field)? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
