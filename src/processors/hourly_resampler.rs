use crate::models::{EnrichedReading, HourlyRecord, WeatherCondition};
use crate::utils::stats;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Start of the calendar hour containing `timestamp`
pub fn floor_to_hour(timestamp: NaiveDateTime) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(timestamp.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
    NaiveDateTime::new(timestamp.date(), time)
}

#[derive(Debug, Default)]
struct MeanAccumulator {
    total: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.total += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total / self.count as f64)
        }
    }
}

/// Running per-bin state; consumed when the bin's record is emitted.
#[derive(Debug, Default)]
struct HourAccumulator {
    reading_count: usize,
    region: Option<String>,
    elevation: Option<f64>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    temperature: MeanAccumulator,
    humidity: MeanAccumulator,
    pressure: MeanAccumulator,
    feels_like: MeanAccumulator,
    heat_index: MeanAccumulator,
    precipitation: f64,
    wind_speed: Option<f64>,
    wind_directions: Vec<String>,
    conditions: Vec<WeatherCondition>,
}

impl HourAccumulator {
    fn push(&mut self, enriched: &EnrichedReading) {
        let reading = &enriched.reading;

        // "first" reducers keep the first present value
        if self.region.is_none() {
            self.region = reading.region.clone();
        }
        if self.elevation.is_none() {
            self.elevation = reading.elevation;
        }
        if self.reading_count == 0 {
            self.month = Some(reading.month);
            self.day = Some(reading.day);
            self.hour = Some(reading.hour);
        }

        self.temperature.push(reading.temperature);
        self.humidity.push(reading.humidity);
        self.pressure.push(reading.pressure);
        self.feels_like.push(enriched.feels_like);
        self.heat_index.push(enriched.heat_index);

        if let Some(p) = reading.precipitation {
            self.precipitation += p;
        }
        self.wind_speed = stats::max([self.wind_speed, reading.wind_speed]);

        if let Some(ref direction) = reading.wind_direction {
            self.wind_directions.push(direction.clone());
        }
        self.conditions.push(enriched.weather_condition);

        self.reading_count += 1;
    }

    fn finish(self, station_id: &str, timestamp: NaiveDateTime) -> HourlyRecord {
        HourlyRecord {
            station_id: station_id.to_string(),
            timestamp,
            reading_count: self.reading_count,
            region: self.region,
            elevation: self.elevation,
            month: self.month,
            day: self.day,
            hour: self.hour,
            temperature: self.temperature.value(),
            humidity: self.humidity.value(),
            pressure: self.pressure.value(),
            precipitation: self.precipitation,
            wind_speed: self.wind_speed,
            wind_direction: stats::mode(self.wind_directions.into_iter().map(Some)),
            feels_like: self.feels_like.value(),
            heat_index: self.heat_index.value(),
            weather_condition: stats::mode(self.conditions.into_iter().map(Some)),
            temperature_trend: None,
            pressure_change_rate: None,
            temperature_anomaly: false,
        }
    }
}

pub struct HourlyResampler;

impl HourlyResampler {
    pub fn new() -> Self {
        Self
    }

    /// Partition readings by station, ordered by station id.
    ///
    /// Readings without a station id belong to no station and are dropped.
    pub fn group_by_station<'a>(
        &self,
        readings: &'a [EnrichedReading],
    ) -> BTreeMap<String, Vec<&'a EnrichedReading>> {
        let mut groups: BTreeMap<String, Vec<&EnrichedReading>> = BTreeMap::new();
        let mut orphaned = 0usize;

        for enriched in readings {
            match enriched.reading.station_id {
                Some(ref id) => groups.entry(id.clone()).or_default().push(enriched),
                None => orphaned += 1,
            }
        }

        if orphaned > 0 {
            warn!("Dropped {} readings without a station_id", orphaned);
        }

        groups
    }

    /// Build one record per hour between the station's first and last reading.
    pub fn resample_station(
        &self,
        station_id: &str,
        readings: &[&EnrichedReading],
    ) -> Vec<HourlyRecord> {
        let first = readings.iter().map(|r| r.reading.timestamp).min();
        let last = readings.iter().map(|r| r.reading.timestamp).max();
        let (Some(first), Some(last)) = (first, last) else {
            return Vec::new();
        };

        let mut bins: BTreeMap<NaiveDateTime, HourAccumulator> = BTreeMap::new();
        for enriched in readings {
            bins.entry(floor_to_hour(enriched.reading.timestamp))
                .or_default()
                .push(enriched);
        }

        // Full hour skeleton, then left-join the filled bins onto it
        let last_hour = floor_to_hour(last);
        let mut hour = floor_to_hour(first);
        let mut records = Vec::new();
        while hour <= last_hour {
            let record = match bins.remove(&hour) {
                Some(acc) => acc.finish(station_id, hour),
                None => HourlyRecord::gap(station_id, hour),
            };
            records.push(record);
            hour += Duration::hours(1);
        }

        debug!(
            "Station {}: {} readings into {} hourly bins",
            station_id,
            readings.len(),
            records.len()
        );

        records
    }

    /// Resample every station sequentially and merge the results.
    pub fn resample(&self, readings: &[EnrichedReading]) -> Vec<HourlyRecord> {
        let tables = self
            .group_by_station(readings)
            .into_iter()
            .map(|(station_id, group)| self.resample_station(&station_id, &group))
            .collect();

        merge_station_tables(tables)
    }
}

impl Default for HourlyResampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenate per-station tables (in station order) and sort by hour.
///
/// The sort is stable, so rows sharing an hour stay in station order.
pub fn merge_station_tables(tables: Vec<Vec<HourlyRecord>>) -> Vec<HourlyRecord> {
    let mut merged: Vec<HourlyRecord> = tables.into_iter().flatten().collect();
    merged.sort_by_key(|r| r.timestamp);
    merged
}
