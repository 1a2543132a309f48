use crate::models::HourlyRecord;
use crate::utils::constants::{DEFAULT_ANOMALY_SIGMA, DEFAULT_STD_EPSILON};
use crate::utils::stats;
use std::collections::HashMap;

/// Whole-series temperature statistics of one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureBaseline {
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` with fewer than two temperatures
    pub std: Option<f64>,
}

impl TemperatureBaseline {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a HourlyRecord> + Clone,
    {
        Self {
            mean: stats::mean(records.clone().into_iter().map(|r| r.temperature)),
            std: stats::sample_std(records.into_iter().map(|r| r.temperature)),
        }
    }
}

pub struct AnomalyDetector {
    sigma: f64,
    epsilon: f64,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self {
            sigma: DEFAULT_ANOMALY_SIGMA,
            epsilon: DEFAULT_STD_EPSILON,
        }
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Whether `temperature` lies outside `sigma` standard deviations
    pub fn is_anomalous(&self, temperature: Option<f64>, baseline: &TemperatureBaseline) -> bool {
        match (temperature, baseline.mean, baseline.std) {
            (Some(t), Some(mean), Some(std)) => {
                let std = if std == 0.0 { self.epsilon } else { std };
                (t - mean).abs() > self.sigma * std
            }
            _ => false,
        }
    }

    /// Flag one station's series against its own baseline
    pub fn detect_station(&self, records: Vec<HourlyRecord>) -> Vec<HourlyRecord> {
        let baseline = TemperatureBaseline::from_records(&records);

        records
            .into_iter()
            .map(|record| HourlyRecord {
                temperature_anomaly: self.is_anomalous(record.temperature, &baseline),
                ..record
            })
            .collect()
    }

    /// Flag a merged multi-station table, one baseline per station
    pub fn detect(&self, records: Vec<HourlyRecord>) -> Vec<HourlyRecord> {
        let mut by_station: HashMap<&str, Vec<&HourlyRecord>> = HashMap::new();
        for record in &records {
            by_station.entry(record.station_id.as_str()).or_default().push(record);
        }

        let baselines: HashMap<String, TemperatureBaseline> = by_station
            .into_iter()
            .map(|(id, rows)| (id.to_string(), TemperatureBaseline::from_records(rows.iter().copied())))
            .collect();

        records
            .into_iter()
            .map(|record| {
                let flagged = baselines
                    .get(&record.station_id)
                    .is_some_and(|b| self.is_anomalous(record.temperature, b));
                HourlyRecord {
                    temperature_anomaly: flagged,
                    ..record
                }
            })
            .collect()
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(station: &str, temps: &[Option<f64>]) -> Vec<HourlyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        temps
            .iter()
            .enumerate()
            .map(|(i, t)| HourlyRecord {
                temperature: *t,
                reading_count: 1,
                ..HourlyRecord::gap(station, start + Duration::hours(i as i64))
            })
            .collect()
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        let records = series("S", &[Some(18.0); 12]);
        let flagged = AnomalyDetector::new().detect_station(records);
        assert!(flagged.iter().all(|r| !r.temperature_anomaly));
    }

    #[test]
    fn test_spike_is_flagged() {
        let mut temps = vec![Some(10.0); 20];
        temps[7] = Some(30.0);

        let flagged = AnomalyDetector::new().detect_station(series("S", &temps));
        let anomalies: Vec<usize> = flagged
            .iter()
            .enumerate()
            .filter(|(_, r)| r.temperature_anomaly)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(anomalies, vec![7]);
    }

    #[test]
    fn test_missing_and_single_values_not_flagged() {
        let flagged = AnomalyDetector::new().detect_station(series("S", &[Some(5.0), None, None]));
        assert!(flagged.iter().all(|r| !r.temperature_anomaly));
    }

    #[test]
    fn test_baseline_is_per_station() {
        let mut merged = series("A", &[Some(10.0); 10]);
        let mut b_temps = vec![Some(100.0); 10];
        b_temps[3] = Some(140.0);
        merged.extend(series("B", &b_temps));

        let flagged = AnomalyDetector::new().detect(merged);
        let flagged_stations: Vec<&str> = flagged
            .iter()
            .filter(|r| r.temperature_anomaly)
            .map(|r| r.station_id.as_str())
            .collect();
        assert_eq!(flagged_stations, vec!["B"]);
    }

    #[test]
    fn test_epsilon_substitution() {
        let baseline = TemperatureBaseline {
            mean: Some(10.0),
            std: Some(0.0),
        };
        let detector = AnomalyDetector::new();
        assert!(!detector.is_anomalous(Some(10.0), &baseline));
        assert!(detector.is_anomalous(Some(10.001), &baseline));
    }
}
