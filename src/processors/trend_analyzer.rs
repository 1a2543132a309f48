use crate::models::HourlyRecord;
use crate::utils::constants::DEFAULT_TREND_WINDOW;
use std::collections::HashMap;

/// Newest minus oldest value of a rolling window.
///
/// `None` when the window holds no present value; `0.0` for a single-row
/// window; a missing endpoint propagates as `None`.
pub fn window_difference(window: &[Option<f64>]) -> Option<f64> {
    if window.iter().all(Option::is_none) {
        return None;
    }
    if window.len() == 1 {
        return Some(0.0);
    }

    let newest = window[window.len() - 1]?;
    let oldest = window[0]?;
    Some(newest - oldest)
}

/// Window difference per step between oldest and newest row.
pub fn window_rate(window: &[Option<f64>]) -> Option<f64> {
    let steps = window.len().saturating_sub(1);
    window_difference(window).map(|diff| if steps == 0 { 0.0 } else { diff / steps as f64 })
}

fn rolling<F>(values: &[Option<f64>], window: usize, reducer: F) -> Vec<Option<f64>>
where
    F: Fn(&[Option<f64>]) -> Option<f64>,
{
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            reducer(&values[start..=i])
        })
        .collect()
}

pub struct TrendAnalyzer {
    window: usize,
}

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self {
            window: DEFAULT_TREND_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    /// Attach trend columns to one station's chronological series
    pub fn analyze_station(&self, records: Vec<HourlyRecord>) -> Vec<HourlyRecord> {
        let temperatures: Vec<Option<f64>> = records.iter().map(|r| r.temperature).collect();
        let pressures: Vec<Option<f64>> = records.iter().map(|r| r.pressure).collect();

        let trends = rolling(&temperatures, self.window, window_difference);
        let rates = rolling(&pressures, self.window, window_rate);

        records
            .into_iter()
            .zip(trends.into_iter().zip(rates))
            .map(|(record, (trend, rate))| HourlyRecord {
                temperature_trend: trend,
                pressure_change_rate: rate,
                ..record
            })
            .collect()
    }

    /// Attach trend columns to a merged multi-station table.
    ///
    /// Each station's rows are windowed in table order; row order is kept.
    pub fn analyze(&self, records: Vec<HourlyRecord>) -> Vec<HourlyRecord> {
        let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            positions.entry(record.station_id.as_str()).or_default().push(i);
        }

        let mut trends = vec![None; records.len()];
        let mut rates = vec![None; records.len()];
        for rows in positions.values() {
            let temperatures: Vec<Option<f64>> = rows.iter().map(|&i| records[i].temperature).collect();
            let pressures: Vec<Option<f64>> = rows.iter().map(|&i| records[i].pressure).collect();

            let station_trends = rolling(&temperatures, self.window, window_difference);
            let station_rates = rolling(&pressures, self.window, window_rate);
            for (k, &i) in rows.iter().enumerate() {
                trends[i] = station_trends[k];
                rates[i] = station_rates[k];
            }
        }

        records
            .into_iter()
            .zip(trends.into_iter().zip(rates))
            .map(|(record, (trend, rate))| HourlyRecord {
                temperature_trend: trend,
                pressure_change_rate: rate,
                ..record
            })
            .collect()
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn series(station: &str, temps: &[Option<f64>], pressures: &[Option<f64>]) -> Vec<HourlyRecord> {
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        temps
            .iter()
            .zip(pressures)
            .enumerate()
            .map(|(i, (t, p))| HourlyRecord {
                temperature: *t,
                pressure: *p,
                reading_count: 1,
                ..HourlyRecord::gap(station, start + Duration::hours(i as i64))
            })
            .collect()
    }

    #[test]
    fn test_first_row_is_zero_then_two_step_difference() {
        let temps = [Some(10.0), Some(12.0), Some(15.0), Some(11.0)];
        let pressures = [Some(1000.0), Some(1002.0), Some(1006.0), Some(1004.0)];

        let analyzed = TrendAnalyzer::new().analyze_station(series("S", &temps, &pressures));
        let trends: Vec<Option<f64>> = analyzed.iter().map(|r| r.temperature_trend).collect();
        let rates: Vec<Option<f64>> = analyzed.iter().map(|r| r.pressure_change_rate).collect();

        assert_eq!(trends, vec![Some(0.0), Some(2.0), Some(5.0), Some(-1.0)]);
        assert_eq!(rates, vec![Some(0.0), Some(2.0), Some(3.0), Some(-1.0)]);
    }

    #[test]
    fn test_missing_values_propagate() {
        let temps = [Some(10.0), None, Some(14.0), Some(16.0), None];
        let pressures = [None, None, None, None, None];

        let analyzed = TrendAnalyzer::new().analyze_station(series("S", &temps, &pressures));
        let trends: Vec<Option<f64>> = analyzed.iter().map(|r| r.temperature_trend).collect();

        // [10, None] -> None endpoint; [10, None, 14] -> 4; [None, 14, 16] -> None
        assert_eq!(trends, vec![Some(0.0), None, Some(4.0), None, None]);
        assert!(analyzed.iter().all(|r| r.pressure_change_rate.is_none()));
    }

    #[test]
    fn test_window_helpers() {
        assert_eq!(window_difference(&[None]), None);
        assert_eq!(window_difference(&[Some(3.0)]), Some(0.0));
        assert_eq!(window_rate(&[Some(1.0), Some(2.0), Some(5.0)]), Some(2.0));
        assert_eq!(window_rate(&[None, None]), None);
    }

    #[test]
    fn test_merged_table_windows_per_station() {
        let mut merged = Vec::new();
        let a = series("A", &[Some(1.0), Some(2.0), Some(4.0)], &[None, None, None]);
        let b = series("B", &[Some(10.0), Some(20.0), Some(40.0)], &[None, None, None]);
        for (ra, rb) in a.into_iter().zip(b) {
            merged.push(ra);
            merged.push(rb);
        }

        let analyzed = TrendAnalyzer::new().analyze(merged);
        let b_trends: Vec<Option<f64>> = analyzed
            .iter()
            .filter(|r| r.station_id == "B")
            .map(|r| r.temperature_trend)
            .collect();
        assert_eq!(b_trends, vec![Some(0.0), Some(10.0), Some(30.0)]);
        assert_eq!(analyzed[0].station_id, "A");
        assert_eq!(analyzed[1].station_id, "B");
    }
}
