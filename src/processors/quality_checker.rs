use crate::models::{DailyRegionalAggregate, HourlyRecord, Reading};
use crate::utils::stats;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use validator::Validate;

/// Where a data shortfall was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningScope {
    Station(String),
    RegionDay(String, NaiveDate),
}

impl fmt::Display for WarningScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningScope::Station(id) => write!(f, "Station {}", id),
            WarningScope::RegionDay(region, date) => write!(f, "Region {} on {}", region, date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsufficientDataKind {
    NoTemperature,
    SingleTemperature,
    NoWindDirection,
    NoWindSpeed,
}

/// Non-fatal: a group lacked the data for a meaningful statistic and the
/// affected values were emitted as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct InsufficientDataWarning {
    pub scope: WarningScope,
    pub kind: InsufficientDataKind,
    pub details: String,
}

#[derive(Debug, Clone, Default)]
pub struct StationStatistics {
    pub total_hours: usize,
    pub gap_hours: usize,
    pub anomaly_hours: usize,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub mean_temp: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct QualityReport {
    pub total_readings: usize,
    pub out_of_range_readings: usize,
    pub total_stations: usize,
    pub total_hours: usize,
    pub gap_hours: usize,
    pub anomaly_hours: usize,
    pub region_days: usize,
    pub warnings: Vec<InsufficientDataWarning>,
    pub station_statistics: BTreeMap<String, StationStatistics>,
}

impl QualityReport {
    pub fn gap_percentage(&self) -> f64 {
        if self.total_hours == 0 {
            0.0
        } else {
            100.0 * self.gap_hours as f64 / self.total_hours as f64
        }
    }
}

pub struct QualityChecker;

impl QualityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(
        &self,
        readings: &[Reading],
        hourly: &[HourlyRecord],
        daily: &[DailyRegionalAggregate],
    ) -> QualityReport {
        let mut report = QualityReport {
            total_readings: readings.len(),
            out_of_range_readings: readings.iter().filter(|r| r.validate().is_err()).count(),
            total_hours: hourly.len(),
            region_days: daily.len(),
            ..QualityReport::default()
        };

        let mut by_station: BTreeMap<&str, Vec<&HourlyRecord>> = BTreeMap::new();
        for record in hourly {
            by_station.entry(record.station_id.as_str()).or_default().push(record);
            if record.is_gap() {
                report.gap_hours += 1;
            }
            if record.temperature_anomaly {
                report.anomaly_hours += 1;
            }
        }
        report.total_stations = by_station.len();

        for (station_id, rows) in by_station {
            self.check_station(station_id, &rows, &mut report);
        }

        for aggregate in daily {
            self.check_region_day(aggregate, &mut report);
        }

        for warning in &report.warnings {
            warn!("Insufficient data: {}: {}", warning.scope, warning.details);
        }

        report
    }

    fn check_station(&self, station_id: &str, rows: &[&HourlyRecord], report: &mut QualityReport) {
        let temps = || rows.iter().map(|r| r.temperature);
        let present = temps().flatten().count();

        let statistics = StationStatistics {
            total_hours: rows.len(),
            gap_hours: rows.iter().filter(|r| r.is_gap()).count(),
            anomaly_hours: rows.iter().filter(|r| r.temperature_anomaly).count(),
            min_temp: stats::min(temps()),
            max_temp: stats::max(temps()),
            mean_temp: stats::mean(temps()),
        };
        report
            .station_statistics
            .insert(station_id.to_string(), statistics);

        let scope = WarningScope::Station(station_id.to_string());
        match present {
            0 => report.warnings.push(InsufficientDataWarning {
                scope,
                kind: InsufficientDataKind::NoTemperature,
                details: "no hourly temperature; trend and anomaly values are missing".to_string(),
            }),
            1 => report.warnings.push(InsufficientDataWarning {
                scope,
                kind: InsufficientDataKind::SingleTemperature,
                details: "one hourly temperature; standard deviation undefined, no anomalies flagged"
                    .to_string(),
            }),
            _ => {}
        }
    }

    fn check_region_day(&self, aggregate: &DailyRegionalAggregate, report: &mut QualityReport) {
        let scope = || WarningScope::RegionDay(aggregate.region.clone(), aggregate.date);

        if aggregate.daily_temp_range.is_none() {
            report.warnings.push(InsufficientDataWarning {
                scope: scope(),
                kind: InsufficientDataKind::NoTemperature,
                details: "no temperature; daily range and severity index are missing".to_string(),
            });
        }
        if aggregate.wind_direction_mode.is_none() {
            report.warnings.push(InsufficientDataWarning {
                scope: scope(),
                kind: InsufficientDataKind::NoWindDirection,
                details: "no wind direction; mode is missing".to_string(),
            });
        }
        if aggregate.avg_wind_speed.is_none() {
            report.warnings.push(InsufficientDataWarning {
                scope: scope(),
                kind: InsufficientDataKind::NoWindSpeed,
                details: "no wind speed; severity index is missing".to_string(),
            });
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &QualityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Data Quality Report ===\n");
        summary.push_str(&format!("Readings: {}\n", report.total_readings));
        summary.push_str(&format!(
            "Out-of-range Readings: {}\n",
            report.out_of_range_readings
        ));
        summary.push_str(&format!("Stations: {}\n", report.total_stations));
        summary.push_str(&format!(
            "Hourly Records: {} ({} gap hours, {:.1}%)\n",
            report.total_hours,
            report.gap_hours,
            report.gap_percentage()
        ));
        summary.push_str(&format!("Temperature Anomalies: {}\n", report.anomaly_hours));
        summary.push_str(&format!("Region-days: {}\n", report.region_days));

        if !report.station_statistics.is_empty() {
            summary.push_str("\nPer-station Statistics:\n");
            for (station_id, stats) in &report.station_statistics {
                summary.push_str(&format!(
                    "  {}: {} hours ({} gaps, {} anomalies), temperature min {} / mean {} / max {}\n",
                    station_id,
                    stats.total_hours,
                    stats.gap_hours,
                    stats.anomaly_hours,
                    format_temp(stats.min_temp),
                    format_temp(stats.mean_temp),
                    format_temp(stats.max_temp)
                ));
            }
        }

        summary.push_str(&format!(
            "\nInsufficient Data Warnings: {}\n",
            report.warnings.len()
        ));

        if !report.warnings.is_empty() {
            summary.push_str("\nTop 10 Warnings:\n");
            for (i, warning) in report.warnings.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    warning.scope,
                    warning.details
                ));
            }
        }

        summary
    }
}

fn format_temp(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.1}", v))
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self::new()
    }
}
